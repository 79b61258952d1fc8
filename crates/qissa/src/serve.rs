// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `qissa serve` command implementation.
//!
//! Constructs every adapter from the validated configuration, wires them
//! into the gateway, and serves until interrupted. All collaborators are
//! explicit instances injected at startup; shutdown drains in-flight
//! requests and checkpoints the ledger.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qissa_artifacts::ArtifactStore;
use qissa_config::QissaConfig;
use qissa_core::{Adapter, ChatLedger, QissaError};
use qissa_gateway::{
    build_router, start_server, ClerkVerifier, GatewayState, GenerationRouter, ServerConfig,
};
use qissa_generate::{
    ExemplarTable, GeminiClient, HistoryGenerator, RagStoryGenerator, SearchClient, StoryClient,
};
use qissa_storage::SqliteLedger;
use qissa_video::{ActiveJobs, FluidVideoBackend, StaticVideoBackend, VideoPipeline};

/// Initialize the tracing subscriber from the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qissa={log_level},info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Runs the `qissa serve` command.
pub async fn run_serve(config: QissaConfig) -> Result<(), QissaError> {
    init_tracing(&config.service.log_level);
    info!("starting qissa serve");

    // Storage.
    let ledger = Arc::new(SqliteLedger::new(config.storage.clone()));
    ledger.initialize().await?;

    // Identity provider.
    let verifier = Arc::new(ClerkVerifier::new(&config.auth)?);

    // Shared LLM and search clients.
    let llm = Arc::new(GeminiClient::new(&config.llm).inspect_err(|_| {
        eprintln!(
            "error: LLM API key required. Set llm.api_key in qissa.toml or QISSA_LLM_API_KEY."
        );
    })?);
    let search = SearchClient::new(&config.search)?;

    // The exemplar table is an enrichment: a missing file degrades story
    // style matching, it does not block startup.
    let table = match ExemplarTable::load_csv(Path::new(&config.rag.exemplar_csv)) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "exemplar table unavailable, continuing without style retrieval");
            ExemplarTable::default()
        }
    };

    // Text generators.
    let history = Arc::new(HistoryGenerator::new(llm.clone(), search));
    let rag = Arc::new(RagStoryGenerator::new(llm.clone(), table));
    let story = Arc::new(StoryClient::new(&config.story)?);

    // Video pipelines.
    let artifacts = ArtifactStore::new(&config.artifacts.videos_dir);
    let active = ActiveJobs::new();
    let ledger_dyn: Arc<dyn ChatLedger> = ledger.clone();
    let video_static = VideoPipeline::new(
        Arc::new(StaticVideoBackend::new(&config.video_static)?),
        artifacts.clone(),
        ledger_dyn.clone(),
        active.clone(),
        Duration::from_secs(config.video_static.max_wait_secs),
        &config.service.public_base_url,
    );
    let video_fluid = VideoPipeline::new(
        Arc::new(FluidVideoBackend::new(&config.video_fluid)?),
        artifacts,
        ledger_dyn.clone(),
        active,
        Duration::from_secs(config.video_fluid.max_wait_secs),
        &config.service.public_base_url,
    );

    let state = GatewayState {
        ledger: ledger_dyn,
        verifier,
        router: Arc::new(GenerationRouter::new(
            history,
            rag,
            story,
            video_static,
            video_fluid,
        )),
        pdf: config.pdf.clone(),
    };

    let server_config = ServerConfig {
        host: config.service.host.clone(),
        port: config.service.port,
        client_origin: config.service.client_origin.clone(),
        videos_dir: config.artifacts.videos_dir.clone().into(),
    };
    let app = build_router(&server_config, state)?;

    start_server(&server_config, app, shutdown_signal()).await?;

    // Drained; checkpoint and release storage.
    Adapter::shutdown(ledger.as_ref()).await?;
    info!("qissa serve stopped");
    Ok(())
}

/// Resolves on ctrl-c.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown signal received, draining");
}
