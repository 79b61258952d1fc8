// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, CORS, static artifact serving, and shared
//! state for the gateway.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use qissa_config::model::PdfConfig;
use qissa_core::{ChatLedger, IdentityVerifier, QissaError};

use crate::auth::auth_middleware;
use crate::dispatch::GenerationRouter;
use crate::handlers;

/// Shared state for axum request handlers.
///
/// Every collaborator is an explicitly constructed, injected instance;
/// nothing here is a process-wide singleton.
#[derive(Clone)]
pub struct GatewayState {
    /// Conversation ledger.
    pub ledger: Arc<dyn ChatLedger>,
    /// Identity verifier for the auth middleware.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Per-kind generation dispatch.
    pub router: Arc<GenerationRouter>,
    /// PDF export settings.
    pub pdf: PdfConfig,
}

/// Gateway server configuration (mirrors ServiceConfig from qissa-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origin.
    pub client_origin: String,
    /// Directory video artifacts are served from.
    pub videos_dir: PathBuf,
}

/// Assemble the gateway router.
///
/// - `/api/*` routes require authentication.
/// - `/health` is public.
/// - `/videos/*` serves persisted artifacts from the configured directory.
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Result<Router, QissaError> {
    let origin = config
        .client_origin
        .parse::<HeaderValue>()
        .map_err(|e| QissaError::Config(format!("invalid client origin: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let api_routes = Router::new()
        .route("/api/chats", post(handlers::create_chat))
        .route("/api/userchats", get(handlers::get_user_chats))
        .route("/api/chats/{id}", get(handlers::get_chat))
        .route("/api/chats/{id}/pdf", get(handlers::get_chat_pdf))
        .route("/api/chats/{id}/message", post(handlers::post_message))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    let public_routes = Router::new().route("/health", get(handlers::get_health));

    Ok(Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .nest_service("/videos", ServeDir::new(&config.videos_dir))
        .layer(cors))
}

/// Bind and serve until `shutdown` resolves, then drain in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), QissaError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QissaError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| QissaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug_prints_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            client_origin: "http://localhost:5173".to_string(),
            videos_dir: PathBuf::from("videos"),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("3000"));
    }
}
