// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./qissa.toml` > `~/.config/qissa/qissa.toml` >
//! `/etc/qissa/qissa.toml` with environment variable overrides via the
//! `QISSA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::QissaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/qissa/qissa.toml` (system-wide)
/// 3. `~/.config/qissa/qissa.toml` (user XDG config)
/// 4. `./qissa.toml` (local directory)
/// 5. `QISSA_*` environment variables
pub fn load_config() -> Result<QissaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QissaConfig::default()))
        .merge(Toml::file("/etc/qissa/qissa.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("qissa/qissa.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("qissa.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<QissaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QissaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QissaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QissaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `QISSA_VIDEO_FLUID_BASE_URL` must map to
/// `video_fluid.base_url`, not `video.fluid.base.url`.
fn env_provider() -> Env {
    Env::prefixed("QISSA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("artifacts_", "artifacts.", 1)
            .replacen("llm_", "llm.", 1)
            .replacen("search_", "search.", 1)
            .replacen("rag_", "rag.", 1)
            .replacen("story_", "story.", 1)
            .replacen("video_static_", "video_static.", 1)
            .replacen("video_fluid_", "video_fluid.", 1)
            .replacen("pdf_", "pdf.", 1);
        mapped.into()
    })
}
