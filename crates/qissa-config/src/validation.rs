// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation of a deserialized [`QissaConfig`].
//!
//! Figment catches shape errors (unknown fields, type mismatches); this
//! pass catches values that deserialize fine but cannot work at runtime.

use thiserror::Error;

use crate::model::QissaConfig;

/// One semantic configuration error, keyed by the offending field.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Validate a loaded config, returning every problem found.
pub fn validate(config: &QissaConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.service.port == 0 {
        errors.push(invalid("service.port", "port 0 is not bindable"));
    }
    if !matches!(
        config.service.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(invalid(
            "service.log_level",
            "must be one of trace, debug, info, warn, error",
        ));
    }
    if config.search.top_k == 0 {
        errors.push(invalid("search.top_k", "must be at least 1"));
    }
    for (section, video) in [
        ("video_static", &config.video_static),
        ("video_fluid", &config.video_fluid),
    ] {
        if video.poll_interval_secs == 0 {
            errors.push(invalid(
                &format!("{section}.poll_interval_secs"),
                "must be at least 1",
            ));
        }
        if video.max_wait_secs < video.poll_interval_secs {
            errors.push(invalid(
                &format!("{section}.max_wait_secs"),
                "must be at least the poll interval",
            ));
        }
    }
    if config.storage.database_path.is_empty() {
        errors.push(invalid("storage.database_path", "must not be empty"));
    }
    if config.artifacts.videos_dir.is_empty() {
        errors.push(invalid("artifacts.videos_dir", "must not be empty"));
    }

    errors
}

/// Render validation errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
    }
}
