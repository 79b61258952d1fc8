// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Qissa service.
//!
//! Layered loading (defaults < system < user < local < env) via Figment,
//! strict model structs that reject unknown keys, and a semantic validation
//! pass run once at startup.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::QissaConfig;
pub use validation::{render_errors, validate, ConfigError};

/// Load configuration from the standard hierarchy and validate it.
///
/// Returns every problem found rather than stopping at the first, so a
/// misconfigured deployment surfaces all its mistakes in one run.
pub fn load_and_validate() -> Result<QissaConfig, Vec<ConfigError>> {
    let config = load_config().map_err(|e| vec![ConfigError::Figment(Box::new(e))])?;
    let errors = validate(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

/// Load configuration from a TOML string and validate it (test entry point).
pub fn load_and_validate_str(toml_content: &str) -> Result<QissaConfig, Vec<ConfigError>> {
    let config =
        load_config_from_str(toml_content).map_err(|e| vec![ConfigError::Figment(Box::new(e))])?;
    let errors = validate(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}
