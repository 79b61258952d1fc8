// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Qissa configuration system.

use qissa_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_qissa_config() {
    let toml = r#"
[service]
host = "127.0.0.1"
port = 8080
log_level = "debug"
client_origin = "https://app.example.com"
public_base_url = "https://api.example.com"

[auth]
secret_key = "sk_test_123"
authorized_party = "https://app.example.com"

[storage]
database_path = "/var/lib/qissa/qissa.db"

[artifacts]
videos_dir = "/var/lib/qissa/videos"

[llm]
api_key = "key-123"
chat_model = "gemini-2.0-flash"
embed_model = "text-embedding-004"

[search]
top_k = 5
fetch_timeout_secs = 8

[rag]
exemplar_csv = "/var/lib/qissa/embedded_prompts.csv"

[story]
base_url = "http://story.internal"
max_steps = 7

[video_static]
base_url = "http://video-static.internal"
poll_interval_secs = 10
max_wait_secs = 900

[video_fluid]
base_url = "http://video-fluid.internal"
poll_interval_secs = 5
num_frames = 24

[pdf]
watermark = "Generated By Qissa"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.host, "127.0.0.1");
    assert_eq!(config.service.port, 8080);
    assert_eq!(config.auth.secret_key.as_deref(), Some("sk_test_123"));
    assert_eq!(config.storage.database_path, "/var/lib/qissa/qissa.db");
    assert_eq!(config.artifacts.videos_dir, "/var/lib/qissa/videos");
    assert_eq!(config.llm.api_key.as_deref(), Some("key-123"));
    assert_eq!(config.search.top_k, 5);
    assert_eq!(config.story.max_steps, 7);
    assert_eq!(config.video_static.poll_interval_secs, 10);
    assert_eq!(config.video_static.max_wait_secs, 900);
    assert_eq!(config.video_fluid.poll_interval_secs, 5);
    assert_eq!(config.video_fluid.num_frames, 24);
    assert_eq!(config.pdf.watermark, "Generated By Qissa");
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.service.port, 3000);
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.video_fluid.poll_interval_secs, 5);
    assert_eq!(config.video_fluid.num_frames, 16);
    assert_eq!(config.video_fluid.max_wait_secs, 600);
    assert_eq!(config.llm.chat_model, "gemini-2.0-flash");
    assert_eq!(config.artifacts.videos_dir, "videos");
    assert!(config.auth.secret_key.is_none());
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[service]
prot = 8080
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Type mismatches are rejected.
#[test]
fn wrong_type_is_rejected() {
    let toml = r#"
[video_fluid]
poll_interval_secs = "soon"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Validation rejects semantically broken values even when they parse.
#[test]
fn load_and_validate_surfaces_semantic_errors() {
    let toml = r#"
[service]
port = 0
log_level = "loud"

[search]
top_k = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 3);
}

/// Environment variables override file values, with section mapping that
/// keeps underscore-bearing key names intact.
#[test]
fn env_vars_override_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "qissa.toml",
            r#"
[service]
port = 3000

[video_fluid]
poll_interval_secs = 5
"#,
        )?;
        jail.set_env("QISSA_SERVICE_PORT", "4000");
        jail.set_env("QISSA_VIDEO_FLUID_POLL_INTERVAL_SECS", "2");

        let config = qissa_config::load_config().expect("config should load");
        assert_eq!(config.service.port, 4000);
        assert_eq!(config.video_fluid.poll_interval_secs, 2);
        Ok(())
    });
}
