//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use wp_config::WaypointConfig;

#[test]
fn loads_ai_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[ai]
api_key = "toml-key"
model = "gemini-1.5-pro"
timeout_secs = 45

[ai.retry]
max_retries = 5
base_delay_ms = 500
"#,
        )?;

        let config: WaypointConfig = Figment::from(Serialized::defaults(WaypointConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ai.api_key, "toml-key");
        assert_eq!(config.ai.model, "gemini-1.5-pro");
        assert_eq!(config.ai.timeout_secs, 45);
        assert_eq!(config.ai.retry.max_retries, 5);
        assert_eq!(config.ai.retry.base_delay_ms, 500);
        assert_eq!(config.ai.retry.max_delay_ms, 10_000);
        assert!(config.ai.is_configured());
        Ok(())
    });
}

#[test]
fn loads_chat_and_notify_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[chat]
history_window = 6

[notify]
enabled = false
outbox_dir = "/tmp/outbox"
"#,
        )?;

        let config: WaypointConfig = Figment::from(Serialized::defaults(WaypointConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.chat.history_window, 6);
        assert_eq!(config.chat.max_message_chars, 2000);
        assert!(!config.notify.enabled);
        assert_eq!(config.notify.outbox_dir, "/tmp/outbox");
        assert_eq!(config.notify.from_address, "reports@waypoint.local");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[ai]
api_key = "from-toml"
"#,
        )?;
        jail.set_env("WAYPOINT_AI__API_KEY", "from-env");
        jail.set_env("WAYPOINT_AI__RETRY__MAX_RETRIES", "1");

        let config: WaypointConfig = Figment::from(Serialized::defaults(WaypointConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("WAYPOINT_").split("__"))
            .extract()?;

        assert_eq!(config.ai.api_key, "from-env");
        assert_eq!(config.ai.retry.max_retries, 1);
        Ok(())
    });
}

#[test]
fn load_reads_project_local_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".waypoint")?;
        jail.create_file(
            ".waypoint/config.toml",
            r#"
[database]
path = "custom.db"
"#,
        )?;

        let config = WaypointConfig::load().expect("config loads");
        assert_eq!(config.database.path, "custom.db");
        Ok(())
    });
}

#[test]
fn load_rejects_invalid_retry_settings() {
    Jail::expect_with(|jail| {
        jail.set_env("WAYPOINT_AI__RETRY__BASE_DELAY_MS", "60000");
        assert!(WaypointConfig::load().is_err());
        Ok(())
    });
}
