//! Completion notification configuration.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_from_address() -> String {
    String::from("reports@waypoint.local")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Whether submit dispatches the report + email job at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory the outbox mailer writes messages into. Empty means
    /// `.waypoint/outbox` under the project root.
    #[serde(default)]
    pub outbox_dir: String,

    /// Sender address stamped on completion emails.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            outbox_dir: String::new(),
            from_address: default_from_address(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = NotifyConfig::default();
        assert!(config.enabled);
        assert!(config.outbox_dir.is_empty());
        assert_eq!(config.from_address, "reports@waypoint.local");
    }
}
