//! Chat assistant configuration.

use serde::{Deserialize, Serialize};

/// Prior turns replayed to the model on each message.
const fn default_history_window() -> usize {
    10
}

const fn default_max_message_chars() -> usize {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// How many prior turns are sent as conversational context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Inbound messages longer than this are rejected.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ChatConfig::default();
        assert_eq!(config.history_window, 10);
        assert_eq!(config.max_message_chars, 2000);
    }
}
