use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChatRole;
use crate::scores::AptitudeScores;

/// One turn in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Assessment-derived facts used to ground chat replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    /// Assessment the snapshot was taken from.
    pub assessment_id: Option<String>,
    /// Top three RIASEC type labels, strongest first.
    #[serde(default)]
    pub interests: Vec<String>,
    pub aptitudes: Option<AptitudeScores>,
    pub name: Option<String>,
    pub class_level: Option<String>,
    pub age: Option<u32>,
}

impl ContextSnapshot {
    /// True when no completed assessment has been folded in yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assessment_id.is_none()
    }
}

/// A conversation with the career assistant. At most one is active per user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub messages: Vec<ChatMessage>,
    pub context: ContextSnapshot,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
