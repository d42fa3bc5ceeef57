use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimal student profile read by analysis prompts, chat context, and the
/// completion email.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    /// School class / grade, e.g. `"10"` or `"12"`.
    pub class_level: Option<String>,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}
