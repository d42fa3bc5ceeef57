use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, ScoringType};

/// One selectable answer and the score it contributes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub label: String,
    pub value: String,
    pub score: f64,
}

/// A scoring question from the question bank.
///
/// Questions are read-only to the assessment lifecycle; `scoring_type` and
/// `scoring_key` select the bucket the answer score is accumulated into.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub scoring_type: ScoringType,
    pub scoring_key: String,
    pub position: u32,
    pub active: bool,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}
