//! Response types returned as JSON by `waypoint` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Assessment, CareerAnalysis, ChatMessage, ProgressMap};
use crate::enums::{AnalysisSource, AssessmentStatus};
use crate::scores::Scores;

/// Response from `waypoint assessment start`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentStartResponse {
    pub assessment: Assessment,
    /// `true` when an already-active assessment was returned instead of a new one.
    pub resumed: bool,
}

/// Response from `waypoint assessment save` and `waypoint assessment progress`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub assessment_id: String,
    pub status: AssessmentStatus,
    pub questions_answered: u32,
    pub total_questions: u32,
    pub completion_percentage: u8,
    pub category_progress: ProgressMap,
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl From<&Assessment> for ProgressResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            assessment_id: assessment.id.clone(),
            status: assessment.status,
            questions_answered: assessment.questions_answered,
            total_questions: crate::enums::TOTAL_QUESTIONS,
            completion_percentage: assessment.completion_percentage,
            category_progress: assessment.category_progress,
            last_saved_at: assessment.last_saved_at,
        }
    }
}

/// Response from `waypoint assessment submit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub assessment_id: String,
    pub status: AssessmentStatus,
    pub scores: Scores,
    pub completed_at: Option<DateTime<Utc>>,
    /// `false` when the assessment had already been submitted.
    pub newly_completed: bool,
}

/// Response from `waypoint assessment analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub assessment_id: String,
    pub analysis: CareerAnalysis,
    pub source: AnalysisSource,
    pub generated_at: DateTime<Utc>,
    /// `true` when a stored analysis was returned without calling the model.
    pub cached: bool,
}

/// Response from `waypoint chat send`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    pub session_id: String,
    pub reply: ChatMessage,
    /// `true` when the reply came from the offline fallback.
    pub fallback: bool,
}
