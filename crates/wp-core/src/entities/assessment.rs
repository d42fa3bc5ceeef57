use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CareerAnalysis;
use crate::enums::{AnalysisSource, AssessmentStatus, Category};
use crate::scores::Scores;

/// A stored answer. Unique per `(assessment, question_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: String,
    pub answer: String,
    pub score: f64,
    pub answered_at: DateTime<Utc>,
}

/// A partial answer submitted by the client, before it is merged.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSubmission {
    pub question_id: String,
    pub answer: String,
    pub score: f64,
}

/// Completion counter for one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CategoryProgress {
    pub total: u32,
    pub answered: u32,
    pub completed: bool,
}

impl CategoryProgress {
    /// Empty progress for a category, `total` set to its quota.
    #[must_use]
    pub const fn empty(category: Category) -> Self {
        Self {
            total: category.quota(),
            answered: 0,
            completed: false,
        }
    }
}

/// Per-category progress for all four categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProgressMap {
    pub interest: CategoryProgress,
    pub aptitude: CategoryProgress,
    pub personality: CategoryProgress,
    pub academic: CategoryProgress,
}

impl Default for ProgressMap {
    fn default() -> Self {
        Self {
            interest: CategoryProgress::empty(Category::Interest),
            aptitude: CategoryProgress::empty(Category::Aptitude),
            personality: CategoryProgress::empty(Category::Personality),
            academic: CategoryProgress::empty(Category::Academic),
        }
    }
}

impl ProgressMap {
    #[must_use]
    pub const fn get(&self, category: Category) -> &CategoryProgress {
        match category {
            Category::Interest => &self.interest,
            Category::Aptitude => &self.aptitude,
            Category::Personality => &self.personality,
            Category::Academic => &self.academic,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryProgress {
        match category {
            Category::Interest => &mut self.interest,
            Category::Aptitude => &mut self.aptitude,
            Category::Personality => &mut self.personality,
            Category::Academic => &mut self.academic,
        }
    }

    /// Whether every category reached its quota.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).completed)
    }
}

/// A student's run through the question battery.
///
/// `questions_answered` and `completion_percentage` are derived from
/// `responses` on every save and are never taken from client input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub user_id: String,
    pub status: AssessmentStatus,
    pub responses: Vec<Response>,
    pub category_progress: ProgressMap,
    pub questions_answered: u32,
    pub completion_percentage: u8,
    pub started_at: Option<DateTime<Utc>>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub scores: Scores,
    pub ai_analysis: Option<CareerAnalysis>,
    pub analysis_source: Option<AnalysisSource>,
    pub ai_analysis_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    /// A fresh, unsaved assessment in `not_started`.
    #[must_use]
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            status: AssessmentStatus::NotStarted,
            responses: Vec::new(),
            category_progress: ProgressMap::default(),
            questions_answered: 0,
            completion_percentage: 0,
            started_at: None,
            last_saved_at: None,
            completed_at: None,
            scores: Scores::default(),
            ai_analysis: None,
            analysis_source: None,
            ai_analysis_generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up the stored response for a question.
    #[must_use]
    pub fn response_for(&self, question_id: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }
}
