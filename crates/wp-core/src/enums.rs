//! Status enums, categories, scoring types, and audit vocabulary for Waypoint.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AssessmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an assessment.
///
/// ```text
/// not_started → in_progress → completed
///             ↘ abandoned   ↘ abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    NotStarted,
    InProgress,
    Completed,
    Abandoned,
}

impl AssessmentStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NotStarted => &[Self::InProgress, Self::Abandoned],
            Self::InProgress => &[Self::Completed, Self::Abandoned],
            Self::Completed | Self::Abandoned => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `not_started` and `in_progress` count against the one-active-per-user rule.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Question category. Each category has a fixed question quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Interest,
    Aptitude,
    Personality,
    Academic,
}

impl Category {
    /// All categories in presentation order.
    pub const ALL: [Self; 4] = [
        Self::Interest,
        Self::Aptitude,
        Self::Personality,
        Self::Academic,
    ];

    /// Number of questions a student must answer to complete this category.
    #[must_use]
    pub const fn quota(self) -> u32 {
        match self {
            Self::Interest | Self::Personality | Self::Academic => 20,
            Self::Aptitude => 25,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interest => "interest",
            Self::Aptitude => "aptitude",
            Self::Personality => "personality",
            Self::Academic => "academic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total questions across all category quotas.
pub const TOTAL_QUESTIONS: u32 = Category::Interest.quota()
    + Category::Aptitude.quota()
    + Category::Personality.quota()
    + Category::Academic.quota();

// ---------------------------------------------------------------------------
// ScoringType
// ---------------------------------------------------------------------------

/// Which score map a question's answer is accumulated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    Riasec,
    BigFive,
    Aptitude,
    Academic,
}

impl ScoringType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Riasec => "riasec",
            Self::BigFive => "big_five",
            Self::Aptitude => "aptitude",
            Self::Academic => "academic",
        }
    }
}

impl fmt::Display for ScoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiasecType
// ---------------------------------------------------------------------------

/// The six Holland (RIASEC) interest types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiasecType {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl RiasecType {
    pub const ALL: [Self; 6] = [
        Self::Realistic,
        Self::Investigative,
        Self::Artistic,
        Self::Social,
        Self::Enterprising,
        Self::Conventional,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Investigative => "investigative",
            Self::Artistic => "artistic",
            Self::Social => "social",
            Self::Enterprising => "enterprising",
            Self::Conventional => "conventional",
        }
    }

    /// Capitalized display label, e.g. `"Investigative"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Investigative => "Investigative",
            Self::Artistic => "Artistic",
            Self::Social => "Social",
            Self::Enterprising => "Enterprising",
            Self::Conventional => "Conventional",
        }
    }
}

impl fmt::Display for RiasecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ChatRole
// ---------------------------------------------------------------------------

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnalysisSource
// ---------------------------------------------------------------------------

/// Where a stored career analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Generated by the external model.
    Ai,
    /// Produced by the deterministic rule-based fallback.
    RuleBased,
}

impl AnalysisSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::RuleBased => "rule_based",
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity kinds referenced by the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Question,
    Assessment,
    ChatSession,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Question => "question",
            Self::Assessment => "assessment",
            Self::ChatSession => "chat_session",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    ResponsesSaved,
    StatusChanged,
    AnalysisStored,
    ChatReset,
    Seeded,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ResponsesSaved => "responses_saved",
            Self::StatusChanged => "status_changed",
            Self::AnalysisStored => "analysis_stored",
            Self::ChatReset => "chat_reset",
            Self::Seeded => "seeded",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
