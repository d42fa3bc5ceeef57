use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Dominant and secondary Holland types with a short narrative.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiasecProfile {
    pub dominant_trait: String,
    pub secondary_trait: String,
    #[serde(default)]
    pub description: String,
}

/// Recommended senior-secondary stream plus alternatives.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedStream {
    pub primary: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// One ranked career suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Fit estimate in percent.
    pub match_score: u8,
    #[serde(default)]
    pub required_education: String,
    #[serde(default)]
    pub entrance_exams: Vec<String>,
    #[serde(default)]
    pub top_colleges: Vec<String>,
}

/// Three-horizon action plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    #[serde(default)]
    pub short_term: Vec<String>,
    #[serde(default)]
    pub medium_term: Vec<String>,
    #[serde(default)]
    pub long_term: Vec<String>,
}

/// A link to further reading or a guidance portal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// The career report attached to a completed assessment.
///
/// Both the model-generated and the rule-based analysis produce this exact
/// shape, so consumers never need to know which path ran.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CareerAnalysis {
    pub summary: String,
    pub riasec_profile: RiasecProfile,
    pub recommended_stream: RecommendedStream,
    pub career_paths: Vec<CareerPath>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub development_areas: Vec<String>,
    #[serde(default)]
    pub action_plan: ActionPlan,
    #[serde(default)]
    pub resources: Vec<Resource>,
}
