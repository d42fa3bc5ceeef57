//! Career analysis: prompt, model call with retry, parse, rule-based fallback.

pub mod fallback;
pub mod parse;
pub mod prompt;

use chrono::{DateTime, Utc};
use wp_core::entities::{Assessment, CareerAnalysis, UserProfile};
use wp_core::enums::{AnalysisSource, AssessmentStatus};
use wp_core::errors::CoreError;
use wp_core::responses::AnalysisResponse;
use wp_core::scores::Scores;

use crate::model::GenerativeModel;
use crate::resilient::{Outcome, RetryPolicy, generate_or_fallback};

pub use fallback::{fallback_analysis, recommend_stream};
pub use parse::{parse_analysis, strip_code_fences};
pub use prompt::build_analysis_prompt;

/// Produces career analyses from assessment scores.
pub struct AnalysisGenerator<M> {
    model: M,
    policy: RetryPolicy,
}

impl<M: GenerativeModel> AnalysisGenerator<M> {
    pub const fn new(model: M, policy: RetryPolicy) -> Self {
        Self { model, policy }
    }

    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Generate a fresh analysis. Never fails: any model problem yields the
    /// rule-based analysis as [`Outcome::Fallback`].
    pub async fn generate(&self, scores: &Scores, profile: &UserProfile) -> Outcome<CareerAnalysis> {
        let prompt = build_analysis_prompt(scores, profile);
        generate_or_fallback(&self.model, &prompt, &self.policy, parse_analysis, || {
            fallback_analysis(scores, profile)
        })
        .await
    }

    /// The analysis for a completed assessment.
    ///
    /// A stored analysis is returned as-is (`cached = true`, no model call)
    /// unless `regenerate` is set. The caller persists non-cached results.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the assessment is not completed.
    pub async fn analysis_for(
        &self,
        assessment: &Assessment,
        profile: &UserProfile,
        regenerate: bool,
        now: DateTime<Utc>,
    ) -> Result<AnalysisResponse, CoreError> {
        if assessment.status != AssessmentStatus::Completed {
            return Err(CoreError::InvalidState(format!(
                "assessment {} is {}; analysis needs a completed assessment",
                assessment.id, assessment.status
            )));
        }

        if !regenerate {
            if let Some(stored) = &assessment.ai_analysis {
                return Ok(AnalysisResponse {
                    assessment_id: assessment.id.clone(),
                    analysis: stored.clone(),
                    source: assessment.analysis_source.unwrap_or(AnalysisSource::Ai),
                    generated_at: assessment.ai_analysis_generated_at.unwrap_or(assessment.updated_at),
                    cached: true,
                });
            }
        }

        let outcome = self.generate(&assessment.scores, profile).await;
        let source = if outcome.is_fallback() {
            AnalysisSource::RuleBased
        } else {
            AnalysisSource::Ai
        };
        tracing::info!(assessment_id = %assessment.id, %source, "career analysis generated");

        Ok(AnalysisResponse {
            assessment_id: assessment.id.clone(),
            analysis: outcome.into_value(),
            source,
            generated_at: now,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use crate::testing::ScriptedModel;
    use pretty_assertions::assert_eq;

    const GENERATED: &str = r#"```json
    {
        "summary": "Generated summary.",
        "riasecProfile": {"dominantTrait": "Investigative", "secondaryTrait": "Social"},
        "recommendedStream": {"primary": "Science (PCB)"},
        "careerPaths": [
            {"title": "Doctor", "matchScore": 94},
            {"title": "Biotechnologist", "matchScore": 90},
            {"title": "Counsellor", "matchScore": 82}
        ]
    }
    ```"#;

    fn profile() -> UserProfile {
        UserProfile {
            id: "usr-1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            class_level: Some("10".into()),
            age: Some(15),
            created_at: Utc::now(),
        }
    }

    fn completed() -> Assessment {
        let mut a = Assessment::new("asm-1", "usr-1", Utc::now());
        a.status = AssessmentStatus::Completed;
        a.scores.riasec.investigative = 82;
        a.scores.riasec.social = 75;
        a
    }

    #[tokio::test]
    async fn uses_model_output_when_valid() {
        let generator = AnalysisGenerator::new(ScriptedModel::always(GENERATED, 1), RetryPolicy::default());

        let response = generator.analysis_for(&completed(), &profile(), false, Utc::now()).await.unwrap();

        assert_eq!(response.source, AnalysisSource::Ai);
        assert!(!response.cached);
        assert_eq!(response.analysis.recommended_stream.primary, "Science (PCB)");
        assert!(generator.model().prompts()[0].contains("investigative: 82/100"));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_model_falls_back_to_top_two_traits() {
        let model = ScriptedModel::new((0..4).map(|_| Err(AiError::RateLimited { retry_after_secs: None })));
        let generator = AnalysisGenerator::new(model, RetryPolicy::default());
        let start = tokio::time::Instant::now();

        let response = generator.analysis_for(&completed(), &profile(), false, Utc::now()).await.unwrap();

        assert_eq!(response.source, AnalysisSource::RuleBased);
        assert_eq!(generator.model().calls(), 4);
        assert!(start.elapsed() >= std::time::Duration::from_secs(7));
        assert_eq!(response.analysis.career_paths[0].title, "Research Scientist");
        assert_eq!(response.analysis.career_paths[1].title, "Psychologist / Counsellor");
    }

    #[tokio::test]
    async fn stored_analysis_is_returned_without_a_call() {
        let generator = AnalysisGenerator::new(ScriptedModel::default(), RetryPolicy::default());
        let mut assessment = completed();
        let stored = fallback_analysis(&assessment.scores, &profile());
        let generated_at = Utc::now();
        assessment.ai_analysis = Some(stored.clone());
        assessment.analysis_source = Some(AnalysisSource::RuleBased);
        assessment.ai_analysis_generated_at = Some(generated_at);

        let response = generator.analysis_for(&assessment, &profile(), false, Utc::now()).await.unwrap();

        assert!(response.cached);
        assert_eq!(response.analysis, stored);
        assert_eq!(response.source, AnalysisSource::RuleBased);
        assert_eq!(response.generated_at, generated_at);
        assert_eq!(generator.model().calls(), 0);
    }

    #[tokio::test]
    async fn regenerate_bypasses_the_stored_analysis() {
        let generator = AnalysisGenerator::new(ScriptedModel::always(GENERATED, 1), RetryPolicy::default());
        let mut assessment = completed();
        assessment.ai_analysis = Some(fallback_analysis(&assessment.scores, &profile()));

        let response = generator.analysis_for(&assessment, &profile(), true, Utc::now()).await.unwrap();

        assert!(!response.cached);
        assert_eq!(response.analysis.summary, "Generated summary.");
        assert_eq!(generator.model().calls(), 1);
    }

    #[tokio::test]
    async fn incomplete_assessment_is_rejected() {
        let generator = AnalysisGenerator::new(ScriptedModel::default(), RetryPolicy::default());
        let assessment = Assessment::new("asm-1", "usr-1", Utc::now());

        let result = generator.analysis_for(&assessment, &profile(), false, Utc::now()).await;

        assert!(matches!(result, Err(CoreError::InvalidState(_))));
        assert_eq!(generator.model().calls(), 0);
    }
}
