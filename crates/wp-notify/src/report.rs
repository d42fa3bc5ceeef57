//! Completion report rendering.

use std::fmt::Write as _;

use wp_core::entities::{Assessment, CareerAnalysis, UserProfile};
use wp_core::enums::AssessmentStatus;

use crate::error::NotifyError;

/// Turns a completed assessment into a document attached to the
/// completion email.
pub trait ReportRenderer: Send + Sync {
    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str;

    /// # Errors
    ///
    /// [`NotifyError::Render`] when the assessment cannot be reported on.
    fn render(
        &self,
        assessment: &Assessment,
        user: &UserProfile,
        analysis: &CareerAnalysis,
    ) -> Result<Vec<u8>, NotifyError>;
}

/// Plain-text report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportRenderer;

fn bullet_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{heading}");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

impl ReportRenderer for TextReportRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render(
        &self,
        assessment: &Assessment,
        user: &UserProfile,
        analysis: &CareerAnalysis,
    ) -> Result<Vec<u8>, NotifyError> {
        if assessment.status != AssessmentStatus::Completed {
            return Err(NotifyError::Render(format!(
                "assessment {} is {}, not completed",
                assessment.id, assessment.status
            )));
        }

        let mut out = String::with_capacity(4096);
        out.push_str("WAYPOINT CAREER REPORT\n======================\n\n");
        let _ = writeln!(out, "Student: {}", user.name);
        if let Some(class) = &user.class_level {
            let _ = writeln!(out, "Class: {class}");
        }
        if let Some(completed_at) = assessment.completed_at {
            let _ = writeln!(out, "Completed: {}", completed_at.format("%Y-%m-%d"));
        }

        let _ = writeln!(out, "\n{}", analysis.summary);

        out.push_str("\nInterest profile (RIASEC)\n");
        for (kind, score) in assessment.scores.riasec.ranked() {
            let _ = writeln!(out, "  {:<14} {score:>3}/100", kind.label());
        }
        let _ = writeln!(
            out,
            "\nDominant: {}  Secondary: {}",
            analysis.riasec_profile.dominant_trait, analysis.riasec_profile.secondary_trait
        );

        let _ = writeln!(out, "\nRecommended stream: {}", analysis.recommended_stream.primary);
        if !analysis.recommended_stream.reasoning.is_empty() {
            let _ = writeln!(out, "  {}", analysis.recommended_stream.reasoning);
        }

        out.push_str("\nCareer paths\n");
        for (rank, path) in analysis.career_paths.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({}% match)", rank + 1, path.title, path.match_score);
            if !path.required_education.is_empty() {
                let _ = writeln!(out, "     Education: {}", path.required_education);
            }
            if !path.entrance_exams.is_empty() {
                let _ = writeln!(out, "     Exams: {}", path.entrance_exams.join(", "));
            }
        }

        bullet_list(&mut out, "Strengths", &analysis.strengths);
        bullet_list(&mut out, "Areas to develop", &analysis.development_areas);
        bullet_list(&mut out, "Next 3 months", &analysis.action_plan.short_term);
        bullet_list(&mut out, "Next 1-2 years", &analysis.action_plan.medium_term);
        bullet_list(&mut out, "Longer term", &analysis.action_plan.long_term);

        Ok(out.into_bytes())
    }
}
