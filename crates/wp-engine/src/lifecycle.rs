//! Status transitions that need more than a field write.

use chrono::{DateTime, Utc};
use wp_core::entities::Assessment;
use wp_core::enums::{AssessmentStatus, TOTAL_QUESTIONS};
use wp_core::errors::CoreError;

use crate::index::QuestionIndex;
use crate::scoring::compute_scores;

/// Move an assessment to `completed` and stamp its scores.
///
/// Returns `Ok(false)` without touching anything when the assessment is
/// already completed, so a repeated submit keeps the original scores and
/// `completed_at`.
///
/// # Errors
///
/// `InvalidState` for abandoned or never-started assessments, `Validation`
/// when fewer than all questions are answered.
pub fn complete(
    assessment: &mut Assessment,
    questions: &QuestionIndex<'_>,
    now: DateTime<Utc>,
) -> Result<bool, CoreError> {
    match assessment.status {
        AssessmentStatus::Completed => return Ok(false),
        AssessmentStatus::InProgress => {}
        other => {
            return Err(CoreError::InvalidState(format!(
                "cannot submit assessment {} from {other}",
                assessment.id
            )));
        }
    }

    if assessment.questions_answered < TOTAL_QUESTIONS {
        return Err(CoreError::Validation(format!(
            "{} of {TOTAL_QUESTIONS} questions answered",
            assessment.questions_answered
        )));
    }

    assessment.scores = compute_scores(&assessment.responses, questions);
    assessment.status = AssessmentStatus::Completed;
    assessment.completion_percentage = 100;
    assessment.completed_at = Some(now);
    assessment.updated_at = now;
    Ok(true)
}

/// Move a non-terminal assessment to `abandoned`.
///
/// # Errors
///
/// `InvalidState` if the assessment is already completed or abandoned.
pub fn abandon(assessment: &mut Assessment, now: DateTime<Utc>) -> Result<(), CoreError> {
    if !assessment.status.can_transition_to(AssessmentStatus::Abandoned) {
        return Err(CoreError::InvalidState(format!(
            "cannot abandon assessment {} from {}",
            assessment.id, assessment.status
        )));
    }
    assessment.status = AssessmentStatus::Abandoned;
    assessment.updated_at = now;
    Ok(())
}
