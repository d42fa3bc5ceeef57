//! Merge partial answer submissions into an assessment.

use chrono::{DateTime, Utc};
use wp_core::entities::{Assessment, Response, ResponseSubmission};
use wp_core::enums::{AssessmentStatus, TOTAL_QUESTIONS};
use wp_core::errors::CoreError;

use crate::index::QuestionIndex;
use crate::progress::compute_progress;

/// Counts of what a merge did to the response set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: u32,
    pub updated: u32,
}

/// `round(100 * answered / total)` clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn completion_percentage(answered: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(answered) * 100.0 / f64::from(total)).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Fold submissions into `responses` keyed by question id.
///
/// An existing response is replaced in place with `answered_at` refreshed;
/// anything else is appended. Replaying the same batch leaves the set
/// unchanged apart from timestamps.
pub fn merge_responses(
    responses: &mut Vec<Response>,
    submissions: &[ResponseSubmission],
    now: DateTime<Utc>,
) -> MergeStats {
    let mut stats = MergeStats::default();

    for submission in submissions {
        let incoming = Response {
            question_id: submission.question_id.clone(),
            answer: submission.answer.clone(),
            score: submission.score,
            answered_at: now,
        };
        match responses.iter_mut().find(|r| r.question_id == submission.question_id) {
            Some(existing) => {
                *existing = incoming;
                stats.updated += 1;
            }
            None => {
                responses.push(incoming);
                stats.inserted += 1;
            }
        }
    }

    stats
}

/// Reject malformed batches before anything is touched.
///
/// # Errors
///
/// `Validation` for an empty batch, a blank answer or a score outside
/// `[0, 100]`; `NotFound` for a question id that is not in the active bank.
pub fn validate_submissions(
    submissions: &[ResponseSubmission],
    questions: &QuestionIndex<'_>,
) -> Result<(), CoreError> {
    if submissions.is_empty() {
        return Err(CoreError::Validation("no responses submitted".into()));
    }
    for submission in submissions {
        if submission.question_id.trim().is_empty() {
            return Err(CoreError::Validation("questionId must not be empty".into()));
        }
        if submission.answer.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "answer for {} must not be blank",
                submission.question_id
            )));
        }
        if !submission.score.is_finite() || !(0.0..=100.0).contains(&submission.score) {
            return Err(CoreError::Validation(format!(
                "score {} for {} is outside [0, 100]",
                submission.score, submission.question_id
            )));
        }
        if !questions.get(&submission.question_id).is_some_and(|q| q.active) {
            return Err(CoreError::not_found("question", &submission.question_id));
        }
    }
    Ok(())
}

/// Validate and merge a batch into `assessment`, then recompute every
/// derived field.
///
/// A `not_started` assessment moves to `in_progress` and gets `started_at`.
///
/// # Errors
///
/// `InvalidState` if the assessment is completed or abandoned, plus any
/// error from [`validate_submissions`].
pub fn apply_submissions(
    assessment: &mut Assessment,
    submissions: &[ResponseSubmission],
    questions: &QuestionIndex<'_>,
    now: DateTime<Utc>,
) -> Result<MergeStats, CoreError> {
    if assessment.status.is_terminal() {
        return Err(CoreError::InvalidState(format!(
            "assessment {} is {} and no longer accepts responses",
            assessment.id, assessment.status
        )));
    }
    validate_submissions(submissions, questions)?;

    if assessment.status == AssessmentStatus::NotStarted {
        assessment.status = AssessmentStatus::InProgress;
        assessment.started_at.get_or_insert(now);
    }

    let stats = merge_responses(&mut assessment.responses, submissions, now);
    recompute(assessment, questions);
    assessment.last_saved_at = Some(now);
    assessment.updated_at = now;

    Ok(stats)
}

/// Re-derive counters and progress from the response set.
pub fn recompute(assessment: &mut Assessment, questions: &QuestionIndex<'_>) {
    let answered = u32::try_from(assessment.responses.len()).unwrap_or(u32::MAX);
    assessment.questions_answered = answered;
    assessment.completion_percentage = completion_percentage(answered, TOTAL_QUESTIONS);
    assessment.category_progress = compute_progress(&assessment.responses, questions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_scores;
    use crate::test_support::full_bank;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn submit(question_id: &str, answer: &str, score: f64) -> ResponseSubmission {
        ResponseSubmission {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
            score,
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(42, 49)]
    #[case(43, 51)]
    #[case(84, 99)]
    #[case(85, 100)]
    #[case(90, 100)]
    fn percentage_rounds_and_clamps(#[case] answered: u32, #[case] expected: u8) {
        assert_eq!(completion_percentage(answered, TOTAL_QUESTIONS), expected);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(completion_percentage(5, 0), 0);
    }

    #[test]
    fn merge_replaces_in_place_and_appends() {
        let t0 = Utc::now();
        let mut responses = Vec::new();
        let stats = merge_responses(
            &mut responses,
            &[submit("a", "agree", 75.0), submit("b", "neutral", 50.0)],
            t0,
        );
        assert_eq!(stats, MergeStats { inserted: 2, updated: 0 });

        let t1 = t0 + chrono::Duration::seconds(5);
        let stats = merge_responses(&mut responses, &[submit("a", "disagree", 25.0)], t1);
        assert_eq!(stats, MergeStats { inserted: 0, updated: 1 });

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].question_id, "a");
        assert_eq!(responses[0].answer, "disagree");
        assert_eq!(responses[0].answered_at, t1);
        assert_eq!(responses[1].answered_at, t0);
    }

    #[test]
    fn resubmission_is_idempotent() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();
        let mut assessment = Assessment::new("asm-1", "usr-1", now);
        let batch = vec![submit("int-0", "agree", 75.0), submit("apt-2", "yes", 100.0)];

        apply_submissions(&mut assessment, &batch, &index, now).unwrap();
        let first_scores = compute_scores(&assessment.responses, &index);
        apply_submissions(&mut assessment, &batch, &index, now).unwrap();

        assert_eq!(assessment.questions_answered, 2);
        assert_eq!(compute_scores(&assessment.responses, &index), first_scores);
    }

    #[test]
    fn percentage_is_monotonic_across_merges() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();
        let mut assessment = Assessment::new("asm-1", "usr-1", now);
        let mut last = 0;

        for chunk in bank.chunks(7) {
            let batch: Vec<_> = chunk.iter().map(|q| submit(&q.id, "agree", 75.0)).collect();
            apply_submissions(&mut assessment, &batch, &index, now).unwrap();
            assert!(assessment.completion_percentage >= last);
            last = assessment.completion_percentage;
        }

        assert_eq!(assessment.completion_percentage, 100);
        assert!(assessment.category_progress.all_completed());
    }

    #[test]
    fn first_save_starts_a_not_started_assessment() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();
        let mut assessment = Assessment::new("asm-1", "usr-1", now);

        apply_submissions(&mut assessment, &[submit("int-0", "agree", 75.0)], &index, now).unwrap();

        assert_eq!(assessment.status, AssessmentStatus::InProgress);
        assert_eq!(assessment.started_at, Some(now));
        assert_eq!(assessment.last_saved_at, Some(now));
        assert_eq!(assessment.completion_percentage, 1);
    }

    #[rstest]
    #[case(AssessmentStatus::Completed)]
    #[case(AssessmentStatus::Abandoned)]
    fn terminal_assessments_reject_saves(#[case] status: AssessmentStatus) {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let mut assessment = Assessment::new("asm-1", "usr-1", Utc::now());
        assessment.status = status;

        let result = apply_submissions(&mut assessment, &[submit("int-0", "agree", 75.0)], &index, Utc::now());

        assert!(matches!(result, Err(CoreError::InvalidState(_))));
        assert!(assessment.responses.is_empty());
    }

    #[rstest]
    #[case::empty_answer(submit("int-0", "  ", 50.0))]
    #[case::negative_score(submit("int-0", "agree", -1.0))]
    #[case::score_above_range(submit("int-0", "agree", 100.5))]
    #[case::nan_score(submit("int-0", "agree", f64::NAN))]
    fn invalid_submissions_are_rejected(#[case] bad: ResponseSubmission) {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let result = validate_submissions(&[bad], &index);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        assert!(matches!(validate_submissions(&[], &index), Err(CoreError::Validation(_))));
    }

    #[test]
    fn unknown_or_inactive_question_is_not_found() {
        let mut bank = full_bank();
        bank[0].active = false;
        let index = QuestionIndex::new(&bank);

        let unknown = validate_submissions(&[submit("qst-nope", "agree", 10.0)], &index);
        let inactive = validate_submissions(&[submit("int-0", "agree", 10.0)], &index);

        assert!(matches!(unknown, Err(CoreError::NotFound { .. })));
        assert!(matches!(inactive, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn failed_validation_leaves_assessment_untouched() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();
        let mut assessment = Assessment::new("asm-1", "usr-1", now);

        let result = apply_submissions(
            &mut assessment,
            &[submit("int-0", "agree", 75.0), submit("int-1", "", 10.0)],
            &index,
            now,
        );

        assert!(result.is_err());
        assert_eq!(assessment.status, AssessmentStatus::NotStarted);
        assert!(assessment.responses.is_empty());
    }
}
