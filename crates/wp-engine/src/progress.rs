//! Per-category and overall completion.

use wp_core::entities::{ProgressMap, Response};
use wp_core::enums::{Category, TOTAL_QUESTIONS};

use crate::index::QuestionIndex;

/// Count answered questions per category.
///
/// Each response is attributed to the category of its own question, so the
/// order in which a client walks the battery does not matter. Responses to
/// questions outside the bank snapshot are not counted toward any category.
#[must_use]
pub fn compute_progress(responses: &[Response], questions: &QuestionIndex<'_>) -> ProgressMap {
    let mut progress = ProgressMap::default();

    for response in responses {
        if let Some(question) = questions.get(&response.question_id) {
            progress.get_mut(question.category).answered += 1;
        }
    }

    for category in Category::ALL {
        let entry = progress.get_mut(category);
        entry.completed = entry.answered >= entry.total;
    }

    progress
}

/// Whether `answered` covers the full battery.
#[must_use]
pub const fn is_complete(answered: u32) -> bool {
    answered >= TOTAL_QUESTIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::full_bank;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn answer(question_id: &str) -> Response {
        Response {
            question_id: question_id.to_string(),
            answer: "agree".into(),
            score: 75.0,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn responses_count_toward_their_own_category() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let responses = vec![answer("per-0"), answer("int-3"), answer("aca-1"), answer("per-4")];

        let progress = compute_progress(&responses, &index);

        assert_eq!(progress.interest.answered, 1);
        assert_eq!(progress.aptitude.answered, 0);
        assert_eq!(progress.personality.answered, 2);
        assert_eq!(progress.academic.answered, 1);
        assert!(!progress.all_completed());
    }

    #[test]
    fn category_completes_at_quota() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let responses: Vec<Response> = (0..20).map(|i| answer(&format!("int-{i}"))).collect();

        let progress = compute_progress(&responses, &index);

        assert!(progress.interest.completed);
        assert_eq!(progress.interest.total, 20);
        assert!(!progress.aptitude.completed);
    }

    #[test]
    fn full_battery_completes_every_category() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let responses: Vec<Response> = bank.iter().map(|q| answer(&q.id)).collect();

        let progress = compute_progress(&responses, &index);

        assert!(progress.all_completed());
        assert!(is_complete(u32::try_from(responses.len()).unwrap()));
    }

    #[test]
    fn unknown_questions_are_ignored() {
        let bank = full_bank();
        let index = QuestionIndex::new(&bank);
        let progress = compute_progress(&[answer("qst-missing")], &index);
        assert_eq!(progress, ProgressMap::default());
    }
}
