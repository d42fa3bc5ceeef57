//! # wp-engine
//!
//! Pure assessment logic for Waypoint:
//! - [`merge`]: fold partial answer submissions into an assessment, idempotently
//! - [`progress`]: per-category and overall completion
//! - [`scoring`]: reduce responses into the four fixed-shape score maps
//! - [`lifecycle`]: submit and abandon transitions
//!
//! Nothing here touches storage or the clock; callers pass `now` and a
//! question bank snapshot, so every result can be re-derived for audits.

pub mod index;
pub mod lifecycle;
pub mod merge;
pub mod progress;
pub mod scoring;

pub use index::QuestionIndex;
pub use lifecycle::{abandon, complete};
pub use merge::{
    MergeStats, apply_submissions, completion_percentage, merge_responses, recompute,
    validate_submissions,
};
pub use progress::{compute_progress, is_complete};
pub use scoring::compute_scores;

#[cfg(test)]
pub(crate) mod test_support {
    use wp_core::entities::{AnswerOption, Question};
    use wp_core::enums::{Category, ScoringType};

    pub fn question(id: &str, category: Category, scoring_type: ScoringType, key: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {id}"),
            category,
            scoring_type,
            scoring_key: key.to_string(),
            position: 0,
            active: true,
            options: vec![AnswerOption {
                label: "Agree".into(),
                value: "agree".into(),
                score: 75.0,
            }],
        }
    }

    /// A bank matching the real quotas: 20 interest, 25 aptitude,
    /// 20 personality, 20 academic.
    pub fn full_bank() -> Vec<Question> {
        let mut bank = Vec::new();
        let riasec = ["realistic", "investigative", "artistic", "social", "enterprising", "conventional"];
        for i in 0..20 {
            bank.push(question(&format!("int-{i}"), Category::Interest, ScoringType::Riasec, riasec[i % 6]));
        }
        let aptitude = [
            "numerical", "verbal", "spatial", "logical", "technical", "analytical", "creative", "attention",
            "critical",
        ];
        for i in 0..25 {
            bank.push(question(&format!("apt-{i}"), Category::Aptitude, ScoringType::Aptitude, aptitude[i % 9]));
        }
        let big_five = ["extraversion", "agreeableness", "conscientiousness", "emotional_stability", "openness"];
        for i in 0..20 {
            bank.push(question(&format!("per-{i}"), Category::Personality, ScoringType::BigFive, big_five[i % 5]));
        }
        let academic = [
            "mathematics", "science", "languages", "social_studies", "computer_science", "study_time",
            "learning_confidence",
        ];
        for i in 0..20 {
            bank.push(question(&format!("aca-{i}"), Category::Academic, ScoringType::Academic, academic[i % 7]));
        }
        bank
    }
}
