//! The embedded default question bank.

use wp_core::entities::Question;

use crate::error::DatabaseError;

/// 85 questions: 20 interest, 25 aptitude, 20 personality, 20 academic.
const DEFAULT_QUESTIONS: &str = include_str!("../seed/questions.json");

/// Decode the embedded bank.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the embedded JSON is malformed.
pub fn default_questions() -> Result<Vec<Question>, DatabaseError> {
    crate::helpers::parse_json(DEFAULT_QUESTIONS)
}
