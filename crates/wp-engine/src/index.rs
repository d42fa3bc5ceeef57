//! Question bank snapshot indexed by question id.

use std::collections::HashMap;

use wp_core::entities::Question;

/// Borrowed lookup table over a question bank snapshot.
pub struct QuestionIndex<'a> {
    by_id: HashMap<&'a str, &'a Question>,
}

impl<'a> QuestionIndex<'a> {
    #[must_use]
    pub fn new(questions: &'a [Question]) -> Self {
        let by_id = questions.iter().map(|q| (q.id.as_str(), q)).collect();
        Self { by_id }
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&'a Question> {
        self.by_id.get(question_id).copied()
    }
}
