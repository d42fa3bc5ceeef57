//! Reduce a response set into the four score maps.

use std::collections::HashMap;

use wp_core::entities::Response;
use wp_core::enums::ScoringType;
use wp_core::scores::Scores;

use crate::index::QuestionIndex;

#[derive(Default)]
struct Bucket {
    sum: f64,
    count: u32,
}

/// Compute every bucket as the rounded mean of the scores that feed it.
///
/// Responses whose question is missing from the snapshot, or whose
/// `scoring_key` is not part of the selected map, are skipped. Buckets with no
/// contributions stay at zero.
#[must_use]
pub fn compute_scores(responses: &[Response], questions: &QuestionIndex<'_>) -> Scores {
    let mut buckets: HashMap<(ScoringType, &str), Bucket> = HashMap::new();

    for response in responses {
        let Some(question) = questions.get(&response.question_id) else {
            tracing::debug!(question_id = %response.question_id, "skipping response to unknown question");
            continue;
        };
        let key = question.scoring_key.as_str();
        if !Scores::accepts(question.scoring_type, key) {
            tracing::debug!(
                question_id = %question.id,
                scoring_type = %question.scoring_type,
                scoring_key = key,
                "skipping response with unknown scoring key"
            );
            continue;
        }
        let bucket = buckets.entry((question.scoring_type, key)).or_default();
        bucket.sum += response.score;
        bucket.count += 1;
    }

    let mut scores = Scores::default();
    for ((scoring_type, key), bucket) in buckets {
        scores.set(scoring_type, key, rounded_mean(bucket.sum, bucket.count));
    }
    scores
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_mean(sum: f64, count: u32) -> u32 {
    let mean = sum / f64::from(count.max(1));
    mean.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
