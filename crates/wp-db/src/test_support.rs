//! Shared fixtures for wp-db tests.

use wp_core::entities::{ResponseSubmission, UserProfile};

use crate::WpDb;
use crate::repos::users::NewUser;
use crate::service::WpService;

/// In-memory service with the default question bank seeded.
pub async fn test_service() -> WpService {
    let svc = WpService::from_db(WpDb::open_local(":memory:").await.unwrap());
    svc.seed_default_questions().await.unwrap();
    svc
}

/// In-memory service with no questions.
pub async fn empty_service() -> WpService {
    WpService::from_db(WpDb::open_local(":memory:").await.unwrap())
}

pub async fn register(svc: &WpService, name: &str) -> UserProfile {
    svc.register_user(&NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        class_level: Some("10".into()),
        age: Some(15),
    })
    .await
    .unwrap()
}

/// One `agree` answer per active question, in bank order.
pub async fn answer_everything(svc: &WpService, score: f64) -> Vec<ResponseSubmission> {
    svc.list_questions(None, true)
        .await
        .unwrap()
        .into_iter()
        .map(|q| ResponseSubmission {
            question_id: q.id,
            answer: "agree".into(),
            score,
        })
        .collect()
}
