use std::path::Path;

use wp_ai::testing::ScriptedModel;
use wp_config::WaypointConfig;
use wp_core::entities::{ResponseSubmission, UserProfile};
use wp_db::repos::users::NewUser;
use wp_db::service::WpService;

use crate::context::AppContext;

pub const GENERATED_ANALYSIS: &str = r#"{
    "summary": "Curious and caring.",
    "riasecProfile": {"dominantTrait": "Investigative", "secondaryTrait": "Social"},
    "recommendedStream": {"primary": "Science (PCB)"},
    "careerPaths": [
        {"title": "Doctor", "matchScore": 94},
        {"title": "Biotechnologist", "matchScore": 90},
        {"title": "Counsellor", "matchScore": 82}
    ]
}"#;

/// In-memory context with the default bank seeded and the outbox under
/// `project_root`.
pub async fn test_context(model: ScriptedModel, project_root: &Path) -> AppContext<ScriptedModel> {
    let service = WpService::new_local(":memory:").await.unwrap();
    service.seed_default_questions().await.unwrap();
    let mut config = WaypointConfig::default();
    config.database.path = ":memory:".into();
    AppContext::from_parts(service, config, model, project_root.to_path_buf())
}

pub async fn register(ctx: &AppContext<ScriptedModel>, name: &str) -> UserProfile {
    ctx.service
        .register_user(&NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            class_level: Some("10".into()),
            age: Some(15),
        })
        .await
        .unwrap()
}

/// Register a student and answer the whole bank (all but one question when
/// `leave_one` is set). Returns the user and the assessment id.
pub async fn completed_assessment(ctx: &AppContext<ScriptedModel>, leave_one: bool) -> (UserProfile, String) {
    let user = register(ctx, "Asha").await;
    let started = ctx.service.start_assessment(&user.id).await.unwrap();
    let mut answers: Vec<ResponseSubmission> = ctx
        .service
        .list_questions(None, true)
        .await
        .unwrap()
        .into_iter()
        .map(|q| ResponseSubmission {
            question_id: q.id,
            answer: "agree".into(),
            score: 75.0,
        })
        .collect();
    if leave_one {
        answers.pop();
    }
    ctx.service
        .save_responses(&user.id, &started.assessment.id, &answers)
        .await
        .unwrap();
    (user, started.assessment.id)
}
