use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitResponse {
    project_root: String,
    database: String,
    questions_seeded: u32,
    ai_configured: bool,
}

/// Handle `waypoint init`. Opening the context already created the database
/// and ran migrations; this adds the marker directory and the question bank.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let marker = ctx.project_root.join(".waypoint");
    tokio::fs::create_dir_all(&marker).await?;
    let questions_seeded = ctx.service.seed_default_questions().await?;

    output(
        &InitResponse {
            project_root: ctx.project_root.display().to_string(),
            database: ctx.config.database.path.clone(),
            questions_seeded,
            ai_configured: ctx.config.ai.is_configured(),
        },
        flags.format,
    )
}
