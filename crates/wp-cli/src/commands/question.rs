use serde::Serialize;
use wp_core::entities::Question;
use wp_core::enums::Category;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::QuestionCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct QuestionListResponse {
    questions: Vec<Question>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct SeedResponse {
    inserted: u32,
}

/// Handle `waypoint question`.
pub async fn handle(action: &QuestionCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        QuestionCommands::List { category, all } => {
            let category = category
                .as_deref()
                .map(|value| parse_enum::<Category>(value, "category"))
                .transpose()?;
            let questions = ctx.service.list_questions(category, !all).await?;
            let total = questions.len();
            output(&QuestionListResponse { questions, total }, flags.format)
        }
        QuestionCommands::Seed => {
            let inserted = ctx.service.seed_default_questions().await?;
            output(&SeedResponse { inserted }, flags.format)
        }
    }
}
