use serde::Serialize;
use wp_core::entities::{Assessment, ResponseSubmission};
use wp_core::responses::ProgressResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AssessmentCommands;
use crate::commands::shared::parse::{parse_answer, read_answers_file};
use crate::context::AppContext;
use crate::output::output;
use crate::workflows;

#[derive(Debug, Serialize)]
struct AssessmentListResponse {
    assessments: Vec<Assessment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AbandonStaleResponse {
    abandoned: Vec<String>,
    idle_hours: u32,
}

/// Handle `waypoint assessment`.
pub async fn handle(
    action: &AssessmentCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AssessmentCommands::Start { user } => output(&ctx.service.start_assessment(user).await?, flags.format),
        AssessmentCommands::Save {
            id,
            user,
            answer,
            answers_file,
        } => {
            let submissions = collect_submissions(answer, answers_file.as_deref())?;
            let assessment = ctx.service.save_responses(user, id, &submissions).await?;
            output(&ProgressResponse::from(&assessment), flags.format)
        }
        AssessmentCommands::Submit { id, user } => {
            let response = workflows::assessment::submit(ctx, user, id).await?;
            output(&response, flags.format)
        }
        AssessmentCommands::Get { id, user } => {
            output(&ctx.service.get_assessment_for_user(user, id).await?, flags.format)
        }
        AssessmentCommands::List { user } => {
            ctx.service.get_user(user).await?;
            let assessments = ctx.service.list_assessments(user).await?;
            output(&AssessmentListResponse { assessments }, flags.format)
        }
        AssessmentCommands::Progress { id, user } => {
            let assessment = ctx.service.get_assessment_for_user(user, id).await?;
            output(&ProgressResponse::from(&assessment), flags.format)
        }
        AssessmentCommands::Abandon { id, user } => {
            let assessment = ctx.service.abandon_assessment(user, id).await?;
            output(&ProgressResponse::from(&assessment), flags.format)
        }
        AssessmentCommands::AbandonStale { idle_hours } => {
            let abandoned = ctx
                .service
                .abandon_stale_assessments(chrono::Duration::hours(i64::from(*idle_hours)))
                .await?;
            output(
                &AbandonStaleResponse {
                    abandoned,
                    idle_hours: *idle_hours,
                },
                flags.format,
            )
        }
        AssessmentCommands::Analysis { id, user, regenerate } => {
            let response = workflows::assessment::analysis(ctx, user, id, *regenerate).await?;
            output(&response, flags.format)
        }
    }
}

fn collect_submissions(answers: &[String], answers_file: Option<&str>) -> anyhow::Result<Vec<ResponseSubmission>> {
    let mut submissions = match answers_file {
        Some(path) => read_answers_file(path)?,
        None => Vec::new(),
    };
    for raw in answers {
        submissions.push(parse_answer(raw)?);
    }
    if submissions.is_empty() {
        anyhow::bail!("no answers given; pass --answer QUESTION_ID=ANSWER:SCORE or --answers-file");
    }
    Ok(submissions)
}

#[cfg(test)]
mod tests {
    use super::collect_submissions;

    #[test]
    fn inline_answers_are_collected_in_order() {
        let answers = vec!["qst-int01=agree:75".to_string(), "qst-int02=disagree:25".to_string()];
        let submissions = collect_submissions(&answers, None).unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[1].question_id, "qst-int02");
    }

    #[test]
    fn nothing_to_save_is_an_error() {
        let err = collect_submissions(&[], None).unwrap_err();
        assert!(err.to_string().contains("no answers given"));
    }
}
