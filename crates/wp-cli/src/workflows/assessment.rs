use std::sync::Arc;

use chrono::Utc;
use wp_ai::{AnalysisGenerator, GenerativeModel};
use wp_core::entities::{Assessment, UserProfile};
use wp_core::responses::{AnalysisResponse, SubmitResponse};
use wp_db::service::WpService;
use wp_notify::spawn_detached;

use crate::context::{AppContext, Notifier};

/// Submit an assessment. On first completion the analysis, report, and
/// email run on a detached job tracked by `ctx`; the submit result never
/// depends on them.
pub async fn submit<M: GenerativeModel + 'static>(
    ctx: &mut AppContext<M>,
    user_id: &str,
    assessment_id: &str,
) -> anyhow::Result<SubmitResponse> {
    let (assessment, response) = ctx.service.submit_assessment(user_id, assessment_id).await?;

    if response.newly_completed {
        let user = ctx.service.get_user(user_id).await?;
        let handle = spawn_detached(
            "assessment_completed",
            after_completion(
                Arc::clone(&ctx.service),
                Arc::clone(&ctx.analysis),
                ctx.notifier.clone(),
                assessment,
                user,
            ),
        );
        ctx.track(handle);
    }

    Ok(response)
}

/// Generate and store the analysis if none exists yet, then send the report.
async fn after_completion<M: GenerativeModel>(
    service: Arc<WpService>,
    generator: Arc<AnalysisGenerator<Arc<M>>>,
    notifier: Option<Arc<Notifier>>,
    assessment: Assessment,
    user: UserProfile,
) -> anyhow::Result<()> {
    let generated = generator.analysis_for(&assessment, &user, false, Utc::now()).await?;
    if !generated.cached {
        service
            .store_analysis(&assessment.id, &generated.analysis, generated.source, generated.generated_at)
            .await?;
    }

    if let Some(notifier) = notifier {
        notifier.notify(&assessment, &user, &generated.analysis).await?;
    }
    Ok(())
}

/// The career analysis of a completed assessment, generated and stored on
/// first request or when `regenerate` is set.
pub async fn analysis<M: GenerativeModel>(
    ctx: &AppContext<M>,
    user_id: &str,
    assessment_id: &str,
    regenerate: bool,
) -> anyhow::Result<AnalysisResponse> {
    let assessment = ctx.service.get_assessment_for_user(user_id, assessment_id).await?;
    let user = ctx.service.get_user(user_id).await?;

    let response = ctx.analysis.analysis_for(&assessment, &user, regenerate, Utc::now()).await?;
    if !response.cached {
        ctx.service
            .store_analysis(&assessment.id, &response.analysis, response.source, response.generated_at)
            .await?;
    }
    Ok(response)
}
