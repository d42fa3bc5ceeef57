//! Best-effort delivery of the completion report.
//!
//! Nothing here reports failure to the caller of `submit`: the work runs on a
//! detached task and errors only reach the logs.

use std::future::Future;

use tokio::task::JoinHandle;
use wp_core::entities::{Assessment, CareerAnalysis, UserProfile};

use crate::error::NotifyError;
use crate::mailer::{DeliveryReceipt, Mailer, ReportAttachment};
use crate::report::ReportRenderer;

/// Render the report and hand it to the mailer.
pub struct CompletionNotifier<R, M> {
    renderer: R,
    mailer: M,
}

impl<R: ReportRenderer, M: Mailer> CompletionNotifier<R, M> {
    pub const fn new(renderer: R, mailer: M) -> Self {
        Self { renderer, mailer }
    }

    /// # Errors
    ///
    /// Whatever the renderer or mailer reported.
    pub async fn notify(
        &self,
        assessment: &Assessment,
        user: &UserProfile,
        analysis: &CareerAnalysis,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let bytes = self.renderer.render(assessment, user, analysis)?;
        let attachment = ReportAttachment {
            filename: format!("waypoint-report-{}.txt", assessment.id),
            content_type: self.renderer.content_type(),
            bytes,
        };
        let receipt = self.mailer.send_completion_email(user, &attachment).await?;
        tracing::info!(
            assessment_id = %assessment.id,
            message_id = %receipt.message_id,
            "completion report sent"
        );
        Ok(receipt)
    }
}

/// Run `job` on a detached task. Failures are logged, never returned.
///
/// The handle is only for callers that want to wait before exiting; dropping
/// it does not cancel the job.
pub fn spawn_detached<F, T, E>(job: &'static str, work: F) -> JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    E: std::fmt::Display,
{
    tokio::spawn(async move {
        match work.await {
            Ok(_) => tracing::debug!(job, "background job finished"),
            Err(error) => tracing::warn!(job, %error, "background job failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::OutboxMailer;
    use crate::report::TextReportRenderer;
    use crate::test_support::{completed_assessment, sample_analysis, student};
    use wp_core::enums::AssessmentStatus;

    #[tokio::test]
    async fn notify_renders_and_queues() {
        let tmp = tempfile::TempDir::new().unwrap();
        let notifier = CompletionNotifier::new(
            TextReportRenderer,
            OutboxMailer::new(tmp.path(), "reports@waypoint.local"),
        );

        let receipt = notifier
            .notify(&completed_assessment(), &student(), &sample_analysis())
            .await
            .unwrap();

        let report = std::fs::read_to_string(tmp.path().join(format!("{}.report", receipt.message_id))).unwrap();
        assert!(report.contains("Research Scientist"));
    }

    #[tokio::test]
    async fn dispatched_failure_is_swallowed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let notifier = CompletionNotifier::new(
            TextReportRenderer,
            OutboxMailer::new(tmp.path(), "reports@waypoint.local"),
        );
        let mut assessment = completed_assessment();
        assessment.status = AssessmentStatus::InProgress;

        let handle = spawn_detached("completion_report", async move {
            notifier.notify(&assessment, &student(), &sample_analysis()).await
        });

        assert!(handle.await.is_ok());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn spawn_detached_runs_to_completion() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = spawn_detached("oneshot", async move {
            tx.send(7).map_err(|_| "receiver dropped")
        });
        handle.await.unwrap();
        assert_eq!(rx.await.unwrap(), 7);
    }
}
