//! Completion email delivery.

use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use wp_config::NotifyConfig;
use wp_core::entities::UserProfile;

use crate::error::NotifyError;

/// A report ready to be sent.
#[derive(Debug, Clone)]
pub struct ReportAttachment {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Proof of hand-off to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub recipient: String,
}

pub trait Mailer: Send + Sync {
    /// # Errors
    ///
    /// [`NotifyError`] if the message could not be handed off.
    fn send_completion_email(
        &self,
        user: &UserProfile,
        report: &ReportAttachment,
    ) -> impl Future<Output = Result<DeliveryReceipt, NotifyError>> + Send;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboxMessage<'a> {
    message_id: &'a str,
    from: &'a str,
    to: &'a str,
    subject: String,
    body: String,
    attachment_filename: &'a str,
    attachment_content_type: &'a str,
    queued_at: String,
}

/// Writes each message as a JSON envelope plus the attachment into a local
/// outbox directory for a relay to pick up.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
    from: String,
}

impl OutboxMailer {
    pub fn new(dir: impl Into<PathBuf>, from: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            from: from.into(),
        }
    }

    /// Outbox from the `[notify]` section. An empty `outbox_dir` resolves to
    /// `.waypoint/outbox` under `project_root`.
    #[must_use]
    pub fn from_config(config: &NotifyConfig, project_root: &Path) -> Self {
        let dir = if config.outbox_dir.is_empty() {
            project_root.join(".waypoint").join("outbox")
        } else {
            PathBuf::from(&config.outbox_dir)
        };
        Self::new(dir, config.from_address.clone())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Mailer for OutboxMailer {
    async fn send_completion_email(
        &self,
        user: &UserProfile,
        report: &ReportAttachment,
    ) -> Result<DeliveryReceipt, NotifyError> {
        if user.email.trim().is_empty() {
            return Err(NotifyError::Delivery(format!("user {} has no email address", user.id)));
        }

        let now = Utc::now();
        let message_id = format!("{}-{}", now.format("%Y%m%dT%H%M%S%.3f"), user.id);
        let envelope = OutboxMessage {
            message_id: &message_id,
            from: &self.from,
            to: &user.email,
            subject: "Your Waypoint career report is ready".to_string(),
            body: format!(
                "Hi {},\n\nThank you for completing the Waypoint assessment. \
                 Your personalised career report is attached.\n",
                user.name
            ),
            attachment_filename: &report.filename,
            attachment_content_type: report.content_type,
            queued_at: now.to_rfc3339(),
        };

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(format!("{message_id}.report")), &report.bytes).await?;
        tokio::fs::write(
            self.dir.join(format!("{message_id}.json")),
            serde_json::to_vec_pretty(&envelope)?,
        )
        .await?;

        tracing::debug!(%message_id, to = %user.email, dir = %self.dir.display(), "completion email queued");
        Ok(DeliveryReceipt {
            message_id,
            recipient: user.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::student;
    use pretty_assertions::assert_eq;

    fn attachment() -> ReportAttachment {
        ReportAttachment {
            filename: "waypoint-report.txt".into(),
            content_type: "text/plain; charset=utf-8",
            bytes: b"report body".to_vec(),
        }
    }

    #[tokio::test]
    async fn writes_envelope_and_attachment() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mailer = OutboxMailer::new(tmp.path().join("outbox"), "reports@waypoint.local");

        let receipt = mailer.send_completion_email(&student(), &attachment()).await.unwrap();

        assert_eq!(receipt.recipient, "asha@example.com");
        let envelope = std::fs::read_to_string(mailer.dir().join(format!("{}.json", receipt.message_id))).unwrap();
        let json: serde_json::Value = serde_json::from_str(&envelope).unwrap();
        assert_eq!(json["to"], "asha@example.com");
        assert_eq!(json["from"], "reports@waypoint.local");
        assert_eq!(json["attachmentFilename"], "waypoint-report.txt");
        let bytes = std::fs::read(mailer.dir().join(format!("{}.report", receipt.message_id))).unwrap();
        assert_eq!(bytes, b"report body");
    }

    #[test]
    fn default_outbox_lives_under_project_dir() {
        let mailer = OutboxMailer::from_config(&NotifyConfig::default(), Path::new("/srv/app"));
        assert_eq!(mailer.dir(), Path::new("/srv/app/.waypoint/outbox"));
    }

    #[tokio::test]
    async fn missing_address_is_a_delivery_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mailer = OutboxMailer::new(tmp.path(), "reports@waypoint.local");
        let mut user = student();
        user.email = String::new();

        let result = mailer.send_completion_email(&user, &attachment()).await;

        assert!(matches!(result, Err(NotifyError::Delivery(_))));
    }
}
