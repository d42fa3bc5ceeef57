//! # wp-notify
//!
//! Completion report and email for Waypoint. Rendering and delivery sit
//! behind [`ReportRenderer`] and [`Mailer`]; the bundled implementations
//! produce a plain-text report and write messages into a local outbox.
//! Everything is best-effort and runs detached from the submit that
//! triggered it.

pub mod dispatch;
pub mod error;
pub mod mailer;
pub mod report;

#[cfg(test)]
mod test_support;

pub use dispatch::{CompletionNotifier, spawn_detached};
pub use error::NotifyError;
pub use mailer::{DeliveryReceipt, Mailer, OutboxMailer, ReportAttachment};
pub use report::{ReportRenderer, TextReportRenderer};
