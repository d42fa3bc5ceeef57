//! Notification error types.

use thiserror::Error;
use wp_core::errors::CoreError;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The report could not be produced.
    #[error("render error: {0}")]
    Render(String),

    /// The message could not be handed to the transport.
    #[error("delivery error: {0}")]
    Delivery(String),
}

impl From<NotifyError> for CoreError {
    fn from(e: NotifyError) -> Self {
        Self::ExternalService(e.to_string())
    }
}
