//! Cross-cutting error types for Waypoint.
//!
//! This module defines the domain error taxonomy shared by every crate.
//! Infrastructure errors (`DatabaseError`, `AiError`, `NotifyError`) are
//! defined in their respective crates; the database layer wraps `CoreError`
//! transparently so callers can still tell a conflict from a missing record.

use thiserror::Error;

/// Errors that can be raised by any Waypoint crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or invalid caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity lookup returned no result, or the entity belongs to someone else.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A uniqueness rule would be violated (e.g. a second active assessment).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The entity is in a state that does not permit the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An external collaborator (AI model, report renderer, mailer) failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a `NotFound` on the given entity kind.
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}
