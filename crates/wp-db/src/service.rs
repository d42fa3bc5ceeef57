//! Service layer wrapping the database handle.
//!
//! `WpService` owns a `WpDb`; every repository is an `impl WpService` block
//! and records an audit entry for each mutation it performs.

use serde_json::Value;
use wp_core::entities::AuditEntry;
use wp_core::enums::{AuditAction, EntityType};
use wp_core::ids::PREFIX_AUDIT;

use crate::WpDb;
use crate::error::DatabaseError;

/// Entry point for all Waypoint persistence operations.
pub struct WpService {
    db: WpDb,
}

impl WpService {
    /// Open a local database and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: WpDb::open_local(db_path).await?,
        })
    }

    /// Wrap an existing handle.
    #[must_use]
    pub const fn from_db(db: WpDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &WpDb {
        &self.db
    }

    /// Append an audit entry for a mutation that just happened.
    ///
    /// The mutation is already committed, so a failed audit write is logged
    /// and never surfaces as an error of the operation.
    pub(crate) async fn record(
        &self,
        user_id: Option<&str>,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<Value>,
    ) {
        if let Err(error) = self.try_record(user_id, entity_type, entity_id, action, detail).await {
            tracing::warn!(%entity_type, entity_id, %action, %error, "failed to append audit entry");
        }
    }

    async fn try_record(
        &self,
        user_id: Option<&str>,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<Value>,
    ) -> Result<(), DatabaseError> {
        let id = self.db.generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id,
            user_id: user_id.map(String::from),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: chrono::Utc::now(),
        })
        .await
    }
}
