//! User profile repository.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use wp_core::entities::UserProfile;
use wp_core::enums::{AuditAction, EntityType};
use wp_core::errors::CoreError;
use wp_core::ids::PREFIX_USER;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{get_opt_string, get_opt_u32, parse_datetime};
use crate::service::WpService;

const SELECT_COLS: &str = "id, name, email, class_level, age, created_at";

/// Input for [`WpService::register_user`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub class_level: Option<String>,
    pub age: Option<u32>,
}

fn row_to_user(row: &libsql::Row) -> Result<UserProfile, DatabaseError> {
    Ok(UserProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        class_level: get_opt_string(row, 3)?,
        age: get_opt_u32(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl WpService {
    /// Create a user profile.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name or malformed email, `Conflict` if the
    /// email is already registered.
    pub async fn register_user(&self, input: &NewUser) -> Result<UserProfile, DatabaseError> {
        let name = input.name.trim();
        let email = input.email.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("name must not be empty".into()).into());
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(CoreError::Validation(format!("invalid email: {email}")).into());
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        let class_level = input.class_level.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    name,
                    email,
                    class_level,
                    input.age.map(i64::from),
                    now.to_rfc3339()
                ],
            )
            .await;
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(format!("email {email} is already registered")).into());
            }
            Err(e) => return Err(e.into()),
        }

        self.record(Some(&id), EntityType::User, &id, AuditAction::Created, None)
            .await;
        tracing::info!(user_id = %id, "user registered");

        Ok(UserProfile {
            id,
            name: name.to_string(),
            email: email.to_string(),
            class_level: class_level.map(String::from),
            age: input.age,
            created_at: now,
        })
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such user exists.
    pub async fn get_user(&self, id: &str) -> Result<UserProfile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found("user", id))?;
        row_to_user(&row)
    }

    /// Fetch a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE lower(email) = lower(?1)"),
                [email.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
