//! Chat session repository.
//!
//! One active session per user, enforced by a partial unique index.
//! Clearing history deactivates the session; nothing is deleted.

use chrono::Utc;

use wp_core::entities::{ChatMessage, ChatSession, ContextSnapshot};
use wp_core::enums::{AuditAction, EntityType};
use wp_core::errors::CoreError;
use wp_core::ids::PREFIX_CHAT;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{parse_datetime, parse_enum, parse_json, to_json};
use crate::service::WpService;

const SELECT_COLS: &str = "id, user_id, context, active, created_at, updated_at";

fn row_to_session(row: &libsql::Row) -> Result<ChatSession, DatabaseError> {
    Ok(ChatSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        messages: Vec::new(),
        context: parse_json(&row.get::<String>(2)?)?,
        active: row.get::<i64>(3)? != 0,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl WpService {
    async fn load_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT role, content, created_at FROM chat_messages WHERE session_id = ?1 ORDER BY id",
                [session_id],
            )
            .await?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(ChatMessage {
                role: parse_enum(&row.get::<String>(0)?)?,
                content: row.get(1)?,
                timestamp: parse_datetime(&row.get::<String>(2)?)?,
            });
        }
        Ok(messages)
    }

    async fn query_sessions(
        &self,
        where_clause: &str,
        params: Vec<libsql::Value>,
        with_messages: bool,
    ) -> Result<Vec<ChatSession>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM chat_sessions {where_clause}"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        if with_messages {
            for session in &mut sessions {
                session.messages = self.load_messages(&session.id).await?;
            }
        }
        Ok(sessions)
    }

    /// Fetch a session with its messages.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub async fn get_chat_session(&self, id: &str) -> Result<ChatSession, DatabaseError> {
        self.query_sessions("WHERE id = ?1", vec![id.into()], true)
            .await?
            .pop()
            .ok_or_else(|| CoreError::not_found("chat_session", id).into())
    }

    /// The user's active session, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_active_chat(&self, user_id: &str) -> Result<Option<ChatSession>, DatabaseError> {
        Ok(self
            .query_sessions("WHERE user_id = ?1 AND active = 1", vec![user_id.into()], true)
            .await?
            .pop())
    }

    /// The user's active session, created on first use.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn get_or_create_active_chat(&self, user_id: &str) -> Result<ChatSession, DatabaseError> {
        if let Some(session) = self.find_active_chat(user_id).await? {
            return Ok(session);
        }
        match self.create_chat_session(user_id).await {
            Ok(session) => Ok(session),
            Err(e) if e.is_conflict() => self.find_active_chat(user_id).await?.ok_or(e),
            Err(e) => Err(e),
        }
    }

    async fn create_chat_session(&self, user_id: &str) -> Result<ChatSession, DatabaseError> {
        self.get_user(user_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CHAT).await?;
        let context = ContextSnapshot::default();

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!("INSERT INTO chat_sessions ({SELECT_COLS}) VALUES (?1, ?2, ?3, 1, ?4, ?4)"),
                libsql::params![id.as_str(), user_id, to_json(&context)?, now.to_rfc3339()],
            )
            .await;
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(format!(
                    "user {user_id} already has an active chat session"
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        self.record(Some(user_id), EntityType::ChatSession, &id, AuditAction::Created, None)
            .await;

        Ok(ChatSession {
            id,
            user_id: user_id.to_string(),
            messages: Vec::new(),
            context,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Append messages to a session in order.
    ///
    /// # Errors
    ///
    /// `NotFound` if the session is unknown, `InvalidState` if it is no
    /// longer active.
    pub async fn append_chat_messages(
        &self,
        session_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), DatabaseError> {
        let session = self
            .query_sessions("WHERE id = ?1", vec![session_id.into()], false)
            .await?
            .pop()
            .ok_or_else(|| CoreError::not_found("chat_session", session_id))?;
        if !session.active {
            return Err(CoreError::InvalidState(format!("chat session {session_id} is closed")).into());
        }

        for message in messages {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO chat_messages (session_id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![
                        session_id,
                        message.role.as_str(),
                        message.content.as_str(),
                        message.timestamp.to_rfc3339()
                    ],
                )
                .await?;
        }
        self.touch_chat(session_id).await
    }

    /// Replace a session's context snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` if the session is unknown.
    pub async fn update_chat_context(
        &self,
        session_id: &str,
        context: &ContextSnapshot,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE chat_sessions SET context = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![to_json(context)?, Utc::now().to_rfc3339(), session_id],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found("chat_session", session_id).into());
        }
        Ok(())
    }

    /// Deactivate the user's active session and open a fresh one.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn reset_chat(&self, user_id: &str) -> Result<ChatSession, DatabaseError> {
        let previous = self.find_active_chat(user_id).await?;
        if let Some(ref previous) = previous {
            self.db()
                .conn()
                .execute(
                    "UPDATE chat_sessions SET active = 0, updated_at = ?1 WHERE id = ?2 AND active = 1",
                    libsql::params![Utc::now().to_rfc3339(), previous.id.as_str()],
                )
                .await?;
            self.record(
                Some(user_id),
                EntityType::ChatSession,
                &previous.id,
                AuditAction::ChatReset,
                Some(serde_json::json!({ "messages": previous.messages.len() })),
            )
            .await;
        }
        self.get_or_create_active_chat(user_id).await
    }

    /// Messages of the user's active session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn chat_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, DatabaseError> {
        Ok(self
            .find_active_chat(user_id)
            .await?
            .map(|s| s.messages)
            .unwrap_or_default())
    }

    /// Every session the user has had, newest first, without messages.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_chat_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, DatabaseError> {
        self.query_sessions("WHERE user_id = ?1 ORDER BY rowid DESC", vec![user_id.into()], false)
            .await
    }

    async fn touch_chat(&self, session_id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE chat_sessions SET updated_at = ?1 WHERE id = ?2",
                libsql::params![Utc::now().to_rfc3339(), session_id],
            )
            .await?;
        Ok(())
    }
}
