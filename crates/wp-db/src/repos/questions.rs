//! Question bank repository.
//!
//! The bank is read-only to the assessment lifecycle. Seeding is the only
//! writer and is idempotent: questions are keyed by stable ids.

use wp_core::entities::Question;
use wp_core::enums::{AuditAction, Category, EntityType};
use wp_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::{get_u32, parse_enum, parse_json, to_json};
use crate::seed::default_questions;
use crate::service::WpService;

const SELECT_COLS: &str = "id, text, category, scoring_type, scoring_key, position, active, options";

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    Ok(Question {
        id: row.get(0)?,
        text: row.get(1)?,
        category: parse_enum(&row.get::<String>(2)?)?,
        scoring_type: parse_enum(&row.get::<String>(3)?)?,
        scoring_key: row.get(4)?,
        position: get_u32(row, 5)?,
        active: row.get::<i64>(6)? != 0,
        options: parse_json(&row.get::<String>(7)?)?,
    })
}

impl WpService {
    /// List questions in bank order, optionally restricted to one category
    /// and to active questions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_questions(
        &self,
        category: Option<Category>,
        active_only: bool,
    ) -> Result<Vec<Question>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(category) = category {
            params.push(category.as_str().into());
            conditions.push(format!("category = ?{}", params.len()));
        }
        if active_only {
            conditions.push("active = 1".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM questions {where_clause} ORDER BY position, id"),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut questions = Vec::new();
        while let Some(row) = rows.next().await? {
            questions.push(row_to_question(&row)?);
        }
        Ok(questions)
    }

    /// Fetch one question.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub async fn get_question(&self, id: &str) -> Result<Question, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM questions WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found("question", id))?;
        row_to_question(&row)
    }

    /// Insert questions that are not yet present. Returns how many were new.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an insert fails.
    pub async fn insert_questions(&self, questions: &[Question]) -> Result<u32, DatabaseError> {
        let mut inserted = 0;
        for q in questions {
            let changed = self
                .db()
                .conn()
                .execute(
                    &format!(
                        "INSERT OR IGNORE INTO questions ({SELECT_COLS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                    ),
                    libsql::params![
                        q.id.as_str(),
                        q.text.as_str(),
                        q.category.as_str(),
                        q.scoring_type.as_str(),
                        q.scoring_key.as_str(),
                        i64::from(q.position),
                        i64::from(q.active),
                        to_json(&q.options)?
                    ],
                )
                .await?;
            if changed > 0 {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Seed the embedded default bank. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the embedded bank is malformed or an insert fails.
    pub async fn seed_default_questions(&self) -> Result<u32, DatabaseError> {
        let bank = default_questions()?;
        let inserted = self.insert_questions(&bank).await?;
        if inserted > 0 {
            self.record(
                None,
                EntityType::Question,
                "default",
                AuditAction::Seeded,
                Some(serde_json::json!({ "inserted": inserted })),
            )
            .await;
            tracing::info!(inserted, "seeded default question bank");
        }
        Ok(inserted)
    }

    /// Toggle a question's active flag.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub async fn set_question_active(&self, id: &str, active: bool) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE questions SET active = ?1 WHERE id = ?2",
                libsql::params![i64::from(active), id],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found("question", id).into());
        }
        Ok(())
    }
}
