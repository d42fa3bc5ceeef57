//! Assessment repository.
//!
//! Loads an assessment with its responses, applies `wp-engine` rules, and
//! writes the result back. Status-changing writes carry a `WHERE status = ..`
//! guard so a concurrent writer cannot move a record twice, and the partial
//! unique index on active assessments turns a racing second `start` into a
//! `Conflict` that [`WpService::start_assessment`] resolves by resuming.

use chrono::{DateTime, Duration, Utc};

use wp_core::entities::{Assessment, CareerAnalysis, Response, ResponseSubmission};
use wp_core::enums::{AnalysisSource, AssessmentStatus, AuditAction, EntityType};
use wp_core::errors::CoreError;
use wp_core::ids::PREFIX_ASSESSMENT;
use wp_core::responses::{AssessmentStartResponse, SubmitResponse};
use wp_engine::QuestionIndex;

use crate::error::{DatabaseError, is_unique_violation};
use crate::helpers::{
    get_opt_string, get_u32, parse_datetime, parse_enum, parse_json, parse_optional_datetime,
    parse_optional_json, to_json,
};
use crate::service::WpService;

const SELECT_COLS: &str = "id, user_id, status, category_progress, questions_answered, \
    completion_percentage, started_at, last_saved_at, completed_at, scores, ai_analysis, \
    analysis_source, ai_analysis_generated_at, created_at, updated_at";

const ACTIVE_STATUSES: &str = "('not_started', 'in_progress')";

fn row_to_assessment(row: &libsql::Row) -> Result<Assessment, DatabaseError> {
    let pct = get_u32(row, 5)?;
    Ok(Assessment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: parse_enum(&row.get::<String>(2)?)?,
        responses: Vec::new(),
        category_progress: parse_json(&row.get::<String>(3)?)?,
        questions_answered: get_u32(row, 4)?,
        completion_percentage: u8::try_from(pct.min(100)).unwrap_or(100),
        started_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        last_saved_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        scores: parse_json(&row.get::<String>(9)?)?,
        ai_analysis: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        analysis_source: get_opt_string(row, 11)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        ai_analysis_generated_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
        updated_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

fn opt_rfc3339(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.map(|d| d.to_rfc3339())
}

impl WpService {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    async fn load_responses(&self, assessment_id: &str) -> Result<Vec<Response>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT question_id, answer, score, answered_at
                 FROM assessment_responses WHERE assessment_id = ?1 ORDER BY rowid",
                [assessment_id],
            )
            .await?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next().await? {
            responses.push(Response {
                question_id: row.get(0)?,
                answer: row.get(1)?,
                score: row.get(2)?,
                answered_at: parse_datetime(&row.get::<String>(3)?)?,
            });
        }
        Ok(responses)
    }

    async fn query_assessments(
        &self,
        where_clause: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Assessment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM assessments {where_clause}"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut assessments = Vec::new();
        while let Some(row) = rows.next().await? {
            assessments.push(row_to_assessment(&row)?);
        }
        for assessment in &mut assessments {
            assessment.responses = self.load_responses(&assessment.id).await?;
        }
        Ok(assessments)
    }

    /// Fetch an assessment with its responses.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub async fn get_assessment(&self, id: &str) -> Result<Assessment, DatabaseError> {
        self.query_assessments("WHERE id = ?1", vec![id.into()])
            .await?
            .pop()
            .ok_or_else(|| CoreError::not_found("assessment", id).into())
    }

    /// Fetch an assessment owned by `user_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown or belongs to another user.
    pub async fn get_assessment_for_user(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Assessment, DatabaseError> {
        self.query_assessments("WHERE id = ?1 AND user_id = ?2", vec![id.into(), user_id.into()])
            .await?
            .pop()
            .ok_or_else(|| CoreError::not_found("assessment", id).into())
    }

    /// The user's non-terminal assessment, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_active_assessment(
        &self,
        user_id: &str,
    ) -> Result<Option<Assessment>, DatabaseError> {
        Ok(self
            .query_assessments(
                &format!("WHERE user_id = ?1 AND status IN {ACTIVE_STATUSES} ORDER BY rowid DESC LIMIT 1"),
                vec![user_id.into()],
            )
            .await?
            .pop())
    }

    /// All of a user's assessments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_assessments(&self, user_id: &str) -> Result<Vec<Assessment>, DatabaseError> {
        self.query_assessments("WHERE user_id = ?1 ORDER BY rowid DESC", vec![user_id.into()])
            .await
    }

    /// The user's most recently completed assessment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_completed_assessment(
        &self,
        user_id: &str,
    ) -> Result<Option<Assessment>, DatabaseError> {
        Ok(self
            .query_assessments(
                "WHERE user_id = ?1 AND status = 'completed' ORDER BY rowid DESC LIMIT 1",
                vec![user_id.into()],
            )
            .await?
            .pop())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Insert a fresh `not_started` assessment.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist, `Conflict` if the user already
    /// has a non-terminal assessment.
    pub async fn create_assessment(&self, user_id: &str) -> Result<Assessment, DatabaseError> {
        self.get_user(user_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ASSESSMENT).await?;
        let assessment = Assessment::new(id.clone(), user_id, now);

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO assessments (id, user_id, status, category_progress, scores, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    user_id,
                    assessment.status.as_str(),
                    to_json(&assessment.category_progress)?,
                    to_json(&assessment.scores)?,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await;
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(CoreError::Conflict(format!(
                    "user {user_id} already has an active assessment"
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        self.record(Some(user_id), EntityType::Assessment, &id, AuditAction::Created, None)
            .await;
        Ok(assessment)
    }

    /// Start an assessment, or resume the user's active one.
    ///
    /// A new assessment is created and moved straight to `in_progress`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn start_assessment(
        &self,
        user_id: &str,
    ) -> Result<AssessmentStartResponse, DatabaseError> {
        if let Some(existing) = self.find_active_assessment(user_id).await? {
            tracing::debug!(user_id, assessment_id = %existing.id, "resuming active assessment");
            return Ok(AssessmentStartResponse {
                assessment: existing,
                resumed: true,
            });
        }

        let mut assessment = match self.create_assessment(user_id).await {
            Ok(a) => a,
            Err(e) if e.is_conflict() => {
                // Lost the race to a concurrent start; hand back the winner.
                let existing = self
                    .find_active_assessment(user_id)
                    .await?
                    .ok_or(e)?;
                return Ok(AssessmentStartResponse {
                    assessment: existing,
                    resumed: true,
                });
            }
            Err(e) => return Err(e),
        };

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments SET status = 'in_progress', started_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND status = 'not_started'",
                libsql::params![now.to_rfc3339(), assessment.id.as_str()],
            )
            .await?;
        if changed > 0 {
            assessment.status = AssessmentStatus::InProgress;
            assessment.started_at = Some(now);
            assessment.updated_at = now;
            self.record_transition(user_id, &assessment.id, AssessmentStatus::NotStarted, AssessmentStatus::InProgress)
                .await;
        }

        tracing::info!(user_id, assessment_id = %assessment.id, "assessment started");
        Ok(AssessmentStartResponse {
            assessment,
            resumed: false,
        })
    }

    /// Merge a batch of answers into the user's assessment.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or foreign assessment or an unknown question,
    /// `InvalidState` once the assessment is completed or abandoned,
    /// `Validation` for malformed answers.
    pub async fn save_responses(
        &self,
        user_id: &str,
        assessment_id: &str,
        submissions: &[ResponseSubmission],
    ) -> Result<Assessment, DatabaseError> {
        let mut assessment = self.get_assessment_for_user(user_id, assessment_id).await?;
        let previous_status = assessment.status;
        let bank = self.list_questions(None, true).await?;
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();

        let stats = wp_engine::apply_submissions(&mut assessment, submissions, &index, now)?;

        for submission in submissions {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO assessment_responses (assessment_id, question_id, answer, score, answered_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT (assessment_id, question_id) DO UPDATE SET
                        answer = excluded.answer,
                        score = excluded.score,
                        answered_at = excluded.answered_at",
                    libsql::params![
                        assessment_id,
                        submission.question_id.as_str(),
                        submission.answer.as_str(),
                        submission.score,
                        now.to_rfc3339()
                    ],
                )
                .await?;
        }

        // Recount from storage so concurrent saves on the same assessment
        // converge on the same counters.
        assessment.responses = self.load_responses(assessment_id).await?;
        wp_engine::recompute(&mut assessment, &index);

        let changed = self
            .db()
            .conn()
            .execute(
                &format!(
                    "UPDATE assessments SET status = ?1, category_progress = ?2, questions_answered = ?3,
                        completion_percentage = ?4, started_at = ?5, last_saved_at = ?6, updated_at = ?6
                     WHERE id = ?7 AND status IN {ACTIVE_STATUSES}"
                ),
                libsql::params![
                    assessment.status.as_str(),
                    to_json(&assessment.category_progress)?,
                    i64::from(assessment.questions_answered),
                    i64::from(assessment.completion_percentage),
                    opt_rfc3339(assessment.started_at),
                    now.to_rfc3339(),
                    assessment_id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::InvalidState(format!(
                "assessment {assessment_id} was closed while saving"
            ))
            .into());
        }

        if previous_status != assessment.status {
            self.record_transition(user_id, assessment_id, previous_status, assessment.status)
                .await;
        }
        self.record(
            Some(user_id),
            EntityType::Assessment,
            assessment_id,
            AuditAction::ResponsesSaved,
            Some(serde_json::json!({
                "inserted": stats.inserted,
                "updated": stats.updated,
                "questionsAnswered": assessment.questions_answered,
            })),
        )
        .await;

        tracing::debug!(
            assessment_id,
            inserted = stats.inserted,
            updated = stats.updated,
            answered = assessment.questions_answered,
            "responses saved"
        );
        Ok(assessment)
    }

    /// Complete the assessment and compute its scores.
    ///
    /// Repeating a submit returns the stored result unchanged with
    /// `newly_completed = false`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or foreign assessment, `Validation` if not
    /// every question is answered, `InvalidState` for abandoned assessments.
    pub async fn submit_assessment(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> Result<(Assessment, SubmitResponse), DatabaseError> {
        let mut assessment = self.get_assessment_for_user(user_id, assessment_id).await?;
        let bank = self.list_questions(None, true).await?;
        let index = QuestionIndex::new(&bank);
        let now = Utc::now();

        if !wp_engine::complete(&mut assessment, &index, now)? {
            let response = submit_response(&assessment, false);
            return Ok((assessment, response));
        }

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments SET status = 'completed', scores = ?1, completion_percentage = 100,
                    completed_at = ?2, updated_at = ?2
                 WHERE id = ?3 AND status = 'in_progress'",
                libsql::params![to_json(&assessment.scores)?, now.to_rfc3339(), assessment_id],
            )
            .await?;
        if changed == 0 {
            // Someone else completed or abandoned it first; report what is stored.
            let stored = self.get_assessment(assessment_id).await?;
            if stored.status == AssessmentStatus::Completed {
                let response = submit_response(&stored, false);
                return Ok((stored, response));
            }
            return Err(CoreError::InvalidState(format!(
                "assessment {assessment_id} is {}",
                stored.status
            ))
            .into());
        }

        self.record_transition(user_id, assessment_id, AssessmentStatus::InProgress, AssessmentStatus::Completed)
            .await;
        tracing::info!(user_id, assessment_id, "assessment completed");

        let response = submit_response(&assessment, true);
        Ok((assessment, response))
    }

    /// Abandon the user's non-terminal assessment.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or foreign assessment, `InvalidState` if it
    /// is already completed or abandoned.
    pub async fn abandon_assessment(
        &self,
        user_id: &str,
        assessment_id: &str,
    ) -> Result<Assessment, DatabaseError> {
        let mut assessment = self.get_assessment_for_user(user_id, assessment_id).await?;
        let previous = assessment.status;
        let now = Utc::now();
        wp_engine::abandon(&mut assessment, now)?;

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments SET status = 'abandoned', updated_at = ?1 WHERE id = ?2 AND status = ?3",
                libsql::params![now.to_rfc3339(), assessment_id, previous.as_str()],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::InvalidState(format!(
                "assessment {assessment_id} changed status concurrently"
            ))
            .into());
        }

        self.record_transition(user_id, assessment_id, previous, AssessmentStatus::Abandoned)
            .await;
        Ok(assessment)
    }

    /// Abandon every non-terminal assessment idle for longer than `idle_for`.
    ///
    /// Idle time is measured from the last save, falling back to start and
    /// creation time. Returns the ids that were abandoned.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn abandon_stale_assessments(
        &self,
        idle_for: Duration,
    ) -> Result<Vec<String>, DatabaseError> {
        let cutoff = Utc::now() - idle_for;
        let candidates = self
            .query_assessments(&format!("WHERE status IN {ACTIVE_STATUSES}"), Vec::new())
            .await?;

        let mut abandoned = Vec::new();
        for assessment in candidates {
            let last_touch = assessment
                .last_saved_at
                .or(assessment.started_at)
                .unwrap_or(assessment.created_at);
            if last_touch >= cutoff {
                continue;
            }
            match self.abandon_assessment(&assessment.user_id, &assessment.id).await {
                Ok(_) => abandoned.push(assessment.id),
                Err(DatabaseError::Core(CoreError::InvalidState(reason))) => {
                    tracing::debug!(assessment_id = %assessment.id, %reason, "skipping stale candidate");
                }
                Err(e) => return Err(e),
            }
        }

        if !abandoned.is_empty() {
            tracing::info!(count = abandoned.len(), "abandoned stale assessments");
        }
        Ok(abandoned)
    }

    /// Store a generated analysis on a completed assessment, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown assessment, `InvalidState` if it is not
    /// completed.
    pub async fn store_analysis(
        &self,
        assessment_id: &str,
        analysis: &CareerAnalysis,
        source: AnalysisSource,
        generated_at: DateTime<Utc>,
    ) -> Result<Assessment, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments SET ai_analysis = ?1, analysis_source = ?2,
                    ai_analysis_generated_at = ?3, updated_at = ?3
                 WHERE id = ?4 AND status = 'completed'",
                libsql::params![
                    to_json(analysis)?,
                    source.as_str(),
                    generated_at.to_rfc3339(),
                    assessment_id
                ],
            )
            .await?;

        let assessment = self.get_assessment(assessment_id).await?;
        if changed == 0 {
            return Err(CoreError::InvalidState(format!(
                "assessment {assessment_id} is {}; analysis needs a completed assessment",
                assessment.status
            ))
            .into());
        }

        self.record(
            Some(&assessment.user_id),
            EntityType::Assessment,
            assessment_id,
            AuditAction::AnalysisStored,
            Some(serde_json::json!({ "source": source.as_str() })),
        )
        .await;
        Ok(assessment)
    }

    async fn record_transition(
        &self,
        user_id: &str,
        assessment_id: &str,
        from: AssessmentStatus,
        to: AssessmentStatus,
    ) {
        self.record(
            Some(user_id),
            EntityType::Assessment,
            assessment_id,
            AuditAction::StatusChanged,
            Some(serde_json::json!({ "from": from.as_str(), "to": to.as_str() })),
        )
        .await;
    }
}

fn submit_response(assessment: &Assessment, newly_completed: bool) -> SubmitResponse {
    SubmitResponse {
        assessment_id: assessment.id.clone(),
        status: assessment.status,
        scores: assessment.scores,
        completed_at: assessment.completed_at,
        newly_completed,
    }
}
