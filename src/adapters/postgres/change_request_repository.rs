//! PostgreSQL implementation of ChangeRequestRepository.
//!
//! The type-specific payload (including proposed solutions) is stored as
//! JSONB in `change_requests.details`. Writes that require a pending request
//! either lock it with `SELECT ... FOR UPDATE` or run a conditional
//! `UPDATE ... WHERE accepted IS NULL AND date_deleted IS NULL`; a miss is
//! classified afterwards. A review merges its approval into the locked
//! payload rather than replacing it.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::domain::change_request::{
    ChangeRequest, ChangeRequestDetails, ProposedSolution, ReviewState,
};
use crate::domain::foundation::{ChangeRequestId, DomainError, ErrorCode, Lookup};
use crate::ports::{ChangeRequestRepository, ReviewCommit};

use super::rows::{
    column, db_error, lifecycle_from_row, optional_user_id, status_to_str, timestamp, user_id,
    wbs_from_row, wbs_to_columns,
};

/// PostgreSQL implementation of ChangeRequestRepository.
#[derive(Clone)]
pub struct PostgresChangeRequestRepository {
    pool: PgPool,
}

impl PostgresChangeRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeRequestRepository for PostgresChangeRequestRepository {
    async fn save(&self, change_request: &ChangeRequest) -> Result<(), DomainError> {
        let (car, project, wp) = wbs_to_columns(change_request.wbs_number())?;
        sqlx::query(
            r#"
            INSERT INTO change_requests (
                id, submitter_id, car_number, project_number, work_package_number,
                kind, date_submitted, details
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(change_request.id().as_uuid())
        .bind(change_request.submitter().as_str())
        .bind(car)
        .bind(project)
        .bind(wp)
        .bind(change_request.kind().to_string())
        .bind(change_request.date_submitted().as_datetime())
        .bind(Json(change_request.details()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert change request", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ChangeRequestId) -> Result<Lookup<ChangeRequest>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, submitter_id, car_number, project_number, work_package_number,
                   date_submitted, accepted, reviewer_id, review_notes, date_reviewed,
                   date_deleted, deleted_by_id, details
            FROM change_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch change request", e))?;

        let change_request = row.map(|row| row_to_change_request(&row)).transpose()?;
        Ok(Lookup::from_record(change_request, ChangeRequest::lifecycle))
    }

    async fn add_proposed_solution(
        &self,
        id: &ChangeRequestId,
        solution: &ProposedSolution,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        let details: Option<Json<ChangeRequestDetails>> = sqlx::query_scalar(
            r#"
            SELECT details FROM change_requests
            WHERE id = $1 AND accepted IS NULL AND date_deleted IS NULL
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock change request", e))?;

        let Some(Json(mut details)) = details else {
            return Err(rejection(&mut *tx, id).await);
        };

        match &mut details {
            ChangeRequestDetails::Standard(scope) => {
                scope.proposed_solutions.push(solution.clone())
            }
            _ => {
                return Err(DomainError::validation(
                    "type",
                    "proposed solutions only apply to standard change requests",
                ))
            }
        }

        sqlx::query("UPDATE change_requests SET details = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(&details))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to store proposed solution", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn soft_delete(&self, change_request: &ChangeRequest) -> Result<(), DomainError> {
        let id = change_request.id();
        let lifecycle = change_request.lifecycle();
        let result = sqlx::query(
            r#"
            UPDATE change_requests
            SET date_deleted = $2, deleted_by_id = $3
            WHERE id = $1 AND accepted IS NULL AND date_deleted IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(lifecycle.deleted_at().map(|t| *t.as_datetime()))
        .bind(lifecycle.deleted_by().map(|u| u.as_str().to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete change request", e))?;

        if result.rows_affected() == 0 {
            let err = rejection(&self.pool, id).await;
            return Err(match err.code {
                ErrorCode::ChangeRequestDeleted => DomainError::for_record(
                    ErrorCode::AlreadyDeleted,
                    "Change request already deleted",
                    id,
                ),
                _ => err,
            });
        }

        Ok(())
    }

    async fn commit_review(&self, commit: ReviewCommit) -> Result<(), DomainError> {
        let cr = &commit.change_request;
        let ReviewState::Reviewed {
            reviewer,
            accepted,
            review_notes,
            date_reviewed,
        } = cr.review()
        else {
            return Err(DomainError::validation(
                "accepted",
                "review commit carries no decision",
            ));
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        let stored: Option<Json<ChangeRequestDetails>> = sqlx::query_scalar(
            r#"
            SELECT details FROM change_requests
            WHERE id = $1 AND accepted IS NULL AND date_deleted IS NULL
            FOR UPDATE
            "#,
        )
        .bind(cr.id().as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock change request", e))?;

        let Some(Json(mut details)) = stored else {
            return Err(rejection(&mut *tx, cr.id()).await);
        };

        // Proposals may have been appended since the review loaded the request.
        if let Some(solution) = cr.approved_solution() {
            if details.approve_solution(solution.id()).is_none() {
                return Err(DomainError::for_record(
                    ErrorCode::ProposedSolutionNotFound,
                    "Approved proposed solution is not stored",
                    solution.id(),
                ));
            }
        }

        sqlx::query(
            r#"
            UPDATE change_requests
            SET accepted = $2, reviewer_id = $3, review_notes = $4, date_reviewed = $5, details = $6
            WHERE id = $1
            "#,
        )
        .bind(cr.id().as_uuid())
        .bind(*accepted)
        .bind(reviewer.as_str())
        .bind(review_notes)
        .bind(date_reviewed.as_datetime())
        .bind(Json(&details))
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to record review", e))?;

        if let Some(element) = &commit.element {
            let (car, project, wp) = wbs_to_columns(element.wbs_number())?;
            sqlx::query(
                r#"
                UPDATE wbs_elements
                SET status = $4, project_lead_id = $5, project_manager_id = $6
                WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
                "#,
            )
            .bind(car)
            .bind(project)
            .bind(wp)
            .bind(status_to_str(element.status()))
            .bind(element.project_lead().map(|u| u.as_str().to_string()))
            .bind(element.project_manager().map(|u| u.as_str().to_string()))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to update WBS element", e))?;
        }

        if let Some(project) = &commit.project {
            let (car, project_number, _) = wbs_to_columns(project.wbs_number())?;
            sqlx::query(
                "UPDATE projects SET budget = $3 WHERE car_number = $1 AND project_number = $2",
            )
            .bind(car)
            .bind(project_number)
            .bind(project.budget())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to update project", e))?;
        }

        for work_package in &commit.work_packages {
            let (car, project, wp) = wbs_to_columns(work_package.wbs_number())?;
            sqlx::query(
                r#"
                UPDATE work_packages
                SET start_date = $4, duration_weeks = $5
                WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
                "#,
            )
            .bind(car)
            .bind(project)
            .bind(wp)
            .bind(work_package.start_date())
            .bind(work_package.duration_weeks())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to update work package", e))?;
        }

        for change in &commit.changes {
            let (car, project, wp) = wbs_to_columns(change.wbs_number())?;
            sqlx::query(
                r#"
                INSERT INTO changes (
                    id, change_request_id, implementer_id, car_number, project_number,
                    work_package_number, detail, date_implemented
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(change.id().as_uuid())
            .bind(change.change_request_id().as_uuid())
            .bind(change.implementer().as_str())
            .bind(car)
            .bind(project)
            .bind(wp)
            .bind(change.detail())
            .bind(change.date_implemented().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to insert change", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit review", e))?;

        Ok(())
    }
}

/// Explains why a conditional write matched no row.
async fn rejection<'e>(executor: impl PgExecutor<'e>, id: &ChangeRequestId) -> DomainError {
    let state: Result<Option<(Option<bool>, bool)>, _> = sqlx::query_as(
        "SELECT accepted, date_deleted IS NOT NULL FROM change_requests WHERE id = $1",
    )
    .bind(id.as_uuid())
    .fetch_optional(executor)
    .await;

    match state {
        Ok(state) => classify_rejection(state, id),
        Err(e) => db_error("Failed to inspect change request", e),
    }
}

fn classify_rejection(state: Option<(Option<bool>, bool)>, id: &ChangeRequestId) -> DomainError {
    let (code, message) = match state {
        None => (ErrorCode::ChangeRequestNotFound, "Change request not found"),
        Some((_, true)) => (
            ErrorCode::ChangeRequestDeleted,
            "Change request has been deleted",
        ),
        Some((Some(_), false)) => (
            ErrorCode::AlreadyReviewed,
            "Change request has already been reviewed",
        ),
        Some((None, false)) => (
            ErrorCode::DatabaseError,
            "Conditional write matched no row for a pending change request",
        ),
    };
    DomainError::for_record(code, message, id)
}

fn row_to_change_request(row: &PgRow) -> Result<ChangeRequest, DomainError> {
    let accepted: Option<bool> = column(row, "accepted")?;
    let review = match accepted {
        None => ReviewState::Pending,
        Some(accepted) => {
            let reviewer = optional_user_id(column(row, "reviewer_id")?)?
                .ok_or_else(|| db_error("Reviewed change request", "reviewer_id is null"))?;
            let date_reviewed: Option<chrono::DateTime<chrono::Utc>> =
                column(row, "date_reviewed")?;
            let date_reviewed = date_reviewed
                .ok_or_else(|| db_error("Reviewed change request", "date_reviewed is null"))?;
            let review_notes: Option<String> = column(row, "review_notes")?;
            ReviewState::Reviewed {
                reviewer,
                accepted,
                review_notes: review_notes.unwrap_or_default(),
                date_reviewed: timestamp(date_reviewed),
            }
        }
    };

    let Json(details): Json<ChangeRequestDetails> = column(row, "details")?;

    Ok(ChangeRequest::reconstitute(
        ChangeRequestId::from_uuid(column(row, "id")?),
        user_id(column(row, "submitter_id")?)?,
        wbs_from_row(row)?,
        timestamp(column(row, "date_submitted")?),
        review,
        lifecycle_from_row(row)?,
        details,
    ))
}
