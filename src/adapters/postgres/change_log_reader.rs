//! PostgreSQL implementation of ChangeLogReader.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::domain::change_log::Change;
use crate::domain::foundation::{ChangeId, ChangeRequestId, DomainError};
use crate::domain::wbs::WbsNumber;
use crate::ports::ChangeLogReader;

use super::rows::{column, db_error, timestamp, user_id, wbs_from_row, wbs_to_columns};

/// Reads the append-only `changes` table in insertion order (`seq`).
#[derive(Clone)]
pub struct PostgresChangeLogReader {
    pool: PgPool,
}

impl PostgresChangeLogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeLogReader for PostgresChangeLogReader {
    async fn find_by_change_request(
        &self,
        id: &ChangeRequestId,
    ) -> Result<Vec<Change>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, change_request_id, implementer_id, car_number, project_number,
                   work_package_number, detail, date_implemented
            FROM changes
            WHERE change_request_id = $1
            ORDER BY seq
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch changes", e))?;

        rows.iter().map(row_to_change).collect()
    }

    async fn find_by_wbs_number(&self, wbs_number: &WbsNumber) -> Result<Vec<Change>, DomainError> {
        let (car, project, wp) = wbs_to_columns(wbs_number)?;
        let rows = sqlx::query(
            r#"
            SELECT id, change_request_id, implementer_id, car_number, project_number,
                   work_package_number, detail, date_implemented
            FROM changes
            WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
            ORDER BY seq
            "#,
        )
        .bind(car)
        .bind(project)
        .bind(wp)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch changes", e))?;

        rows.iter().map(row_to_change).collect()
    }
}

fn row_to_change(row: &PgRow) -> Result<Change, DomainError> {
    Ok(Change::reconstitute(
        ChangeId::from_uuid(column(row, "id")?),
        ChangeRequestId::from_uuid(column(row, "change_request_id")?),
        user_id(column(row, "implementer_id")?)?,
        wbs_from_row(row)?,
        column(row, "detail")?,
        timestamp(column(row, "date_implemented")?),
    ))
}
