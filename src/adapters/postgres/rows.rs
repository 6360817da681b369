//! Column conversions shared by the PostgreSQL adapters.

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

use crate::domain::foundation::{DomainError, ErrorCode, Lifecycle, Timestamp, UserId};
use crate::domain::wbs::{WbsNumber, WbsStatus};

pub(super) fn db_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Reads one column, naming it in the error.
pub(super) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(&format!("Failed to get {}", name), e))
}

/// WBS numbers are stored as three INT4 columns.
pub(super) fn wbs_to_columns(wbs: &WbsNumber) -> Result<(i32, i32, i32), DomainError> {
    let convert = |n: u32| {
        i32::try_from(n).map_err(|_| {
            DomainError::validation("wbs_number", format!("{} is out of range", wbs))
        })
    };
    Ok((
        convert(wbs.car_number)?,
        convert(wbs.project_number)?,
        convert(wbs.work_package_number)?,
    ))
}

pub(super) fn columns_to_wbs(
    car: i32,
    project: i32,
    work_package: i32,
) -> Result<WbsNumber, DomainError> {
    let convert = |n: i32| {
        u32::try_from(n).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("negative WBS component in database: {}", n),
            )
        })
    };
    Ok(WbsNumber::new(
        convert(car)?,
        convert(project)?,
        convert(work_package)?,
    ))
}

/// Reads the `car_number`, `project_number` and `work_package_number` columns.
pub(super) fn wbs_from_row(row: &PgRow) -> Result<WbsNumber, DomainError> {
    columns_to_wbs(
        column(row, "car_number")?,
        column(row, "project_number")?,
        column(row, "work_package_number")?,
    )
}

pub(super) fn user_id(raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| db_error("Invalid user id in database", e))
}

pub(super) fn optional_user_id(raw: Option<String>) -> Result<Option<UserId>, DomainError> {
    raw.map(user_id).transpose()
}

pub(super) fn timestamp(dt: chrono::DateTime<chrono::Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

/// Reads `date_deleted` and `deleted_by_id` into a lifecycle.
pub(super) fn lifecycle_from_row(row: &PgRow) -> Result<Lifecycle, DomainError> {
    let deleted_at: Option<chrono::DateTime<chrono::Utc>> = column(row, "date_deleted")?;
    let deleted_by: Option<String> = column(row, "deleted_by_id")?;
    Ok(match deleted_at {
        None => Lifecycle::Active,
        Some(at) => Lifecycle::Deleted {
            deleted_at: timestamp(at),
            deleted_by: optional_user_id(deleted_by)?,
        },
    })
}

pub(super) fn status_to_str(status: WbsStatus) -> &'static str {
    match status {
        WbsStatus::Inactive => "INACTIVE",
        WbsStatus::Active => "ACTIVE",
        WbsStatus::Complete => "COMPLETE",
    }
}

pub(super) fn str_to_status(s: &str) -> Result<WbsStatus, DomainError> {
    match s {
        "INACTIVE" => Ok(WbsStatus::Inactive),
        "ACTIVE" => Ok(WbsStatus::Active),
        "COMPLETE" => Ok(WbsStatus::Complete),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid WBS status: {}", s),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_conversion_roundtrips() {
        for status in [WbsStatus::Inactive, WbsStatus::Active, WbsStatus::Complete] {
            assert_eq!(str_to_status(status_to_str(status)).unwrap(), status);
        }
    }

    #[test]
    fn str_to_status_rejects_invalid() {
        assert!(str_to_status("DONE").is_err());
    }

    #[test]
    fn wbs_columns_roundtrip() {
        let wbs = WbsNumber::new(1, 4, 2);
        let (car, project, wp) = wbs_to_columns(&wbs).unwrap();
        assert_eq!(columns_to_wbs(car, project, wp).unwrap(), wbs);
    }

    #[test]
    fn oversized_wbs_component_is_rejected() {
        let wbs = WbsNumber::new(u32::MAX, 1, 0);
        assert_eq!(
            wbs_to_columns(&wbs).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn negative_wbs_column_is_a_database_error() {
        assert_eq!(
            columns_to_wbs(1, -1, 0).unwrap_err().code,
            ErrorCode::DatabaseError
        );
    }
}
