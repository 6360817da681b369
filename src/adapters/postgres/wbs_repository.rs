//! PostgreSQL implementation of WbsRepository.
//!
//! Reads WBS elements together with the project or work package they own.
//! Checklists and the project's text lists are stored as JSONB.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Lookup, TeamId};
use crate::domain::wbs::{
    ChecklistItem, Project, Team, WbsElement, WbsNumber, WbsTarget, WorkPackage,
};
use crate::ports::WbsRepository;

use super::rows::{
    column, columns_to_wbs, db_error, lifecycle_from_row, optional_user_id, str_to_status,
    wbs_from_row, wbs_to_columns,
};

/// PostgreSQL implementation of WbsRepository.
#[derive(Clone)]
pub struct PostgresWbsRepository {
    pool: PgPool,
}

impl PostgresWbsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WbsRepository for PostgresWbsRepository {
    async fn find_target(&self, wbs_number: &WbsNumber) -> Result<Lookup<WbsTarget>, DomainError> {
        let element = Lookup::from_record(
            load_element(&self.pool, wbs_number).await?,
            WbsElement::lifecycle,
        );
        let element = match element {
            Lookup::Active(element) => element,
            Lookup::Deleted => return Ok(Lookup::Deleted),
            Lookup::Missing => return Ok(Lookup::Missing),
        };

        let project = load_project(&self.pool, &wbs_number.project_key())
            .await?
            .ok_or_else(|| missing_owned("project", wbs_number))?;

        if wbs_number.is_project() {
            return Ok(Lookup::Active(WbsTarget::Project { element, project }));
        }

        let work_package = load_work_package(&self.pool, wbs_number)
            .await?
            .ok_or_else(|| missing_owned("work package", wbs_number))?;

        Ok(Lookup::Active(WbsTarget::WorkPackage {
            element,
            work_package,
            project,
        }))
    }

    async fn find_dependents(
        &self,
        wbs_number: &WbsNumber,
    ) -> Result<Vec<WorkPackage>, DomainError> {
        let (car, project, wp) = wbs_to_columns(wbs_number)?;
        let rows = sqlx::query(
            r#"
            SELECT d.car_number, d.project_number, d.work_package_number
            FROM work_package_dependencies d
            JOIN wbs_elements e
              ON e.car_number = d.car_number
             AND e.project_number = d.project_number
             AND e.work_package_number = d.work_package_number
            WHERE d.depends_on_car_number = $1
              AND d.depends_on_project_number = $2
              AND d.depends_on_work_package_number = $3
              AND e.date_deleted IS NULL
            ORDER BY d.car_number, d.project_number, d.work_package_number
            "#,
        )
        .bind(car)
        .bind(project)
        .bind(wp)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch dependents", e))?;

        let mut dependents = Vec::with_capacity(rows.len());
        for row in rows {
            let number = wbs_from_row(&row)?;
            if let Some(work_package) = load_work_package(&self.pool, &number).await? {
                dependents.push(work_package);
            }
        }
        Ok(dependents)
    }

    async fn find_teams(&self, project: &WbsNumber) -> Result<Vec<Team>, DomainError> {
        let (car, project_number, _) = wbs_to_columns(project)?;
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.channel_id
            FROM teams t
            JOIN project_teams pt ON pt.team_id = t.id
            WHERE pt.car_number = $1 AND pt.project_number = $2
            ORDER BY t.name
            "#,
        )
        .bind(car)
        .bind(project_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch teams", e))?;

        rows.iter()
            .map(|row| {
                Ok(Team::new(
                    TeamId::from_uuid(column(row, "id")?),
                    column::<String>(row, "name")?,
                    column(row, "channel_id")?,
                ))
            })
            .collect()
    }
}

fn missing_owned(what: &str, wbs_number: &WbsNumber) -> DomainError {
    db_error(
        "Inconsistent WBS data",
        format!("element {} has no {}", wbs_number, what),
    )
}

async fn load_element(
    pool: &PgPool,
    wbs_number: &WbsNumber,
) -> Result<Option<WbsElement>, DomainError> {
    let (car, project, wp) = wbs_to_columns(wbs_number)?;
    let row = sqlx::query(
        r#"
        SELECT car_number, project_number, work_package_number, name, status,
               project_lead_id, project_manager_id, date_deleted, deleted_by_id
        FROM wbs_elements
        WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
        "#,
    )
    .bind(car)
    .bind(project)
    .bind(wp)
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error("Failed to fetch WBS element", e))?;

    row.map(|row| row_to_element(&row)).transpose()
}

fn row_to_element(row: &PgRow) -> Result<WbsElement, DomainError> {
    let status: String = column(row, "status")?;
    Ok(WbsElement::reconstitute(
        wbs_from_row(row)?,
        column(row, "name")?,
        str_to_status(&status)?,
        optional_user_id(column(row, "project_lead_id")?)?,
        optional_user_id(column(row, "project_manager_id")?)?,
        lifecycle_from_row(row)?,
    ))
}

async fn load_project(pool: &PgPool, project: &WbsNumber) -> Result<Option<Project>, DomainError> {
    let (car, project_number, _) = wbs_to_columns(project)?;
    let row = sqlx::query(
        r#"
        SELECT summary, budget, rules, goals, features, other_constraints
        FROM projects
        WHERE car_number = $1 AND project_number = $2
        "#,
    )
    .bind(car)
    .bind(project_number)
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error("Failed to fetch project", e))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let team_ids: Vec<uuid::Uuid> = sqlx::query_scalar(
        "SELECT team_id FROM project_teams WHERE car_number = $1 AND project_number = $2",
    )
    .bind(car)
    .bind(project_number)
    .fetch_all(pool)
    .await
    .map_err(|e| db_error("Failed to fetch project teams", e))?;

    let Json(rules): Json<Vec<String>> = column(&row, "rules")?;
    let Json(goals): Json<Vec<String>> = column(&row, "goals")?;
    let Json(features): Json<Vec<String>> = column(&row, "features")?;
    let Json(other_constraints): Json<Vec<String>> = column(&row, "other_constraints")?;

    Ok(Some(Project::reconstitute(
        project.project_key(),
        column(&row, "summary")?,
        column(&row, "budget")?,
        rules,
        goals,
        features,
        other_constraints,
        team_ids.into_iter().map(TeamId::from_uuid).collect(),
    )))
}

async fn load_work_package(
    pool: &PgPool,
    wbs_number: &WbsNumber,
) -> Result<Option<WorkPackage>, DomainError> {
    let (car, project, wp) = wbs_to_columns(wbs_number)?;
    let row = sqlx::query(
        r#"
        SELECT start_date, duration_weeks, expected_activities, deliverables
        FROM work_packages
        WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
        "#,
    )
    .bind(car)
    .bind(project)
    .bind(wp)
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error("Failed to fetch work package", e))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let dependency_rows: Vec<(i32, i32, i32)> = sqlx::query_as(
        r#"
        SELECT depends_on_car_number, depends_on_project_number, depends_on_work_package_number
        FROM work_package_dependencies
        WHERE car_number = $1 AND project_number = $2 AND work_package_number = $3
        "#,
    )
    .bind(car)
    .bind(project)
    .bind(wp)
    .fetch_all(pool)
    .await
    .map_err(|e| db_error("Failed to fetch dependencies", e))?;

    let dependencies = dependency_rows
        .into_iter()
        .map(|(c, p, w)| columns_to_wbs(c, p, w))
        .collect::<Result<Vec<_>, _>>()?;
    let Json(expected_activities): Json<Vec<ChecklistItem>> =
        column(&row, "expected_activities")?;
    let Json(deliverables): Json<Vec<ChecklistItem>> = column(&row, "deliverables")?;

    Ok(Some(WorkPackage::reconstitute(
        *wbs_number,
        column(&row, "start_date")?,
        column(&row, "duration_weeks")?,
        dependencies,
        expected_activities,
        deliverables,
    )))
}
