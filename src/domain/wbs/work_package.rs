//! Work package entity and its checklists.
//!
//! A work package belongs to a project, spans `duration_weeks` from its
//! start date, and may depend on other WBS elements. Dependents are the
//! work packages whose `dependencies` contain this one.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Lifecycle, Timestamp, UserId, ValidationError};

use super::WbsNumber;

/// Days per week used whenever a timeline impact (weeks) meets a date.
pub const DAYS_PER_WEEK: i64 = 7;

/// Which checklist an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistKind {
    ExpectedActivities,
    Deliverables,
}

impl ChecklistKind {
    /// Field name used in validation errors.
    pub fn field_name(&self) -> &'static str {
        match self {
            ChecklistKind::ExpectedActivities => "expected_activities",
            ChecklistKind::Deliverables => "deliverables",
        }
    }
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChecklistKind::ExpectedActivities => "expected activities",
            ChecklistKind::Deliverables => "deliverables",
        };
        write!(f, "{}", s)
    }
}

/// A single expected activity or deliverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub detail: String,
    pub checked_at: Option<Timestamp>,
    pub checked_by: Option<UserId>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl ChecklistItem {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            checked_at: None,
            checked_by: None,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Builder: mark the item checked now.
    pub fn checked(mut self, by: UserId) -> Self {
        self.checked_at = Some(Timestamp::now());
        self.checked_by = Some(by);
        self
    }

    /// Builder: soft-delete the item.
    pub fn deleted(mut self) -> Self {
        self.lifecycle = Lifecycle::deleted_now(None);
        self
    }

    /// A live item that has not been checked off.
    pub fn is_outstanding(&self) -> bool {
        !self.lifecycle.is_deleted() && self.checked_at.is_none()
    }
}

/// Work package details owned by a work-package-level WBS element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPackage {
    wbs_number: WbsNumber,
    start_date: NaiveDate,
    duration_weeks: i32,
    dependencies: Vec<WbsNumber>,
    expected_activities: Vec<ChecklistItem>,
    deliverables: Vec<ChecklistItem>,
}

impl WorkPackage {
    pub fn new(wbs_number: WbsNumber, start_date: NaiveDate, duration_weeks: i32) -> Self {
        Self {
            wbs_number,
            start_date,
            duration_weeks,
            dependencies: Vec::new(),
            expected_activities: Vec::new(),
            deliverables: Vec::new(),
        }
    }

    /// Reconstitute a work package from persistence (no validation).
    pub fn reconstitute(
        wbs_number: WbsNumber,
        start_date: NaiveDate,
        duration_weeks: i32,
        dependencies: Vec<WbsNumber>,
        expected_activities: Vec<ChecklistItem>,
        deliverables: Vec<ChecklistItem>,
    ) -> Self {
        Self {
            wbs_number,
            start_date,
            duration_weeks,
            dependencies,
            expected_activities,
            deliverables,
        }
    }

    /// Builder: add a dependency on another element.
    pub fn depends_on(mut self, other: WbsNumber) -> Self {
        if other != self.wbs_number && !self.dependencies.contains(&other) {
            self.dependencies.push(other);
        }
        self
    }

    /// Builder: add a checklist item.
    pub fn with_item(mut self, kind: ChecklistKind, item: ChecklistItem) -> Self {
        match kind {
            ChecklistKind::ExpectedActivities => self.expected_activities.push(item),
            ChecklistKind::Deliverables => self.deliverables.push(item),
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn wbs_number(&self) -> &WbsNumber {
        &self.wbs_number
    }

    /// Number of the project this work package belongs to.
    pub fn project_number(&self) -> WbsNumber {
        self.wbs_number.project_key()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn duration_weeks(&self) -> i32 {
        self.duration_weeks
    }

    pub fn dependencies(&self) -> &[WbsNumber] {
        &self.dependencies
    }

    pub fn depends_on_element(&self, other: &WbsNumber) -> bool {
        self.dependencies.contains(other)
    }

    pub fn expected_activities(&self) -> &[ChecklistItem] {
        &self.expected_activities
    }

    pub fn deliverables(&self) -> &[ChecklistItem] {
        &self.deliverables
    }

    /// Returns the first checklist holding a live, unchecked item.
    pub fn first_incomplete_checklist(&self) -> Option<ChecklistKind> {
        if self.expected_activities.iter().any(ChecklistItem::is_outstanding) {
            return Some(ChecklistKind::ExpectedActivities);
        }
        if self.deliverables.iter().any(ChecklistItem::is_outstanding) {
            return Some(ChecklistKind::Deliverables);
        }
        None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Extend (or shorten) the duration, returning `(old, new)`.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on `duration_weeks` if the result leaves the `i32` range
    pub fn adjust_duration(&mut self, weeks: i32) -> Result<(i32, i32), ValidationError> {
        let old = self.duration_weeks;
        let new = old.checked_add(weeks).ok_or_else(|| {
            ValidationError::invalid_format(
                "duration_weeks",
                format!("{} weeks plus {} weeks is out of range", old, weeks),
            )
        })?;
        self.duration_weeks = new;
        Ok((old, new))
    }

    /// Move the start date by whole weeks, returning `(old, new)`.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on `start_date` if the shifted date is not representable
    pub fn shift_start_by_weeks(
        &mut self,
        weeks: i32,
    ) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let old = self.start_date;
        let days = Days::new((i64::from(weeks) * DAYS_PER_WEEK).unsigned_abs());
        let shifted = if weeks >= 0 {
            old.checked_add_days(days)
        } else {
            old.checked_sub_days(days)
        };
        let new = shifted.ok_or_else(|| {
            ValidationError::invalid_format(
                "start_date",
                format!("{} shifted by {} weeks is out of range", old, weeks),
            )
        })?;
        self.start_date = new;
        Ok((old, new))
    }

    /// Set the start date, returning the previous one.
    pub fn set_start_date(&mut self, start_date: NaiveDate) -> NaiveDate {
        std::mem::replace(&mut self.start_date, start_date)
    }
}
