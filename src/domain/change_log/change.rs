//! Change audit record and its canonical phrasing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ChangeId, ChangeRequestId, Timestamp, UserId};
use crate::domain::wbs::WbsNumber;

/// Formats a field change the same way at every mutation site.
///
/// ```
/// use wbs_review::domain::change_log::record_change;
///
/// assert_eq!(
///     record_change("Budget", "100", "175"),
///     "Budget changed from 100 to 175"
/// );
/// ```
pub fn record_change(
    field_name: impl fmt::Display,
    old_value: impl fmt::Display,
    new_value: impl fmt::Display,
) -> String {
    format!("{} changed from {} to {}", field_name, old_value, new_value)
}

/// Fields a change request can mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeField {
    Budget,
    Duration,
    StartDate,
    Status,
    ProjectLead,
    ProjectManager,
}

impl fmt::Display for ChangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeField::Budget => "Budget",
            ChangeField::Duration => "Duration",
            ChangeField::StartDate => "Start Date",
            ChangeField::Status => "Status",
            ChangeField::ProjectLead => "Project Lead",
            ChangeField::ProjectManager => "Project Manager",
        };
        write!(f, "{}", s)
    }
}

/// One audit entry. Never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    id: ChangeId,
    change_request_id: ChangeRequestId,
    implementer: UserId,
    wbs_number: WbsNumber,
    detail: String,
    date_implemented: Timestamp,
}

impl Change {
    /// Record that `field` of `wbs_number` moved from `old_value` to `new_value`.
    pub fn field_changed(
        change_request_id: ChangeRequestId,
        implementer: UserId,
        wbs_number: WbsNumber,
        field: ChangeField,
        old_value: impl fmt::Display,
        new_value: impl fmt::Display,
    ) -> Self {
        Self {
            id: ChangeId::new(),
            change_request_id,
            implementer,
            wbs_number,
            detail: record_change(field, old_value, new_value),
            date_implemented: Timestamp::now(),
        }
    }

    /// Reconstitute a change from persistence.
    pub fn reconstitute(
        id: ChangeId,
        change_request_id: ChangeRequestId,
        implementer: UserId,
        wbs_number: WbsNumber,
        detail: String,
        date_implemented: Timestamp,
    ) -> Self {
        Self {
            id,
            change_request_id,
            implementer,
            wbs_number,
            detail,
            date_implemented,
        }
    }

    pub fn id(&self) -> &ChangeId {
        &self.id
    }

    pub fn change_request_id(&self) -> &ChangeRequestId {
        &self.change_request_id
    }

    pub fn implementer(&self) -> &UserId {
        &self.implementer
    }

    pub fn wbs_number(&self) -> &WbsNumber {
        &self.wbs_number
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn date_implemented(&self) -> &Timestamp {
        &self.date_implemented
    }
}
