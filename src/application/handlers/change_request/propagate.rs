//! Dependency graph propagation of timeline shifts.
//!
//! When a work package's timeline grows, every work package that depends
//! on it (directly or transitively) starts later by the same number of
//! weeks. The walk keeps a visited set seeded with the origin, so each
//! work package is shifted at most once per propagation even if the
//! dependency graph contains a cycle.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::change_log::{Change, ChangeField};
use crate::domain::foundation::{ChangeRequestId, DomainError, UserId};
use crate::domain::wbs::{WbsNumber, WorkPackage};
use crate::ports::WbsRepository;

/// Work packages shifted by one propagation, with their audit records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    pub shifted: Vec<WorkPackage>,
    pub changes: Vec<Change>,
}

/// Walks dependents of a changed work package and shifts their start dates.
pub struct SchedulePropagator {
    wbs: Arc<dyn WbsRepository>,
}

impl SchedulePropagator {
    pub fn new(wbs: Arc<dyn WbsRepository>) -> Self {
        Self { wbs }
    }

    /// Shift every transitive dependent of `origin` by `timeline_impact_weeks`.
    ///
    /// Nothing is written; the caller commits the returned work packages and
    /// changes together with the rest of the review. Dependents that no
    /// longer exist are skipped by the repository query.
    pub async fn propagate(
        &self,
        origin: &WbsNumber,
        timeline_impact_weeks: i32,
        change_request_id: ChangeRequestId,
        implementer: &UserId,
    ) -> Result<Propagation, DomainError> {
        let mut propagation = Propagation::default();
        if timeline_impact_weeks <= 0 {
            return Ok(propagation);
        }

        let mut visited: HashSet<WbsNumber> = HashSet::from([*origin]);
        let mut pending: VecDeque<WbsNumber> = VecDeque::from([*origin]);

        while let Some(changed) = pending.pop_front() {
            for mut dependent in self.wbs.find_dependents(&changed).await? {
                let number = *dependent.wbs_number();
                if !visited.insert(number) {
                    continue;
                }

                let (old_start, new_start) = dependent.shift_start_by_weeks(timeline_impact_weeks)?;
                tracing::debug!(wbs = %number, %old_start, %new_start, "Shifted dependent");

                propagation.changes.push(Change::field_changed(
                    change_request_id,
                    implementer.clone(),
                    number,
                    ChangeField::StartDate,
                    old_start,
                    new_start,
                ));
                propagation.shifted.push(dependent);
                pending.push_back(number);
            }
        }

        Ok(propagation)
    }
}
