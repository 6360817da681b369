//! WBS element entity.
//!
//! The addressable unit anchoring ownership, status and audit history.
//! A WBS element owns either a project or a work package, which are stored
//! alongside it under the same `WbsNumber`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Lifecycle, StateMachine, UserId, ValidationError};

use super::{WbsNumber, WbsStatus};

/// WBS element - identity, status and leadership of a project or work package.
///
/// # Invariants
///
/// - `wbs_number` is unique
/// - `status` only moves along `WbsStatus` transitions
/// - an Active element has both a project lead and a project manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsElement {
    wbs_number: WbsNumber,
    name: String,
    status: WbsStatus,
    project_lead: Option<UserId>,
    project_manager: Option<UserId>,
    lifecycle: Lifecycle,
}

impl WbsElement {
    /// Create a new inactive element.
    pub fn new(wbs_number: WbsNumber, name: impl Into<String>) -> Self {
        Self {
            wbs_number,
            name: name.into(),
            status: WbsStatus::Inactive,
            project_lead: None,
            project_manager: None,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Reconstitute an element from persistence (no validation).
    pub fn reconstitute(
        wbs_number: WbsNumber,
        name: String,
        status: WbsStatus,
        project_lead: Option<UserId>,
        project_manager: Option<UserId>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            wbs_number,
            name,
            status,
            project_lead,
            project_manager,
            lifecycle,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn wbs_number(&self) -> &WbsNumber {
        &self.wbs_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> WbsStatus {
        self.status
    }

    pub fn project_lead(&self) -> Option<&UserId> {
        self.project_lead.as_ref()
    }

    pub fn project_manager(&self) -> Option<&UserId> {
        self.project_manager.as_ref()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate the element with its lead and manager.
    ///
    /// Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on `status` if the element is not inactive
    pub fn activate(
        &mut self,
        project_lead: UserId,
        project_manager: UserId,
    ) -> Result<WbsStatus, ValidationError> {
        let next = self.status.transition_to(WbsStatus::Active)?;
        self.project_lead = Some(project_lead);
        self.project_manager = Some(project_manager);
        Ok(std::mem::replace(&mut self.status, next))
    }

    /// Mark the element complete.
    ///
    /// Returns the previous status, or `None` if it was already complete.
    pub fn complete(&mut self) -> Result<Option<WbsStatus>, ValidationError> {
        if self.status == WbsStatus::Complete {
            return Ok(None);
        }
        let next = self.status.transition_to(WbsStatus::Complete)?;
        Ok(Some(std::mem::replace(&mut self.status, next)))
    }

    /// Soft-delete the element.
    pub fn delete(&mut self, by: Option<UserId>) {
        self.lifecycle = Lifecycle::deleted_now(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn element() -> WbsElement {
        WbsElement::new(WbsNumber::new(1, 1, 1), "Battery box")
    }

    #[test]
    fn new_element_is_inactive_without_leadership() {
        let e = element();
        assert_eq!(e.status(), WbsStatus::Inactive);
        assert!(e.project_lead().is_none());
        assert!(e.project_manager().is_none());
        assert!(!e.is_deleted());
    }

    #[test]
    fn activate_sets_leadership_and_status() {
        let mut e = element();
        let previous = e.activate(user("lead"), user("pm")).unwrap();

        assert_eq!(previous, WbsStatus::Inactive);
        assert_eq!(e.status(), WbsStatus::Active);
        assert_eq!(e.project_lead(), Some(&user("lead")));
        assert_eq!(e.project_manager(), Some(&user("pm")));
    }

    #[test]
    fn activate_twice_fails_and_keeps_leadership() {
        let mut e = element();
        e.activate(user("lead"), user("pm")).unwrap();

        assert!(e.activate(user("other"), user("other")).is_err());
        assert_eq!(e.project_lead(), Some(&user("lead")));
    }

    #[test]
    fn complete_is_idempotent() {
        let mut e = element();
        assert_eq!(e.complete().unwrap(), Some(WbsStatus::Inactive));
        assert_eq!(e.complete().unwrap(), None);
        assert_eq!(e.status(), WbsStatus::Complete);
    }

    #[test]
    fn delete_sets_tombstone() {
        let mut e = element();
        e.delete(Some(user("admin")));
        assert!(e.is_deleted());
    }
}
