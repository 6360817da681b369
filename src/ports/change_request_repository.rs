//! Change request repository port (write side).
//!
//! Besides plain persistence, this port owns the transaction boundary of a
//! review: [`ChangeRequestRepository::commit_review`] writes the reviewed
//! change request, every WBS mutation and every audit record as one unit.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::change_log::Change;
use crate::domain::change_request::{ChangeRequest, ProposedSolution};
use crate::domain::foundation::{ChangeRequestId, DomainError, Lookup};
use crate::domain::wbs::{Project, WbsElement, WbsNumber, WorkPackage};

/// Everything a review writes, computed up front and committed atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommit {
    /// The change request with its review decision (and approved solution) recorded.
    pub change_request: ChangeRequest,
    /// Updated target element, if its status or leadership changed.
    pub element: Option<WbsElement>,
    /// Updated project, if its budget changed.
    pub project: Option<Project>,
    /// Updated work packages: the target and any shifted dependents.
    pub work_packages: Vec<WorkPackage>,
    /// Audit records, in the order they were produced.
    pub changes: Vec<Change>,
}

impl ReviewCommit {
    /// A commit that only records the decision.
    pub fn decision_only(change_request: ChangeRequest) -> Self {
        Self {
            change_request,
            element: None,
            project: None,
            work_packages: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Project keys of every WBS record this commit writes.
    pub fn projects(&self) -> BTreeSet<WbsNumber> {
        let mut projects = BTreeSet::from([self.change_request.wbs_number().project_key()]);
        projects.extend(self.element.iter().map(|e| e.wbs_number().project_key()));
        projects.extend(self.project.iter().map(|p| p.wbs_number().project_key()));
        projects.extend(self.work_packages.iter().map(|wp| wp.wbs_number().project_key()));
        projects
    }
}

/// Repository port for ChangeRequest aggregate persistence.
///
/// Implementations must ensure:
/// - every conditional write checks that the change request is still pending
///   and undeleted, failing with `AlreadyReviewed` (or `ChangeRequestDeleted`)
///   otherwise
/// - `commit_review` is all-or-nothing
#[async_trait]
pub trait ChangeRequestRepository: Send + Sync {
    /// Save a new change request, including any initial proposed solutions.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, change_request: &ChangeRequest) -> Result<(), DomainError>;

    /// Find a change request by its ID.
    async fn find_by_id(&self, id: &ChangeRequestId) -> Result<Lookup<ChangeRequest>, DomainError>;

    /// Append a proposed solution to a pending change request.
    ///
    /// # Errors
    ///
    /// - `ChangeRequestNotFound` if no such change request exists
    /// - `ChangeRequestDeleted` if it was deleted meanwhile
    /// - `AlreadyReviewed` if it was reviewed meanwhile
    async fn add_proposed_solution(
        &self,
        id: &ChangeRequestId,
        solution: &ProposedSolution,
    ) -> Result<(), DomainError>;

    /// Persist the soft deletion of a pending change request.
    ///
    /// # Errors
    ///
    /// - `ChangeRequestNotFound` if no such change request exists
    /// - `AlreadyDeleted` if it was deleted meanwhile
    /// - `AlreadyReviewed` if it was reviewed meanwhile
    async fn soft_delete(&self, change_request: &ChangeRequest) -> Result<(), DomainError>;

    /// Atomically commit a review.
    ///
    /// The write is conditional on the stored change request still being
    /// pending and undeleted. Only the decision and the approved flag of the
    /// chosen solution are taken from `commit.change_request`; proposals
    /// stored meanwhile survive. Nothing is written if any part fails.
    ///
    /// # Errors
    ///
    /// - `AlreadyReviewed` if another review committed first
    /// - `ChangeRequestDeleted` if it was deleted meanwhile
    /// - `DatabaseError` on persistence failure
    async fn commit_review(&self, commit: ReviewCommit) -> Result<(), DomainError>;
}
