//! WBS repository port (read side of projects and work packages).
//!
//! Soft-deleted elements are filtered here, at the repository boundary:
//! lookups report them as [`Lookup::Deleted`] and graph queries omit them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Lookup};
use crate::domain::wbs::{Team, WbsNumber, WbsTarget, WorkPackage};

/// Repository port for reading the work breakdown structure.
///
/// Writes to WBS entities only happen as part of a review, through
/// [`ChangeRequestRepository::commit_review`](super::ChangeRequestRepository::commit_review).
#[async_trait]
pub trait WbsRepository: Send + Sync {
    /// Resolve a WBS number to its element and the project or work package it owns.
    ///
    /// Work package targets include their enclosing project.
    async fn find_target(&self, wbs_number: &WbsNumber) -> Result<Lookup<WbsTarget>, DomainError>;

    /// Find all undeleted work packages whose dependency set includes `wbs_number`.
    ///
    /// Results are ordered by WBS number.
    async fn find_dependents(
        &self,
        wbs_number: &WbsNumber,
    ) -> Result<Vec<WorkPackage>, DomainError>;

    /// Find the teams associated with a project.
    async fn find_teams(&self, project: &WbsNumber) -> Result<Vec<Team>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wbs_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WbsRepository) {}
    }
}
