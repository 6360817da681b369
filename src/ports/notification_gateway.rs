//! Notification gateway port.
//!
//! Notifications are a best-effort side channel. Callers log failures and
//! carry on; a failed notification never undoes a committed write.

use async_trait::async_trait;

use crate::domain::foundation::{ChangeRequestId, DomainError, UserId};
use crate::domain::wbs::Team;

/// Who a creation notice is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    /// The team owning the target project.
    Team(Team),
    /// A single user, when no team is associated.
    User(UserId),
}

/// Port for announcing change request activity.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Announce a newly submitted change request.
    ///
    /// `budget_impact` is the largest requested budget impact of a scope
    /// change request, if any.
    async fn notify_created(
        &self,
        target: &NotificationTarget,
        message: &str,
        change_request_id: &ChangeRequestId,
        budget_impact: Option<i64>,
    ) -> Result<(), DomainError>;

    /// Tell the submitter their change request has been reviewed.
    async fn notify_reviewed(
        &self,
        user: &UserId,
        change_request_id: &ChangeRequestId,
    ) -> Result<(), DomainError>;
}
