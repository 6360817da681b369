//! No-op notification gateway.

use async_trait::async_trait;

use crate::domain::foundation::{ChangeRequestId, DomainError, UserId};
use crate::ports::{NotificationGateway, NotificationTarget};

/// Gateway that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationGateway;

impl NoopNotificationGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationGateway for NoopNotificationGateway {
    async fn notify_created(
        &self,
        _target: &NotificationTarget,
        _message: &str,
        change_request_id: &ChangeRequestId,
        _budget_impact: Option<i64>,
    ) -> Result<(), DomainError> {
        tracing::debug!(cr_id = %change_request_id, "Skipping created notice");
        Ok(())
    }

    async fn notify_reviewed(
        &self,
        _user: &UserId,
        change_request_id: &ChangeRequestId,
    ) -> Result<(), DomainError> {
        tracing::debug!(cr_id = %change_request_id, "Skipping reviewed notice");
        Ok(())
    }
}
