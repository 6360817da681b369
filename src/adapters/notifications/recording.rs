//! Recording notification gateway for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{ChangeRequestId, DomainError, ErrorCode, UserId};
use crate::ports::{NotificationGateway, NotificationTarget};

/// A notification captured by [`RecordingNotificationGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedNotification {
    Created {
        target: NotificationTarget,
        message: String,
        change_request_id: ChangeRequestId,
        budget_impact: Option<i64>,
    },
    Reviewed {
        user: UserId,
        change_request_id: ChangeRequestId,
    },
}

/// Captures notifications in memory, optionally failing every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationGateway {
    sent: Arc<Mutex<Vec<RecordedNotification>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails after recording the attempt.
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.store(true, Ordering::SeqCst);
        gateway
    }

    /// All notifications attempted so far.
    pub fn sent(&self) -> Vec<RecordedNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    fn record(&self, notification: RecordedNotification) -> Result<(), DomainError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                "simulated notification failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotificationGateway {
    async fn notify_created(
        &self,
        target: &NotificationTarget,
        message: &str,
        change_request_id: &ChangeRequestId,
        budget_impact: Option<i64>,
    ) -> Result<(), DomainError> {
        self.record(RecordedNotification::Created {
            target: target.clone(),
            message: message.to_string(),
            change_request_id: *change_request_id,
            budget_impact,
        })
    }

    async fn notify_reviewed(
        &self,
        user: &UserId,
        change_request_id: &ChangeRequestId,
    ) -> Result<(), DomainError> {
        self.record(RecordedNotification::Reviewed {
            user: user.clone(),
            change_request_id: *change_request_id,
        })
    }
}
