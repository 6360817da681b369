//! DeleteChangeRequestHandler - soft-deletes a pending change request.

use std::sync::Arc;

use crate::domain::change_request::{ChangeRequestError, Resource};
use crate::domain::foundation::{ChangeRequestId, CommandMetadata};
use crate::ports::ChangeRequestRepository;

/// Command to delete a change request.
#[derive(Debug, Clone)]
pub struct DeleteChangeRequestCommand {
    pub change_request_id: ChangeRequestId,
}

/// Handler for deleting change requests.
pub struct DeleteChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
}

impl DeleteChangeRequestHandler {
    pub fn new(change_requests: Arc<dyn ChangeRequestRepository>) -> Self {
        Self { change_requests }
    }

    pub async fn handle(
        &self,
        cmd: DeleteChangeRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ChangeRequestError> {
        let id = cmd.change_request_id;
        let mut change_request = self.change_requests.find_by_id(&id).await?.require(
            || ChangeRequestError::not_found(Resource::ChangeRequest, id),
            || ChangeRequestError::already_deleted(id),
        )?;

        if change_request.accepted().is_some() {
            return Err(ChangeRequestError::validation(
                "accepted",
                "cannot delete a reviewed change request",
            ));
        }

        if change_request.submitter() != metadata.user_id() && !metadata.role().is_admin() {
            return Err(ChangeRequestError::forbidden(
                "only the submitter or an admin may delete a change request",
            ));
        }

        change_request.delete(metadata.user_id().clone())?;
        self.change_requests.soft_delete(&change_request).await?;

        tracing::info!(cr_id = %id, deleted_by = %metadata.user_id(), "Change request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::change_request::test_support::*;
    use crate::domain::foundation::{Lookup, Role};
    use crate::ports::ReviewCommit;

    fn command(change_request_id: ChangeRequestId) -> DeleteChangeRequestCommand {
        DeleteChangeRequestCommand { change_request_id }
    }

    #[tokio::test]
    async fn submitter_can_delete_pending_request() {
        let fixture = fixture().await;
        let cr = saved_scope_request(&fixture, WP_A, 10, 0).await;
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());

        handler.handle(command(*cr.id()), submitter()).await.unwrap();

        assert!(matches!(
            fixture.store.find_by_id(cr.id()).await.unwrap(),
            Lookup::Deleted
        ));
        let stored = fixture.store.change_request(cr.id()).await.unwrap();
        assert_eq!(stored.lifecycle().deleted_by(), Some(&user("submitter")));
    }

    #[tokio::test]
    async fn admin_can_delete_others_request() {
        let fixture = fixture().await;
        let cr = saved_scope_request(&fixture, WP_A, 10, 0).await;
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());

        let result = handler
            .handle(command(*cr.id()), metadata("admin", Role::Admin))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn other_members_cannot_delete() {
        let fixture = fixture().await;
        let cr = saved_scope_request(&fixture, WP_A, 10, 0).await;
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());

        let result = handler
            .handle(command(*cr.id()), metadata("lead", Role::Head))
            .await;

        assert!(matches!(result, Err(ChangeRequestError::Forbidden(_))));
    }

    #[tokio::test]
    async fn deleting_twice_is_already_deleted() {
        let fixture = fixture().await;
        let cr = saved_scope_request(&fixture, WP_A, 10, 0).await;
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());
        handler.handle(command(*cr.id()), submitter()).await.unwrap();

        let result = handler.handle(command(*cr.id()), submitter()).await;

        assert!(matches!(result, Err(ChangeRequestError::AlreadyDeleted(_))));
    }

    #[tokio::test]
    async fn reviewed_request_cannot_be_deleted() {
        let fixture = fixture().await;
        let mut cr = saved_scope_request(&fixture, WP_A, 10, 0).await;
        cr.record_review(user("reviewer"), false, "").unwrap();
        fixture
            .store
            .commit_review(ReviewCommit::decision_only(cr.clone()))
            .await
            .unwrap();
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());

        let result = handler.handle(command(*cr.id()), submitter()).await;

        assert!(matches!(result, Err(ChangeRequestError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let fixture = fixture().await;
        let handler = DeleteChangeRequestHandler::new(fixture.store.clone());

        let result = handler.handle(command(ChangeRequestId::new()), submitter()).await;

        assert!(matches!(result, Err(ChangeRequestError::NotFound { .. })));
    }
}
