//! CreateStageGateChangeRequestHandler - submits a stage gate change request.

use std::sync::Arc;

use crate::domain::change_request::{
    ChangeRequest, ChangeRequestDetails, ChangeRequestError, StageGateDetail,
};
use crate::domain::foundation::CommandMetadata;
use crate::domain::wbs::{WbsNumber, WbsTarget};
use crate::ports::{ChangeRequestRepository, NotificationGateway, WbsRepository};

use super::guards::{authorize_submit, resolve_target};
use super::notify::announce_created;
use super::CreateChangeRequestResult;

/// Command to submit a stage gate change request.
#[derive(Debug, Clone)]
pub struct CreateStageGateChangeRequestCommand {
    pub wbs_number: WbsNumber,
    pub leftover_budget: i64,
    pub confirm_done: bool,
}

/// Handler for submitting stage gate change requests.
pub struct CreateStageGateChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
    wbs: Arc<dyn WbsRepository>,
    notifier: Arc<dyn NotificationGateway>,
}

impl CreateStageGateChangeRequestHandler {
    pub fn new(
        change_requests: Arc<dyn ChangeRequestRepository>,
        wbs: Arc<dyn WbsRepository>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            change_requests,
            wbs,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateStageGateChangeRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateChangeRequestResult, ChangeRequestError> {
        authorize_submit(&metadata)?;
        let target = resolve_target(self.wbs.as_ref(), &cmd.wbs_number).await?;

        if !matches!(target, WbsTarget::WorkPackage { .. }) {
            return Err(ChangeRequestError::validation(
                "wbs_number",
                "stage gate change requests must target a work package",
            ));
        }

        let detail = StageGateDetail::new(cmd.leftover_budget, cmd.confirm_done)?;
        let change_request = ChangeRequest::new(
            metadata.user_id().clone(),
            cmd.wbs_number,
            ChangeRequestDetails::StageGate(detail),
        );

        self.change_requests.save(&change_request).await?;
        tracing::info!(
            cr_id = %change_request.id(),
            wbs = %cmd.wbs_number,
            submitter = %metadata.user_id(),
            "Stage gate change request submitted"
        );

        announce_created(
            self.wbs.as_ref(),
            self.notifier.as_ref(),
            &target,
            &change_request,
            metadata.actor.display_name_or_id(),
            None,
        )
        .await;

        Ok(CreateChangeRequestResult { change_request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::change_request::test_support::*;
    use crate::domain::change_request::ChangeRequestKind;

    fn handler(fixture: &Fixture) -> CreateStageGateChangeRequestHandler {
        CreateStageGateChangeRequestHandler::new(
            fixture.store.clone(),
            fixture.store.clone(),
            fixture.notifier.clone(),
        )
    }

    #[tokio::test]
    async fn persists_stage_gate_request() {
        let fixture = fixture().await;
        let cmd = CreateStageGateChangeRequestCommand {
            wbs_number: WP_B,
            leftover_budget: 25,
            confirm_done: true,
        };

        let cr = handler(&fixture)
            .handle(cmd, submitter())
            .await
            .unwrap()
            .change_request;

        assert_eq!(cr.kind(), ChangeRequestKind::StageGate);
        assert_eq!(cr.stage_gate_detail().unwrap().leftover_budget, 25);
    }

    #[tokio::test]
    async fn rejects_project_target() {
        let fixture = fixture().await;
        let cmd = CreateStageGateChangeRequestCommand {
            wbs_number: PROJECT,
            leftover_budget: 0,
            confirm_done: true,
        };

        let result = handler(&fixture).handle(cmd, submitter()).await;

        assert!(matches!(
            result,
            Err(ChangeRequestError::ValidationFailed { ref field, .. }) if field == "wbs_number"
        ));
    }

    #[tokio::test]
    async fn rejects_negative_leftover_budget() {
        let fixture = fixture().await;
        let cmd = CreateStageGateChangeRequestCommand {
            wbs_number: WP_B,
            leftover_budget: -10,
            confirm_done: true,
        };

        let result = handler(&fixture).handle(cmd, submitter()).await;

        assert!(matches!(
            result,
            Err(ChangeRequestError::ValidationFailed { ref field, .. })
                if field == "leftover_budget"
        ));
        assert!(fixture.notifier.sent().is_empty());
    }
}
