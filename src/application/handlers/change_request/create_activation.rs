//! CreateActivationChangeRequestHandler - submits an activation change request.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::change_request::{
    ActivationDetail, ChangeRequest, ChangeRequestDetails, ChangeRequestError,
};
use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::wbs::{WbsNumber, WbsStatus};
use crate::ports::{ChangeRequestRepository, NotificationGateway, WbsRepository};

use super::guards::{authorize_submit, resolve_target};
use super::notify::announce_created;
use super::CreateChangeRequestResult;

/// Command to submit an activation change request.
#[derive(Debug, Clone)]
pub struct CreateActivationChangeRequestCommand {
    pub wbs_number: WbsNumber,
    pub project_lead: UserId,
    pub project_manager: UserId,
    pub start_date: NaiveDate,
    pub confirm_details: bool,
}

/// Handler for submitting activation change requests.
pub struct CreateActivationChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
    wbs: Arc<dyn WbsRepository>,
    notifier: Arc<dyn NotificationGateway>,
}

impl CreateActivationChangeRequestHandler {
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
        cmd: CreateActivationChangeRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateChangeRequestResult, ChangeRequestError> {
        authorize_submit(&metadata)?;
        let target = resolve_target(self.wbs.as_ref(), &cmd.wbs_number).await?;

        if target.element().status() != WbsStatus::Inactive {
            return Err(ChangeRequestError::validation(
                "status",
                format!(
                    "only inactive elements can be activated, {} is {}",
                    cmd.wbs_number,
                    target.element().status()
                ),
            ));
        }

        let detail = ActivationDetail::new(
            cmd.project_lead,
            cmd.project_manager,
            cmd.start_date,
            cmd.confirm_details,
        )?;
        let change_request = ChangeRequest::new(
            metadata.user_id().clone(),
            cmd.wbs_number,
            ChangeRequestDetails::Activation(detail),
        );

        self.change_requests.save(&change_request).await?;
        tracing::info!(
            cr_id = %change_request.id(),
            wbs = %cmd.wbs_number,
            submitter = %metadata.user_id(),
            "Activation change request submitted"
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
