//! CreateScopeChangeRequestHandler - submits a standard (scope) change request.

use std::sync::Arc;

use crate::domain::change_request::{
    ChangeRequest, ChangeRequestDetails, ChangeRequestError, ProposedSolution, ScopeDetail,
    ScopeReason,
};
use crate::domain::foundation::CommandMetadata;
use crate::domain::wbs::WbsNumber;
use crate::ports::{ChangeRequestRepository, NotificationGateway, WbsRepository};

use super::guards::{authorize_submit, resolve_target};
use super::notify::announce_created;

/// A proposal submitted together with a scope change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedSolutionDraft {
    pub description: String,
    pub budget_impact: i64,
    pub timeline_impact: i32,
    pub scope_impact: String,
}

/// Command to submit a scope change request.
#[derive(Debug, Clone)]
pub struct CreateScopeChangeRequestCommand {
    pub wbs_number: WbsNumber,
    pub what: String,
    pub why: Vec<ScopeReason>,
    pub proposed_solutions: Vec<ProposedSolutionDraft>,
}

/// Result of a successful change request submission.
#[derive(Debug, Clone)]
pub struct CreateChangeRequestResult {
    pub change_request: ChangeRequest,
}

/// Handler for submitting scope change requests.
pub struct CreateScopeChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
    wbs: Arc<dyn WbsRepository>,
    notifier: Arc<dyn NotificationGateway>,
}

impl CreateScopeChangeRequestHandler {
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
        cmd: CreateScopeChangeRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateChangeRequestResult, ChangeRequestError> {
        authorize_submit(&metadata)?;
        let target = resolve_target(self.wbs.as_ref(), &cmd.wbs_number).await?;

        let solutions = cmd
            .proposed_solutions
            .into_iter()
            .map(|draft| {
                ProposedSolution::new(
                    draft.description,
                    draft.budget_impact,
                    draft.timeline_impact,
                    draft.scope_impact,
                    metadata.user_id().clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let budget_impact = solutions.iter().map(ProposedSolution::budget_impact).max();

        let detail = ScopeDetail::new(cmd.what, cmd.why, solutions)?;
        let change_request = ChangeRequest::new(
            metadata.user_id().clone(),
            cmd.wbs_number,
            ChangeRequestDetails::Standard(detail),
        );

        self.change_requests.save(&change_request).await?;
        tracing::info!(
            cr_id = %change_request.id(),
            wbs = %cmd.wbs_number,
            submitter = %metadata.user_id(),
            "Scope change request submitted"
        );

        announce_created(
            self.wbs.as_ref(),
            self.notifier.as_ref(),
            &target,
            &change_request,
            metadata.actor.display_name_or_id(),
            budget_impact,
        )
        .await;

        Ok(CreateChangeRequestResult { change_request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifications::{RecordedNotification, RecordingNotificationGateway};
    use crate::application::handlers::change_request::test_support::*;
    use crate::domain::change_request::{ChangeRequestKind, ReasonCode, Resource};
    use crate::domain::foundation::{Lookup, Role};
    use crate::domain::wbs::WbsElement;
    use crate::ports::NotificationTarget;

    fn handler(fixture: &Fixture) -> CreateScopeChangeRequestHandler {
        CreateScopeChangeRequestHandler::new(
            fixture.store.clone(),
            fixture.store.clone(),
            fixture.notifier.clone(),
        )
    }

    fn command(wbs_number: WbsNumber) -> CreateScopeChangeRequestCommand {
        CreateScopeChangeRequestCommand {
            wbs_number,
            what: "Switch to a larger motor".to_string(),
            why: vec![ScopeReason::new(ReasonCode::Competition, "need more torque")],
            proposed_solutions: vec![
                ProposedSolutionDraft {
                    description: "Buy the 80kW motor".to_string(),
                    budget_impact: 400,
                    timeline_impact: 2,
                    scope_impact: "new mounts".to_string(),
                },
                ProposedSolutionDraft {
                    description: "Rewind the current motor".to_string(),
                    budget_impact: 150,
                    timeline_impact: 4,
                    scope_impact: String::new(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn persists_pending_request_with_solutions() {
        let fixture = fixture().await;

        let result = handler(&fixture)
            .handle(command(WP_A), submitter())
            .await
            .unwrap();

        let cr = result.change_request;
        assert_eq!(cr.kind(), ChangeRequestKind::Standard);
        assert_eq!(cr.accepted(), None);
        assert_eq!(cr.scope_detail().unwrap().proposed_solutions.len(), 2);
        assert!(matches!(
            fixture.store.find_by_id(cr.id()).await.unwrap(),
            Lookup::Active(_)
        ));
    }

    #[tokio::test]
    async fn notifies_owning_team_with_largest_budget_impact() {
        let fixture = fixture().await;

        let cr = handler(&fixture)
            .handle(command(WP_A), submitter())
            .await
            .unwrap()
            .change_request;

        let sent = fixture.notifier.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            RecordedNotification::Created {
                target: NotificationTarget::Team(team),
                change_request_id,
                budget_impact,
                ..
            } => {
                assert_eq!(team.name, "Powertrain");
                assert_eq!(change_request_id, cr.id());
                assert_eq!(*budget_impact, Some(400));
            }
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_target_is_not_found() {
        let fixture = fixture().await;
        let result = handler(&fixture)
            .handle(command(WbsNumber::new(9, 9, 9)), submitter())
            .await;
        assert!(matches!(
            result,
            Err(ChangeRequestError::NotFound {
                resource: Resource::WbsElement,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn deleted_target_is_deleted_error() {
        let fixture = fixture().await;
        let mut element = WbsElement::new(WP_B, "Inverter");
        element.delete(None);
        let work_package = fixture.store.work_package(&WP_B).await.unwrap();
        fixture.store.insert_work_package(element, work_package).await;

        let result = handler(&fixture).handle(command(WP_B), submitter()).await;

        assert!(matches!(
            result,
            Err(ChangeRequestError::Deleted {
                resource: Resource::WbsElement,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn guests_cannot_submit() {
        let fixture = fixture().await;
        let result = handler(&fixture)
            .handle(command(WP_A), metadata("guest", Role::Guest))
            .await;
        assert!(matches!(result, Err(ChangeRequestError::Forbidden(_))));
    }

    #[tokio::test]
    async fn rejects_negative_timeline_impact() {
        let fixture = fixture().await;
        let mut cmd = command(WP_A);
        cmd.proposed_solutions[0].timeline_impact = -1;

        let result = handler(&fixture).handle(cmd, submitter()).await;

        assert!(matches!(
            result,
            Err(ChangeRequestError::ValidationFailed { ref field, .. })
                if field == "timeline_impact"
        ));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submission() {
        let fixture = fixture().await;
        let failing = Arc::new(RecordingNotificationGateway::failing());
        let handler = CreateScopeChangeRequestHandler::new(
            fixture.store.clone(),
            fixture.store.clone(),
            failing.clone(),
        );

        let result = handler.handle(command(WP_A), submitter()).await;

        assert!(result.is_ok());
        assert_eq!(failing.sent().len(), 1);
    }
}
