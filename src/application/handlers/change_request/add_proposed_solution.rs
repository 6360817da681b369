//! AddProposedSolutionHandler - attaches a proposal to a pending scope change request.

use std::sync::Arc;

use crate::domain::change_request::{ChangeRequestError, ProposedSolution};
use crate::domain::foundation::{ChangeRequestId, CommandMetadata, ProposedSolutionId};
use crate::ports::ChangeRequestRepository;

use super::guards::{authorize_submit, load_change_request};

/// Command to propose a solution for a scope change request.
#[derive(Debug, Clone)]
pub struct AddProposedSolutionCommand {
    pub change_request_id: ChangeRequestId,
    pub description: String,
    pub budget_impact: i64,
    pub timeline_impact: i32,
    pub scope_impact: String,
}

/// Result of a successful proposal.
#[derive(Debug, Clone)]
pub struct AddProposedSolutionResult {
    pub proposed_solution_id: ProposedSolutionId,
}

/// Handler for adding proposed solutions.
pub struct AddProposedSolutionHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
}

impl AddProposedSolutionHandler {
    pub fn new(change_requests: Arc<dyn ChangeRequestRepository>) -> Self {
        Self { change_requests }
    }

    pub async fn handle(
        &self,
        cmd: AddProposedSolutionCommand,
        metadata: CommandMetadata,
    ) -> Result<AddProposedSolutionResult, ChangeRequestError> {
        authorize_submit(&metadata)?;

        let mut change_request =
            load_change_request(self.change_requests.as_ref(), &cmd.change_request_id).await?;

        let solution = ProposedSolution::new(
            cmd.description,
            cmd.budget_impact,
            cmd.timeline_impact,
            cmd.scope_impact,
            metadata.user_id().clone(),
        )?;

        // Pending and scope-typed checks live on the aggregate.
        let proposed_solution_id = change_request.add_proposed_solution(solution.clone())?;

        self.change_requests
            .add_proposed_solution(&cmd.change_request_id, &solution)
            .await?;

        tracing::info!(
            cr_id = %cmd.change_request_id,
            solution_id = %proposed_solution_id,
            "Proposed solution added"
        );

        Ok(AddProposedSolutionResult {
            proposed_solution_id,
        })
    }
}
