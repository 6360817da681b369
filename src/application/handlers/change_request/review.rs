//! ReviewChangeRequestHandler - records a review decision and applies its effects.
//!
//! # Flow
//!
//! 1. Authorize the reviewer's role
//! 2. Lock every project the review writes and load the change request and target
//! 3. Compute every effect of the decision in memory: WBS mutations,
//!    propagated start dates, audit records and the reviewed state
//! 4. Commit everything through one conditional repository call
//! 5. Release the locks and notify the submitter (best effort)
//!
//! Nothing is written before step 4, so every failure leaves state untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::change_log::{Change, ChangeField};
use crate::domain::change_request::{
    ActivationDetail, ChangeRequest, ChangeRequestDetails, ChangeRequestError,
};
use crate::domain::foundation::{ChangeRequestId, CommandMetadata, ProposedSolutionId, UserId};
use crate::domain::wbs::{WbsStatus, WbsTarget};
use crate::ports::{ChangeRequestRepository, NotificationGateway, ReviewCommit, WbsRepository};

use super::guards::{authorize_review, load_change_request, resolve_target};
use super::notify::announce_reviewed;
use super::project_locks::ProjectLocks;
use super::propagate::SchedulePropagator;

/// Command to review a change request.
#[derive(Debug, Clone)]
pub struct ReviewChangeRequestCommand {
    pub change_request_id: ChangeRequestId,
    pub accepted: bool,
    pub review_notes: String,
    /// Required when accepting a scope change request.
    pub proposed_solution_id: Option<ProposedSolutionId>,
}

/// Result of a successful review.
#[derive(Debug, Clone)]
pub struct ReviewChangeRequestResult {
    pub change_request: ChangeRequest,
    pub changes: Vec<Change>,
}

/// Handler for reviewing change requests.
pub struct ReviewChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
    wbs: Arc<dyn WbsRepository>,
    notifier: Arc<dyn NotificationGateway>,
    propagator: SchedulePropagator,
    locks: Arc<ProjectLocks>,
}

impl ReviewChangeRequestHandler {
    pub fn new(
        change_requests: Arc<dyn ChangeRequestRepository>,
        wbs: Arc<dyn WbsRepository>,
        notifier: Arc<dyn NotificationGateway>,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            change_requests,
            propagator: SchedulePropagator::new(wbs.clone()),
            wbs,
            notifier,
            locks,
        }
    }

    #[tracing::instrument(
        skip(self, cmd, metadata),
        fields(
            cr_id = %cmd.change_request_id,
            reviewer = %metadata.user_id(),
            source = %metadata.source(),
            accepted = cmd.accepted
        )
    )]
    pub async fn handle(
        &self,
        cmd: ReviewChangeRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<ReviewChangeRequestResult, ChangeRequestError> {
        authorize_review(&metadata)?;
        let reviewer = metadata.user_id().clone();

        let located =
            load_change_request(self.change_requests.as_ref(), &cmd.change_request_id).await?;
        let mut projects = BTreeSet::from([located.wbs_number().project_key()]);

        // Propagation may reach projects that are not locked yet; relock with
        // the larger set and recompute. The set only grows, so this ends.
        let (change_request, changes) = loop {
            let guards = self.locks.acquire_all(&projects).await;
            let commit = self.prepare(&cmd, &reviewer).await?;

            let touched = commit.projects();
            if !touched.is_subset(&projects) {
                drop(guards);
                tracing::debug!(
                    locked = projects.len(),
                    touched = touched.len(),
                    "Review reaches unlocked projects, relocking"
                );
                projects.extend(touched);
                continue;
            }

            let change_request = commit.change_request.clone();
            let changes = commit.changes.clone();
            self.change_requests.commit_review(commit).await?;
            drop(guards);
            break (change_request, changes);
        };

        tracing::info!(
            kind = %change_request.kind(),
            changes = changes.len(),
            projects = projects.len(),
            "Change request reviewed"
        );

        announce_reviewed(self.notifier.as_ref(), &change_request).await;

        Ok(ReviewChangeRequestResult {
            change_request,
            changes,
        })
    }

    /// Load the change request under the held locks and compute its commit.
    async fn prepare(
        &self,
        cmd: &ReviewChangeRequestCommand,
        reviewer: &UserId,
    ) -> Result<ReviewCommit, ChangeRequestError> {
        let mut change_request =
            load_change_request(self.change_requests.as_ref(), &cmd.change_request_id).await?;
        change_request.ensure_pending()?;
        let target = resolve_target(self.wbs.as_ref(), change_request.wbs_number()).await?;

        if change_request.submitter() == reviewer {
            return Err(ChangeRequestError::forbidden(
                "reviewers cannot review their own change request",
            ));
        }

        let mut commit = if cmd.accepted {
            self.apply_effects(&mut change_request, target, cmd, reviewer).await?
        } else {
            ReviewCommit::decision_only(change_request.clone())
        };

        change_request.record_review(reviewer.clone(), cmd.accepted, cmd.review_notes.clone())?;
        commit.change_request = change_request;
        Ok(commit)
    }

    /// Compute the effects of accepting `change_request` against `target`.
    async fn apply_effects(
        &self,
        change_request: &mut ChangeRequest,
        target: WbsTarget,
        cmd: &ReviewChangeRequestCommand,
        reviewer: &UserId,
    ) -> Result<ReviewCommit, ChangeRequestError> {
        let cr_id = *change_request.id();
        let wbs_number = *change_request.wbs_number();
        let record = |field: ChangeField, old: String, new: String| {
            Change::field_changed(cr_id, reviewer.clone(), wbs_number, field, old, new)
        };
        let mut commit = ReviewCommit::decision_only(change_request.clone());

        match change_request.details().clone() {
            ChangeRequestDetails::Standard(_) => {
                let solution_id = cmd.proposed_solution_id.ok_or_else(|| {
                    ChangeRequestError::validation(
                        "proposed_solution_id",
                        "a proposed solution must be selected to accept a scope change request",
                    )
                })?;
                let solution = change_request.approve_solution(&solution_id)?;

                match target {
                    WbsTarget::Project { mut project, .. } => {
                        let (old, new) = project.adjust_budget(solution.budget_impact())?;
                        commit.changes.push(record(
                            ChangeField::Budget,
                            old.to_string(),
                            new.to_string(),
                        ));
                        commit.project = Some(project);
                    }
                    WbsTarget::WorkPackage {
                        mut work_package,
                        mut project,
                        ..
                    } => {
                        let (old, new) = project.adjust_budget(solution.budget_impact())?;
                        commit.changes.push(record(
                            ChangeField::Budget,
                            old.to_string(),
                            new.to_string(),
                        ));

                        let (old, new) = work_package.adjust_duration(solution.timeline_impact())?;
                        commit.changes.push(record(
                            ChangeField::Duration,
                            old.to_string(),
                            new.to_string(),
                        ));

                        if solution.timeline_impact() > 0 {
                            let propagation = self
                                .propagator
                                .propagate(
                                    &wbs_number,
                                    solution.timeline_impact(),
                                    cr_id,
                                    reviewer,
                                )
                                .await?;
                            commit.changes.extend(propagation.changes);
                            commit.work_packages.extend(propagation.shifted);
                        }

                        commit.project = Some(project);
                        commit.work_packages.insert(0, work_package);
                    }
                }
            }

            ChangeRequestDetails::StageGate(_) => {
                let WbsTarget::WorkPackage {
                    mut element,
                    work_package,
                    ..
                } = target
                else {
                    return Err(ChangeRequestError::validation(
                        "wbs_number",
                        "stage gate change requests must target a work package",
                    ));
                };

                if let Some(list) = work_package.first_incomplete_checklist() {
                    return Err(ChangeRequestError::validation(
                        list.field_name(),
                        format!("work package {} has unchecked {}", wbs_number, list),
                    ));
                }

                if let Some(previous) = element.complete()? {
                    commit.changes.push(record(
                        ChangeField::Status,
                        previous.to_string(),
                        WbsStatus::Complete.to_string(),
                    ));
                    commit.element = Some(element);
                }
            }

            ChangeRequestDetails::Activation(detail) => {
                self.activate(&mut commit, target, &detail, &record)?;
            }
        }

        Ok(commit)
    }

    fn activate(
        &self,
        commit: &mut ReviewCommit,
        target: WbsTarget,
        detail: &ActivationDetail,
        record: &dyn Fn(ChangeField, String, String) -> Change,
    ) -> Result<(), ChangeRequestError> {
        let (mut element, work_package) = match target {
            WbsTarget::Project { element, .. } => (element, None),
            WbsTarget::WorkPackage {
                element,
                work_package,
                ..
            } => (element, Some(work_package)),
        };

        if element.project_lead() != Some(&detail.project_lead) {
            commit.changes.push(record(
                ChangeField::ProjectLead,
                display_user(element.project_lead()),
                detail.project_lead.to_string(),
            ));
        }
        if element.project_manager() != Some(&detail.project_manager) {
            commit.changes.push(record(
                ChangeField::ProjectManager,
                display_user(element.project_manager()),
                detail.project_manager.to_string(),
            ));
        }

        if let Some(mut work_package) = work_package {
            if work_package.start_date() != detail.start_date {
                let old = work_package.set_start_date(detail.start_date);
                commit.changes.push(record(
                    ChangeField::StartDate,
                    old.to_string(),
                    detail.start_date.to_string(),
                ));
                commit.work_packages.push(work_package);
            }
        }

        let previous =
            element.activate(detail.project_lead.clone(), detail.project_manager.clone())?;
        commit.changes.push(record(
            ChangeField::Status,
            previous.to_string(),
            WbsStatus::Active.to_string(),
        ));
        commit.element = Some(element);
        Ok(())
    }
}

fn display_user(user: Option<&UserId>) -> String {
    user.map(UserId::to_string)
        .unwrap_or_else(|| "none".to_string())
}
