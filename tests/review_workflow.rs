//! End-to-end change request workflows through the public handler API.
//!
//! Each test seeds an in-memory project, drives the command handlers the
//! way the HTTP layer does, and checks the resulting WBS state and audit
//! trail.

use chrono::NaiveDate;
use std::sync::Arc;

use wbs_review::adapters::memory::InMemoryProjectStore;
use wbs_review::adapters::notifications::{RecordedNotification, RecordingNotificationGateway};
use wbs_review::application::handlers::change_request::{
    AddProposedSolutionCommand, AddProposedSolutionHandler, ChangeHistoryHandler,
    ChangeHistoryQuery, CreateActivationChangeRequestCommand,
    CreateActivationChangeRequestHandler, CreateScopeChangeRequestCommand,
    CreateScopeChangeRequestHandler, CreateStageGateChangeRequestCommand,
    CreateStageGateChangeRequestHandler, ProjectLocks, ProposedSolutionDraft,
    ReviewChangeRequestCommand, ReviewChangeRequestHandler,
};
use wbs_review::domain::change_log::record_change;
use wbs_review::domain::change_request::{
    ChangeRequestError, ReasonCode, Resource, ScopeReason,
};
use wbs_review::domain::foundation::{
    AuthenticatedUser, ChangeRequestId, CommandMetadata, ProposedSolutionId, Role, TeamId, UserId,
};
use wbs_review::domain::wbs::{
    ChecklistItem, ChecklistKind, Project, Team, WbsElement, WbsNumber, WbsStatus, WorkPackage,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PROJECT: WbsNumber = WbsNumber {
    car_number: 2,
    project_number: 4,
    work_package_number: 0,
};
const FRAME: WbsNumber = WbsNumber {
    car_number: 2,
    project_number: 4,
    work_package_number: 1,
};
const SUSPENSION: WbsNumber = WbsNumber {
    car_number: 2,
    project_number: 4,
    work_package_number: 2,
};
const BODYWORK: WbsNumber = WbsNumber {
    car_number: 2,
    project_number: 4,
    work_package_number: 3,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn as_user(id: &str, role: Role) -> CommandMetadata {
    CommandMetadata::new(AuthenticatedUser::new(user(id), role, None))
}

struct App {
    store: Arc<InMemoryProjectStore>,
    notifier: Arc<RecordingNotificationGateway>,
    create_scope: CreateScopeChangeRequestHandler,
    create_activation: CreateActivationChangeRequestHandler,
    create_stage_gate: CreateStageGateChangeRequestHandler,
    add_solution: AddProposedSolutionHandler,
    review: ReviewChangeRequestHandler,
    history: ChangeHistoryHandler,
}

impl App {
    /// Chassis project (budget 5000) with bodywork -> suspension -> frame.
    async fn seeded() -> Self {
        let store = InMemoryProjectStore::new();
        let team = Team::new(TeamId::new(), "Chassis", Some("C-CHASSIS".to_string()));
        store.insert_team(team.clone()).await;
        store
            .insert_project(
                WbsElement::new(PROJECT, "Chassis"),
                Project::new(PROJECT, "Frame and suspension", 5_000).with_team(team.id),
            )
            .await;
        store
            .insert_work_package(
                WbsElement::new(FRAME, "Frame"),
                WorkPackage::new(FRAME, date(2024, 3, 4), 5),
            )
            .await;
        store
            .insert_work_package(
                WbsElement::new(SUSPENSION, "Suspension"),
                WorkPackage::new(SUSPENSION, date(2024, 4, 8), 4).depends_on(FRAME),
            )
            .await;
        store
            .insert_work_package(
                WbsElement::new(BODYWORK, "Bodywork"),
                WorkPackage::new(BODYWORK, date(2024, 5, 6), 3).depends_on(SUSPENSION),
            )
            .await;
        Self::over(Arc::new(store))
    }

    fn over(store: Arc<InMemoryProjectStore>) -> Self {
        let notifier = Arc::new(RecordingNotificationGateway::new());
        let locks = Arc::new(ProjectLocks::new());
        Self {
            create_scope: CreateScopeChangeRequestHandler::new(
                store.clone(),
                store.clone(),
                notifier.clone(),
            ),
            create_activation: CreateActivationChangeRequestHandler::new(
                store.clone(),
                store.clone(),
                notifier.clone(),
            ),
            create_stage_gate: CreateStageGateChangeRequestHandler::new(
                store.clone(),
                store.clone(),
                notifier.clone(),
            ),
            add_solution: AddProposedSolutionHandler::new(store.clone()),
            review: ReviewChangeRequestHandler::new(
                store.clone(),
                store.clone(),
                notifier.clone(),
                locks,
            ),
            history: ChangeHistoryHandler::new(store.clone()),
            store,
            notifier,
        }
    }

    async fn submit_scope(&self, target: WbsNumber) -> ChangeRequestId {
        let cmd = CreateScopeChangeRequestCommand {
            wbs_number: target,
            what: "Switch to a steel space frame".to_string(),
            why: vec![ScopeReason::new(ReasonCode::Design, "Tube clearance")],
            proposed_solutions: vec![],
        };
        let created = self
            .create_scope
            .handle(cmd, as_user("alex", Role::Member))
            .await
            .unwrap();
        *created.change_request.id()
    }

    async fn propose(
        &self,
        change_request_id: ChangeRequestId,
        budget_impact: i64,
        timeline_impact: i32,
    ) -> ProposedSolutionId {
        let cmd = AddProposedSolutionCommand {
            change_request_id,
            description: "Weld additional gussets".to_string(),
            budget_impact,
            timeline_impact,
            scope_impact: "Frame weight increases".to_string(),
        };
        self.add_solution
            .handle(cmd, as_user("alex", Role::Member))
            .await
            .unwrap()
            .proposed_solution_id
    }

    async fn history(&self, query: ChangeHistoryQuery) -> Vec<String> {
        self.history
            .handle(query)
            .await
            .unwrap()
            .iter()
            .map(|change| change.detail().to_string())
            .collect()
    }
}

fn accept(
    change_request_id: ChangeRequestId,
    proposed_solution_id: Option<ProposedSolutionId>,
) -> ReviewChangeRequestCommand {
    ReviewChangeRequestCommand {
        change_request_id,
        accepted: true,
        review_notes: "Approved at design review".to_string(),
        proposed_solution_id,
    }
}

fn head() -> CommandMetadata {
    as_user("sam", Role::Head)
}

// =============================================================================
// Scope
// =============================================================================

#[tokio::test]
async fn accepted_scope_request_extends_timeline_and_shifts_dependents_once() {
    let app = App::seeded().await;
    let cr = app.submit_scope(FRAME).await;
    app.propose(cr, 400, 4).await;
    let chosen = app.propose(cr, 250, 2).await;

    let reviewed = app.review.handle(accept(cr, Some(chosen)), head()).await.unwrap();

    assert_eq!(reviewed.change_request.accepted(), Some(true));
    assert_eq!(app.store.project(&PROJECT).await.unwrap().budget(), 5_250);
    assert_eq!(app.store.work_package(&FRAME).await.unwrap().duration_weeks(), 7);
    assert_eq!(
        app.store.work_package(&SUSPENSION).await.unwrap().start_date(),
        date(2024, 4, 22)
    );
    assert_eq!(
        app.store.work_package(&BODYWORK).await.unwrap().start_date(),
        date(2024, 5, 20)
    );

    let trail = app.history(ChangeHistoryQuery::ByChangeRequest(cr)).await;
    assert_eq!(
        trail,
        vec![
            "Budget changed from 5000 to 5250",
            "Duration changed from 5 to 7",
            "Start Date changed from 2024-04-08 to 2024-04-22",
            "Start Date changed from 2024-05-06 to 2024-05-20",
        ]
    );

    let change_request = app.store.change_request(&cr).await.unwrap();
    let approved: Vec<bool> = change_request
        .scope_detail()
        .unwrap()
        .proposed_solutions
        .iter()
        .map(|solution| solution.is_approved())
        .collect();
    assert_eq!(approved, vec![false, true]);
}

#[tokio::test]
async fn second_review_conflicts_and_leaves_state_untouched() {
    let app = App::seeded().await;
    let cr = app.submit_scope(FRAME).await;
    let chosen = app.propose(cr, 100, 1).await;
    app.review.handle(accept(cr, Some(chosen)), head()).await.unwrap();
    let budget = app.store.project(&PROJECT).await.unwrap().budget();
    let changes = app.store.changes().await.len();

    let denial = ReviewChangeRequestCommand {
        change_request_id: cr,
        accepted: false,
        review_notes: String::new(),
        proposed_solution_id: None,
    };
    let result = app.review.handle(denial, as_user("robin", Role::Admin)).await;

    assert!(matches!(result, Err(ChangeRequestError::AlreadyReviewed(_))));
    assert_eq!(app.store.project(&PROJECT).await.unwrap().budget(), budget);
    assert_eq!(app.store.changes().await.len(), changes);
    assert_eq!(
        app.store.change_request(&cr).await.unwrap().accepted(),
        Some(true)
    );
}

#[tokio::test]
async fn unauthorized_reviewers_are_rejected() {
    let app = App::seeded().await;
    let cr = app.submit_scope(FRAME).await;
    let chosen = app.propose(cr, 100, 1).await;

    for reviewer in [
        as_user("guest", Role::Guest),
        as_user("member", Role::Member),
        as_user("alex", Role::Admin),
    ] {
        let result = app.review.handle(accept(cr, Some(chosen)), reviewer).await;
        assert!(matches!(result, Err(ChangeRequestError::Forbidden(_))));
    }
    assert!(app.store.changes().await.is_empty());
    assert!(app.store.change_request(&cr).await.unwrap().accepted().is_none());
}

#[tokio::test]
async fn submitting_against_missing_or_deleted_element_fails() {
    let app = App::seeded().await;
    let mut element = app.store.element(&BODYWORK).await.unwrap();
    element.delete(Some(user("sam")));
    let work_package = app.store.work_package(&BODYWORK).await.unwrap();
    app.store.insert_work_package(element, work_package).await;

    let scope = |wbs_number| CreateScopeChangeRequestCommand {
        wbs_number,
        what: "Anything".to_string(),
        why: vec![ScopeReason::new(ReasonCode::Other, "n/a")],
        proposed_solutions: vec![ProposedSolutionDraft {
            description: "Rework".to_string(),
            budget_impact: 10,
            timeline_impact: 0,
            scope_impact: String::new(),
        }],
    };

    let deleted = app
        .create_scope
        .handle(scope(BODYWORK), as_user("alex", Role::Member))
        .await;
    let missing = app
        .create_scope
        .handle(scope(WbsNumber::new(2, 4, 9)), as_user("alex", Role::Member))
        .await;

    assert!(matches!(
        deleted,
        Err(ChangeRequestError::Deleted {
            resource: Resource::WbsElement,
            ..
        })
    ));
    assert!(matches!(
        missing,
        Err(ChangeRequestError::NotFound {
            resource: Resource::WbsElement,
            ..
        })
    ));
}

// =============================================================================
// Stage gate and activation
// =============================================================================

#[tokio::test]
async fn stage_gate_waits_for_checklists_then_completes() {
    let app = App::seeded().await;
    let element = app.store.element(&FRAME).await.unwrap();
    let unchecked = WorkPackage::new(FRAME, date(2024, 3, 4), 5)
        .with_item(ChecklistKind::ExpectedActivities, ChecklistItem::new("Jig build"));
    app.store.insert_work_package(element.clone(), unchecked).await;

    let cmd = CreateStageGateChangeRequestCommand {
        wbs_number: FRAME,
        leftover_budget: 0,
        confirm_done: true,
    };
    let created = app
        .create_stage_gate
        .handle(cmd, as_user("alex", Role::Member))
        .await
        .unwrap();
    let cr = *created.change_request.id();

    let blocked = app.review.handle(accept(cr, None), head()).await;
    assert!(matches!(
        blocked,
        Err(ChangeRequestError::ValidationFailed { ref field, .. })
            if field == "expected_activities"
    ));
    assert_eq!(
        app.store.element(&FRAME).await.unwrap().status(),
        WbsStatus::Inactive
    );
    assert!(app.store.change_request(&cr).await.unwrap().accepted().is_none());

    // The request stays pending, so it can be reviewed once the list is done.
    let checked = WorkPackage::new(FRAME, date(2024, 3, 4), 5).with_item(
        ChecklistKind::ExpectedActivities,
        ChecklistItem::new("Jig build").checked(user("alex")),
    );
    app.store.insert_work_package(element, checked).await;

    let reviewed = app.review.handle(accept(cr, None), head()).await.unwrap();

    assert_eq!(
        app.store.element(&FRAME).await.unwrap().status(),
        WbsStatus::Complete
    );
    assert_eq!(
        reviewed
            .changes
            .iter()
            .map(|change| change.detail())
            .collect::<Vec<_>>(),
        vec!["Status changed from INACTIVE to COMPLETE"]
    );
}

#[tokio::test]
async fn activation_records_each_changed_field_and_status() {
    let app = App::seeded().await;
    let cmd = CreateActivationChangeRequestCommand {
        wbs_number: SUSPENSION,
        project_lead: user("lee"),
        project_manager: user("morgan"),
        start_date: date(2024, 4, 15),
        confirm_details: true,
    };
    let created = app
        .create_activation
        .handle(cmd, as_user("alex", Role::Member))
        .await
        .unwrap();
    let cr = *created.change_request.id();

    let reviewed = app.review.handle(accept(cr, None), head()).await.unwrap();

    let element = app.store.element(&SUSPENSION).await.unwrap();
    assert_eq!(element.status(), WbsStatus::Active);
    assert_eq!(element.project_lead(), Some(&user("lee")));
    assert_eq!(element.project_manager(), Some(&user("morgan")));
    assert_eq!(
        app.store.work_package(&SUSPENSION).await.unwrap().start_date(),
        date(2024, 4, 15)
    );
    assert_eq!(reviewed.changes.len(), 4);
    assert_eq!(
        app.history(ChangeHistoryQuery::ByWbsNumber(SUSPENSION))
            .await
            .last()
            .map(String::as_str),
        Some("Status changed from INACTIVE to ACTIVE")
    );
}

// =============================================================================
// Notifications and failure isolation
// =============================================================================

#[tokio::test]
async fn notifications_follow_creation_and_review() {
    let app = App::seeded().await;
    let cr = app.submit_scope(FRAME).await;
    let chosen = app.propose(cr, 100, 0).await;
    app.review.handle(accept(cr, Some(chosen)), head()).await.unwrap();

    let sent = app.notifier.sent();
    assert!(matches!(
        sent.first(),
        Some(RecordedNotification::Created { change_request_id, .. }) if *change_request_id == cr
    ));
    assert!(matches!(
        sent.last(),
        Some(RecordedNotification::Reviewed { user: submitter, change_request_id })
            if *change_request_id == cr && *submitter == user("alex")
    ));
}

#[tokio::test]
async fn failed_commit_applies_nothing() {
    let app = App::seeded().await;
    let cr = app.submit_scope(FRAME).await;
    let chosen = app.propose(cr, 100, 3).await;
    app.store.fail_commits(true);

    let result = app.review.handle(accept(cr, Some(chosen)), head()).await;

    assert!(matches!(result, Err(ChangeRequestError::Infrastructure(_))));
    assert_eq!(app.store.project(&PROJECT).await.unwrap().budget(), 5_000);
    assert_eq!(
        app.store.work_package(&SUSPENSION).await.unwrap().start_date(),
        date(2024, 4, 8)
    );
    assert!(app.store.changes().await.is_empty());
    assert!(app.store.change_request(&cr).await.unwrap().accepted().is_none());
}

#[test]
fn change_phrasing_is_stable() {
    let first = record_change("Budget", "100", "175");
    let second = record_change("Budget", "100", "175");
    assert_eq!(first, "Budget changed from 100 to 175");
    assert_eq!(first, second);
}
