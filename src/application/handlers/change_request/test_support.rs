//! Shared fixtures for change request handler tests.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::adapters::memory::InMemoryProjectStore;
use crate::adapters::notifications::RecordingNotificationGateway;
use crate::domain::change_request::{
    ChangeRequest, ChangeRequestDetails, ProposedSolution, ReasonCode, ScopeDetail, ScopeReason,
};
use crate::domain::foundation::{AuthenticatedUser, CommandMetadata, Role, TeamId, UserId};
use crate::domain::wbs::{Project, Team, WbsElement, WbsNumber, WorkPackage};

pub const PROJECT: WbsNumber = WbsNumber {
    car_number: 1,
    project_number: 1,
    work_package_number: 0,
};
pub const WP_A: WbsNumber = WbsNumber {
    car_number: 1,
    project_number: 1,
    work_package_number: 1,
};
pub const WP_B: WbsNumber = WbsNumber {
    car_number: 1,
    project_number: 1,
    work_package_number: 2,
};
pub const WP_C: WbsNumber = WbsNumber {
    car_number: 1,
    project_number: 1,
    work_package_number: 3,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn metadata(id: &str, role: Role) -> CommandMetadata {
    CommandMetadata::new(AuthenticatedUser::new(user(id), role, None))
}

pub fn submitter() -> CommandMetadata {
    metadata("submitter", Role::Member)
}

pub fn reviewer() -> CommandMetadata {
    metadata("reviewer", Role::Head)
}

pub struct Fixture {
    pub store: Arc<InMemoryProjectStore>,
    pub notifier: Arc<RecordingNotificationGateway>,
}

/// Project 1.1.0 (budget 1000, one team) with C -> B -> A.
pub async fn fixture() -> Fixture {
    let store = InMemoryProjectStore::new();
    let team = Team::new(TeamId::new(), "Powertrain", Some("C-POWER".to_string()));
    store.insert_team(team.clone()).await;
    store
        .insert_project(
            WbsElement::new(PROJECT, "Powertrain"),
            Project::new(PROJECT, "Motor and inverter", 1_000).with_team(team.id),
        )
        .await;
    store
        .insert_work_package(
            WbsElement::new(WP_A, "Motor mounts"),
            WorkPackage::new(WP_A, date(2024, 1, 1), 5),
        )
        .await;
    store
        .insert_work_package(
            WbsElement::new(WP_B, "Inverter"),
            WorkPackage::new(WP_B, date(2024, 2, 5), 3).depends_on(WP_A),
        )
        .await;
    store
        .insert_work_package(
            WbsElement::new(WP_C, "Integration"),
            WorkPackage::new(WP_C, date(2024, 2, 26), 2).depends_on(WP_B),
        )
        .await;

    Fixture {
        store: Arc::new(store),
        notifier: Arc::new(RecordingNotificationGateway::new()),
    }
}

/// A pending scope change request on `target` with one proposal, already saved.
pub async fn saved_scope_request(
    fixture: &Fixture,
    target: WbsNumber,
    budget_impact: i64,
    timeline_impact: i32,
) -> ChangeRequest {
    use crate::ports::ChangeRequestRepository;

    let solution =
        ProposedSolution::new("Rework", budget_impact, timeline_impact, "", user("submitter"))
            .unwrap();
    let detail = ScopeDetail::new(
        "Change the design",
        vec![ScopeReason::new(ReasonCode::Design, "interference")],
        vec![solution],
    )
    .unwrap();
    let cr = ChangeRequest::new(
        user("submitter"),
        target,
        ChangeRequestDetails::Standard(detail),
    );
    fixture.store.save(&cr).await.unwrap();
    cr
}
