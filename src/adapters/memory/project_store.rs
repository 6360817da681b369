//! In-Memory Project Store Adapter
//!
//! Holds the WBS, change requests and the change log behind a single lock,
//! so a review commit is applied all at once or not at all.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::change_log::Change;
use crate::domain::change_request::{ChangeRequest, ProposedSolution};
use crate::domain::foundation::{ChangeRequestId, DomainError, ErrorCode, Lookup, TeamId};
use crate::domain::wbs::{Project, Team, WbsElement, WbsNumber, WbsTarget, WorkPackage};
use crate::ports::{ChangeLogReader, ChangeRequestRepository, ReviewCommit, WbsRepository};

#[derive(Debug, Default)]
struct StoreState {
    elements: BTreeMap<WbsNumber, WbsElement>,
    projects: BTreeMap<WbsNumber, Project>,
    work_packages: BTreeMap<WbsNumber, WorkPackage>,
    teams: HashMap<TeamId, Team>,
    change_requests: HashMap<ChangeRequestId, ChangeRequest>,
    changes: Vec<Change>,
}

impl StoreState {
    /// Conditional-write guard: the stored change request must still be open.
    fn ensure_pending(&self, id: &ChangeRequestId) -> Result<(), DomainError> {
        let stored = self.change_requests.get(id).ok_or_else(|| {
            DomainError::for_record(
                ErrorCode::ChangeRequestNotFound,
                "Change request not found",
                id,
            )
        })?;
        if stored.lifecycle().is_deleted() {
            return Err(DomainError::for_record(
                ErrorCode::ChangeRequestDeleted,
                "Change request has been deleted",
                id,
            ));
        }
        if stored.accepted().is_some() {
            return Err(DomainError::for_record(
                ErrorCode::AlreadyReviewed,
                "Change request has already been reviewed",
                id,
            ));
        }
        Ok(())
    }
}

/// In-memory implementation of the persistence ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    state: Arc<RwLock<StoreState>>,
    fail_commits: Arc<AtomicBool>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Seeding
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a project and its element.
    pub async fn insert_project(&self, element: WbsElement, project: Project) {
        let mut state = self.state.write().await;
        let key = *element.wbs_number();
        state.elements.insert(key, element);
        state.projects.insert(key, project);
    }

    /// Insert a work package and its element.
    pub async fn insert_work_package(&self, element: WbsElement, work_package: WorkPackage) {
        let mut state = self.state.write().await;
        let key = *element.wbs_number();
        state.elements.insert(key, element);
        state.work_packages.insert(key, work_package);
    }

    pub async fn insert_team(&self, team: Team) {
        self.state.write().await.teams.insert(team.id, team);
    }

    /// Make every subsequent `commit_review` fail with a database error.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection (raw records, deleted ones included)
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn element(&self, wbs_number: &WbsNumber) -> Option<WbsElement> {
        self.state.read().await.elements.get(wbs_number).cloned()
    }

    pub async fn project(&self, wbs_number: &WbsNumber) -> Option<Project> {
        self.state.read().await.projects.get(wbs_number).cloned()
    }

    pub async fn work_package(&self, wbs_number: &WbsNumber) -> Option<WorkPackage> {
        self.state.read().await.work_packages.get(wbs_number).cloned()
    }

    pub async fn change_request(&self, id: &ChangeRequestId) -> Option<ChangeRequest> {
        self.state.read().await.change_requests.get(id).cloned()
    }

    pub async fn changes(&self) -> Vec<Change> {
        self.state.read().await.changes.clone()
    }
}

#[async_trait]
impl WbsRepository for InMemoryProjectStore {
    async fn find_target(&self, wbs_number: &WbsNumber) -> Result<Lookup<WbsTarget>, DomainError> {
        let state = self.state.read().await;
        let element = match state.elements.get(wbs_number) {
            None => return Ok(Lookup::Missing),
            Some(element) if element.is_deleted() => return Ok(Lookup::Deleted),
            Some(element) => element.clone(),
        };

        let project = match state.projects.get(&wbs_number.project_key()) {
            Some(project) => project.clone(),
            None => return Ok(Lookup::Missing),
        };

        if wbs_number.is_project() {
            return Ok(Lookup::Active(WbsTarget::Project { element, project }));
        }

        Ok(match state.work_packages.get(wbs_number) {
            Some(work_package) => Lookup::Active(WbsTarget::WorkPackage {
                element,
                work_package: work_package.clone(),
                project,
            }),
            None => Lookup::Missing,
        })
    }

    async fn find_dependents(
        &self,
        wbs_number: &WbsNumber,
    ) -> Result<Vec<WorkPackage>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .work_packages
            .values()
            .filter(|wp| wp.depends_on_element(wbs_number))
            .filter(|wp| {
                state
                    .elements
                    .get(wp.wbs_number())
                    .is_some_and(|element| !element.is_deleted())
            })
            .cloned()
            .collect())
    }

    async fn find_teams(&self, project: &WbsNumber) -> Result<Vec<Team>, DomainError> {
        let state = self.state.read().await;
        let Some(project) = state.projects.get(&project.project_key()) else {
            return Ok(Vec::new());
        };
        Ok(project
            .team_ids()
            .iter()
            .filter_map(|id| state.teams.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ChangeRequestRepository for InMemoryProjectStore {
    async fn save(&self, change_request: &ChangeRequest) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .change_requests
            .insert(*change_request.id(), change_request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChangeRequestId) -> Result<Lookup<ChangeRequest>, DomainError> {
        let state = self.state.read().await;
        Ok(Lookup::from_record(
            state.change_requests.get(id).cloned(),
            ChangeRequest::lifecycle,
        ))
    }

    async fn add_proposed_solution(
        &self,
        id: &ChangeRequestId,
        solution: &ProposedSolution,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.ensure_pending(id)?;
        let stored = state.change_requests.get_mut(id).ok_or_else(|| {
            DomainError::for_record(
                ErrorCode::ChangeRequestNotFound,
                "Change request not found",
                id,
            )
        })?;
        stored
            .add_proposed_solution(solution.clone())
            .map_err(|e| DomainError::for_record(e.code(), e.message(), id))?;
        Ok(())
    }

    async fn soft_delete(&self, change_request: &ChangeRequest) -> Result<(), DomainError> {
        let id = change_request.id();
        let mut state = self.state.write().await;
        if let Err(err) = state.ensure_pending(id) {
            return Err(match err.code {
                ErrorCode::ChangeRequestDeleted => DomainError::for_record(
                    ErrorCode::AlreadyDeleted,
                    "Change request already deleted",
                    id,
                ),
                _ => err,
            });
        }
        state.change_requests.insert(*id, change_request.clone());
        Ok(())
    }

    async fn commit_review(&self, commit: ReviewCommit) -> Result<(), DomainError> {
        let id = *commit.change_request.id();
        let mut state = self.state.write().await;
        state.ensure_pending(&id)?;

        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated commit failure"));
        }

        let mut reviewed = state.change_requests.get(&id).cloned().ok_or_else(|| {
            DomainError::for_record(
                ErrorCode::ChangeRequestNotFound,
                "Change request not found",
                id,
            )
        })?;
        reviewed
            .adopt_review(&commit.change_request)
            .map_err(|e| DomainError::for_record(e.code(), e.message(), id))?;

        if let Some(element) = commit.element {
            state.elements.insert(*element.wbs_number(), element);
        }
        if let Some(project) = commit.project {
            state.projects.insert(*project.wbs_number(), project);
        }
        for work_package in commit.work_packages {
            state.work_packages.insert(*work_package.wbs_number(), work_package);
        }
        state.changes.extend(commit.changes);
        state.change_requests.insert(id, reviewed);
        Ok(())
    }
}

#[async_trait]
impl ChangeLogReader for InMemoryProjectStore {
    async fn find_by_change_request(
        &self,
        id: &ChangeRequestId,
    ) -> Result<Vec<Change>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .changes
            .iter()
            .filter(|change| change.change_request_id() == id)
            .cloned()
            .collect())
    }

    async fn find_by_wbs_number(&self, wbs_number: &WbsNumber) -> Result<Vec<Change>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .changes
            .iter()
            .filter(|change| change.wbs_number() == wbs_number)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::change_log::ChangeField;
    use crate::domain::change_request::{
        ChangeRequestDetails, ReasonCode, ScopeDetail, ScopeReason, StageGateDetail,
    };
    use crate::domain::foundation::UserId;
    use chrono::NaiveDate;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> InMemoryProjectStore {
        let store = InMemoryProjectStore::new();
        let project_no = WbsNumber::new(1, 1, 0);
        store
            .insert_project(
                WbsElement::new(project_no, "Battery box"),
                Project::new(project_no, "Pack enclosure", 1_000),
            )
            .await;
        let a = WbsNumber::new(1, 1, 1);
        let b = WbsNumber::new(1, 1, 2);
        store
            .insert_work_package(
                WbsElement::new(a, "Design"),
                WorkPackage::new(a, date(2024, 1, 1), 5),
            )
            .await;
        store
            .insert_work_package(
                WbsElement::new(b, "Build"),
                WorkPackage::new(b, date(2024, 2, 5), 3).depends_on(a),
            )
            .await;
        store
    }

    fn stage_gate(target: WbsNumber) -> ChangeRequest {
        ChangeRequest::new(
            user("sub"),
            target,
            ChangeRequestDetails::StageGate(StageGateDetail::new(0, true).unwrap()),
        )
    }

    #[tokio::test]
    async fn find_target_resolves_work_package_with_project() {
        let store = seeded().await;
        let lookup = store.find_target(&WbsNumber::new(1, 1, 1)).await.unwrap();
        match lookup {
            Lookup::Active(WbsTarget::WorkPackage { project, .. }) => {
                assert_eq!(project.budget(), 1_000)
            }
            other => panic!("unexpected lookup: {:?}", other),
        }
    }

    #[tokio::test]
    async fn find_target_reports_missing_and_deleted() {
        let store = seeded().await;
        assert!(matches!(
            store.find_target(&WbsNumber::new(9, 9, 9)).await.unwrap(),
            Lookup::Missing
        ));

        let mut element = store.element(&WbsNumber::new(1, 1, 2)).await.unwrap();
        element.delete(None);
        let work_package = store.work_package(&WbsNumber::new(1, 1, 2)).await.unwrap();
        store.insert_work_package(element, work_package).await;

        assert!(matches!(
            store.find_target(&WbsNumber::new(1, 1, 2)).await.unwrap(),
            Lookup::Deleted
        ));
    }

    #[tokio::test]
    async fn find_dependents_skips_deleted_elements() {
        let store = seeded().await;
        let a = WbsNumber::new(1, 1, 1);
        assert_eq!(store.find_dependents(&a).await.unwrap().len(), 1);

        let mut element = store.element(&WbsNumber::new(1, 1, 2)).await.unwrap();
        element.delete(None);
        let work_package = store.work_package(&WbsNumber::new(1, 1, 2)).await.unwrap();
        store.insert_work_package(element, work_package).await;

        assert!(store.find_dependents(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn commit_review_applies_everything() {
        let store = seeded().await;
        let a = WbsNumber::new(1, 1, 1);
        let mut cr = stage_gate(a);
        store.save(&cr).await.unwrap();

        cr.record_review(user("rev"), true, "").unwrap();
        let mut element = store.element(&a).await.unwrap();
        element.complete().unwrap();
        let change = Change::field_changed(
            *cr.id(),
            user("rev"),
            a,
            ChangeField::Status,
            "INACTIVE",
            "COMPLETE",
        );
        let commit = ReviewCommit {
            change_request: cr.clone(),
            element: Some(element),
            project: None,
            work_packages: vec![],
            changes: vec![change],
        };

        store.commit_review(commit).await.unwrap();

        assert_eq!(store.change_request(cr.id()).await.unwrap().accepted(), Some(true));
        assert_eq!(store.find_by_change_request(cr.id()).await.unwrap().len(), 1);
        assert_eq!(store.find_by_wbs_number(&a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_commit_is_rejected_as_already_reviewed() {
        let store = seeded().await;
        let mut cr = stage_gate(WbsNumber::new(1, 1, 1));
        store.save(&cr).await.unwrap();
        cr.record_review(user("rev"), false, "").unwrap();

        store
            .commit_review(ReviewCommit::decision_only(cr.clone()))
            .await
            .unwrap();
        let err = store
            .commit_review(ReviewCommit::decision_only(cr.clone()))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AlreadyReviewed);
        assert_eq!(err.detail("id"), Some(cr.id().to_string().as_str()));
    }

    #[tokio::test]
    async fn commit_review_keeps_proposals_stored_after_the_review_loaded() {
        let store = seeded().await;
        let detail = ScopeDetail::new(
            "Thicker walls",
            vec![ScopeReason::new(ReasonCode::Design, "cracking")],
            vec![ProposedSolution::new("Use 3mm sheet", 40, 1, "", user("sub")).unwrap()],
        )
        .unwrap();
        let cr = ChangeRequest::new(
            user("sub"),
            WbsNumber::new(1, 1, 1),
            ChangeRequestDetails::Standard(detail),
        );
        store.save(&cr).await.unwrap();

        let mut reviewed = cr.clone();
        let chosen = *reviewed.scope_detail().unwrap().proposed_solutions[0].id();
        reviewed.approve_solution(&chosen).unwrap();
        reviewed.record_review(user("rev"), true, "").unwrap();

        let late = ProposedSolution::new("Add ribs", 25, 0, "", user("other")).unwrap();
        store.add_proposed_solution(cr.id(), &late).await.unwrap();

        store
            .commit_review(ReviewCommit::decision_only(reviewed))
            .await
            .unwrap();

        let stored = store.change_request(cr.id()).await.unwrap();
        assert_eq!(stored.accepted(), Some(true));
        let solutions = &stored.scope_detail().unwrap().proposed_solutions;
        assert_eq!(solutions.len(), 2);
        assert!(solutions[0].is_approved());
        assert!(!solutions[1].is_approved());
    }

    #[tokio::test]
    async fn failed_commit_writes_nothing() {
        let store = seeded().await;
        let mut cr = stage_gate(WbsNumber::new(1, 1, 1));
        store.save(&cr).await.unwrap();
        cr.record_review(user("rev"), true, "").unwrap();
        store.fail_commits(true);

        let result = store.commit_review(ReviewCommit::decision_only(cr.clone())).await;

        assert!(result.is_err());
        assert_eq!(store.change_request(cr.id()).await.unwrap().accepted(), None);
        assert!(store.changes().await.is_empty());
    }

    #[tokio::test]
    async fn soft_delete_of_deleted_request_is_already_deleted() {
        let store = seeded().await;
        let mut cr = stage_gate(WbsNumber::new(1, 1, 1));
        store.save(&cr).await.unwrap();
        cr.delete(user("sub")).unwrap();

        store.soft_delete(&cr).await.unwrap();
        let err = store.soft_delete(&cr).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AlreadyDeleted);
        assert!(matches!(store.find_by_id(cr.id()).await.unwrap(), Lookup::Deleted));
    }

    #[tokio::test]
    async fn find_teams_returns_associated_teams() {
        let store = InMemoryProjectStore::new();
        let team = Team::new(TeamId::new(), "Electrical", Some("C123".to_string()));
        let project_no = WbsNumber::new(2, 3, 0);
        store.insert_team(team.clone()).await;
        store
            .insert_project(
                WbsElement::new(project_no, "Harness"),
                Project::new(project_no, "Wiring", 50).with_team(team.id),
            )
            .await;

        let teams = store.find_teams(&WbsNumber::new(2, 3, 4)).await.unwrap();
        assert_eq!(teams, vec![team]);
    }
}
