//! Project entity: the budget-holding parent of work packages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TeamId, ValidationError};

use super::WbsNumber;

/// Project details owned by a project-level WBS element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    wbs_number: WbsNumber,
    summary: String,
    /// Budget in whole dollars.
    budget: i64,
    rules: Vec<String>,
    goals: Vec<String>,
    features: Vec<String>,
    other_constraints: Vec<String>,
    team_ids: Vec<TeamId>,
}

impl Project {
    pub fn new(wbs_number: WbsNumber, summary: impl Into<String>, budget: i64) -> Self {
        Self {
            wbs_number: wbs_number.project_key(),
            summary: summary.into(),
            budget,
            rules: Vec::new(),
            goals: Vec::new(),
            features: Vec::new(),
            other_constraints: Vec::new(),
            team_ids: Vec::new(),
        }
    }

    /// Reconstitute a project from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        wbs_number: WbsNumber,
        summary: String,
        budget: i64,
        rules: Vec<String>,
        goals: Vec<String>,
        features: Vec<String>,
        other_constraints: Vec<String>,
        team_ids: Vec<TeamId>,
    ) -> Self {
        Self {
            wbs_number,
            summary,
            budget,
            rules,
            goals,
            features,
            other_constraints,
            team_ids,
        }
    }

    /// Builder: associate a team with the project.
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        if !self.team_ids.contains(&team_id) {
            self.team_ids.push(team_id);
        }
        self
    }

    pub fn wbs_number(&self) -> &WbsNumber {
        &self.wbs_number
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn other_constraints(&self) -> &[String] {
        &self.other_constraints
    }

    pub fn team_ids(&self) -> &[TeamId] {
        &self.team_ids
    }

    /// Apply a budget impact, returning `(old, new)`.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on `budget` if the sum overflows
    pub fn adjust_budget(&mut self, impact: i64) -> Result<(i64, i64), ValidationError> {
        let old = self.budget;
        let new = old.checked_add(impact).ok_or_else(|| {
            ValidationError::invalid_format(
                "budget",
                format!("budget {} cannot absorb an impact of {}", old, impact),
            )
        })?;
        self.budget = new;
        Ok((old, new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalises_to_project_number() {
        let project = Project::new(WbsNumber::new(1, 3, 7), "Drivetrain", 100);
        assert_eq!(project.wbs_number(), &WbsNumber::new(1, 3, 0));
    }

    #[test]
    fn adjust_budget_returns_old_and_new() {
        let mut project = Project::new(WbsNumber::new(1, 3, 0), "Drivetrain", 100);
        assert_eq!(project.adjust_budget(75).unwrap(), (100, 175));
        assert_eq!(project.budget(), 175);
    }

    #[test]
    fn overflowing_budget_is_rejected() {
        let mut project = Project::new(WbsNumber::new(1, 3, 0), "Drivetrain", 100);
        let err = project.adjust_budget(i64::MAX).unwrap_err();
        assert_eq!(err.field(), "budget");
        assert_eq!(project.budget(), 100);
    }

    #[test]
    fn with_team_ignores_duplicates() {
        let team = TeamId::new();
        let project = Project::new(WbsNumber::new(1, 3, 0), "Drivetrain", 0)
            .with_team(team)
            .with_team(team);
        assert_eq!(project.team_ids(), &[team]);
    }
}
