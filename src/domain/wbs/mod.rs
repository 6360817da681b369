//! Work breakdown structure domain module.
//!
//! Projects contain work packages; both are anchored by a `WbsElement`
//! addressed by its `WbsNumber`. `WbsTarget` is what a change request
//! resolves its target to.

mod element;
mod project;
mod status;
mod team;
mod wbs_number;
mod work_package;

pub use element::WbsElement;
pub use project::Project;
pub use status::WbsStatus;
pub use team::Team;
pub use wbs_number::WbsNumber;
pub use work_package::{ChecklistItem, ChecklistKind, WorkPackage, DAYS_PER_WEEK};

/// A resolved change request target with the entities it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WbsTarget {
    /// A bare project.
    Project {
        element: WbsElement,
        project: Project,
    },
    /// A work package together with its enclosing project.
    WorkPackage {
        element: WbsElement,
        work_package: WorkPackage,
        project: Project,
    },
}

impl WbsTarget {
    pub fn element(&self) -> &WbsElement {
        match self {
            WbsTarget::Project { element, .. } | WbsTarget::WorkPackage { element, .. } => element,
        }
    }

    pub fn project(&self) -> &Project {
        match self {
            WbsTarget::Project { project, .. } | WbsTarget::WorkPackage { project, .. } => project,
        }
    }

    pub fn work_package(&self) -> Option<&WorkPackage> {
        match self {
            WbsTarget::Project { .. } => None,
            WbsTarget::WorkPackage { work_package, .. } => Some(work_package),
        }
    }

    pub fn wbs_number(&self) -> &WbsNumber {
        self.element().wbs_number()
    }
}
