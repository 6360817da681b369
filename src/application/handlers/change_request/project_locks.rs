//! Per-project review serialization.
//!
//! A review holds the locks of every project it writes (its target's and
//! those of all shifted dependents) for the whole read-compute-commit
//! sequence, so two reviews whose effects overlap never interleave their
//! reads of budgets and start dates. Locks are always taken in ascending
//! project order.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::wbs::WbsNumber;

/// Registry of async locks keyed by project number.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<WbsNumber, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, project: WbsNumber) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(project)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Take the locks of all `projects`, in ascending order.
    pub async fn acquire_all(&self, projects: &BTreeSet<WbsNumber>) -> Vec<OwnedMutexGuard<()>> {
        let keys: BTreeSet<WbsNumber> = projects.iter().map(WbsNumber::project_key).collect();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock_for(key).await.lock_owned().await);
        }
        guards
    }
}
