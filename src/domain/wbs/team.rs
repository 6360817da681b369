//! Team reference used to route change request notifications.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TeamId;

/// A team associated with one or more projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Chat channel that receives change request notifications.
    pub channel_id: Option<String>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, channel_id: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            channel_id,
        }
    }
}
