//! Change log reader port (read side of the audit trail).

use async_trait::async_trait;

use crate::domain::change_log::Change;
use crate::domain::foundation::{ChangeRequestId, DomainError};
use crate::domain::wbs::WbsNumber;

/// Read-only access to the append-only change log.
///
/// Both queries return records in the order they were written.
#[async_trait]
pub trait ChangeLogReader: Send + Sync {
    /// All changes implemented by one change request.
    async fn find_by_change_request(
        &self,
        id: &ChangeRequestId,
    ) -> Result<Vec<Change>, DomainError>;

    /// All changes recorded against one WBS element.
    async fn find_by_wbs_number(&self, wbs_number: &WbsNumber) -> Result<Vec<Change>, DomainError>;
}
