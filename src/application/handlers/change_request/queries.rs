//! Read-side queries: a single change request and the audit trail.

use std::sync::Arc;

use crate::domain::change_log::Change;
use crate::domain::change_request::{ChangeRequest, ChangeRequestError};
use crate::domain::foundation::ChangeRequestId;
use crate::domain::wbs::WbsNumber;
use crate::ports::{ChangeLogReader, ChangeRequestRepository};

use super::guards::load_change_request;

/// Query for one change request.
#[derive(Debug, Clone)]
pub struct GetChangeRequestQuery {
    pub change_request_id: ChangeRequestId,
}

/// Handler for loading a change request. Deleted requests are reported as gone.
pub struct GetChangeRequestHandler {
    change_requests: Arc<dyn ChangeRequestRepository>,
}

impl GetChangeRequestHandler {
    pub fn new(change_requests: Arc<dyn ChangeRequestRepository>) -> Self {
        Self { change_requests }
    }

    pub async fn handle(
        &self,
        query: GetChangeRequestQuery,
    ) -> Result<ChangeRequest, ChangeRequestError> {
        load_change_request(self.change_requests.as_ref(), &query.change_request_id).await
    }
}

/// Which slice of the change log to read.
#[derive(Debug, Clone)]
pub enum ChangeHistoryQuery {
    ByChangeRequest(ChangeRequestId),
    ByWbsNumber(WbsNumber),
}

/// Handler for reading the change log.
pub struct ChangeHistoryHandler {
    change_log: Arc<dyn ChangeLogReader>,
}

impl ChangeHistoryHandler {
    pub fn new(change_log: Arc<dyn ChangeLogReader>) -> Self {
        Self { change_log }
    }

    pub async fn handle(
        &self,
        query: ChangeHistoryQuery,
    ) -> Result<Vec<Change>, ChangeRequestError> {
        let changes = match &query {
            ChangeHistoryQuery::ByChangeRequest(id) => {
                self.change_log.find_by_change_request(id).await?
            }
            ChangeHistoryQuery::ByWbsNumber(wbs) => self.change_log.find_by_wbs_number(wbs).await?,
        };
        Ok(changes)
    }
}
