//! Authorization and target resolution shared by the change request handlers.

use crate::domain::change_request::{ChangeRequest, ChangeRequestError, Resource};
use crate::domain::foundation::{ChangeRequestId, CommandMetadata};
use crate::domain::wbs::{WbsNumber, WbsTarget};
use crate::ports::{ChangeRequestRepository, WbsRepository};

/// Members and above may submit change requests and proposals.
pub(super) fn authorize_submit(metadata: &CommandMetadata) -> Result<(), ChangeRequestError> {
    if metadata.role().can_submit() {
        Ok(())
    } else {
        Err(ChangeRequestError::forbidden(format!(
            "{} may not submit change requests",
            metadata.role()
        )))
    }
}

/// Leadership and above may review change requests.
pub(super) fn authorize_review(metadata: &CommandMetadata) -> Result<(), ChangeRequestError> {
    if metadata.role().can_review() {
        Ok(())
    } else {
        Err(ChangeRequestError::forbidden(format!(
            "{} may not review change requests",
            metadata.role()
        )))
    }
}

/// Resolve a WBS number to an undeleted target.
pub(super) async fn resolve_target(
    wbs: &dyn WbsRepository,
    wbs_number: &WbsNumber,
) -> Result<WbsTarget, ChangeRequestError> {
    wbs.find_target(wbs_number).await?.require(
        || ChangeRequestError::not_found(Resource::WbsElement, wbs_number),
        || ChangeRequestError::deleted(Resource::WbsElement, wbs_number),
    )
}

/// Load an undeleted change request.
pub(super) async fn load_change_request(
    change_requests: &dyn ChangeRequestRepository,
    id: &ChangeRequestId,
) -> Result<ChangeRequest, ChangeRequestError> {
    change_requests.find_by_id(id).await?.require(
        || ChangeRequestError::not_found(Resource::ChangeRequest, id),
        || ChangeRequestError::deleted(Resource::ChangeRequest, id),
    )
}
