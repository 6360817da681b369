//! Best-effort notification helpers shared by the change request handlers.

use crate::domain::change_request::ChangeRequest;
use crate::domain::wbs::WbsTarget;
use crate::ports::{NotificationGateway, NotificationTarget, WbsRepository};

/// Announce a new change request to the teams owning its project.
///
/// Falls back to the target's project lead when no team is associated.
/// Failures are logged and never returned.
pub(super) async fn announce_created(
    wbs: &dyn WbsRepository,
    notifier: &dyn NotificationGateway,
    target: &WbsTarget,
    change_request: &ChangeRequest,
    submitter_name: &str,
    budget_impact: Option<i64>,
) {
    let message = format!(
        "{} submitted a {} change request for {} - {}",
        submitter_name,
        change_request.kind(),
        target.wbs_number(),
        target.element().name()
    );

    let teams = wbs.find_teams(target.project().wbs_number()).await;
    let recipients: Vec<NotificationTarget> = match teams {
        Ok(teams) if !teams.is_empty() => {
            teams.into_iter().map(NotificationTarget::Team).collect()
        }
        Ok(_) => target
            .element()
            .project_lead()
            .cloned()
            .map(NotificationTarget::User)
            .into_iter()
            .collect(),
        Err(e) => {
            tracing::warn!(
                cr_id = %change_request.id(),
                error = %e,
                "Failed to load teams for notification"
            );
            return;
        }
    };

    if recipients.is_empty() {
        tracing::debug!(cr_id = %change_request.id(), "No recipients for change request notice");
    }

    for recipient in &recipients {
        if let Err(e) = notifier
            .notify_created(recipient, &message, change_request.id(), budget_impact)
            .await
        {
            tracing::warn!(
                cr_id = %change_request.id(),
                error = %e,
                "Change request notice failed"
            );
        }
    }
}

/// Tell the submitter their change request was reviewed. Failures are logged.
pub(super) async fn announce_reviewed(
    notifier: &dyn NotificationGateway,
    change_request: &ChangeRequest,
) {
    if let Err(e) = notifier
        .notify_reviewed(change_request.submitter(), change_request.id())
        .await
    {
        tracing::warn!(cr_id = %change_request.id(), error = %e, "Review notice failed");
    }
}
