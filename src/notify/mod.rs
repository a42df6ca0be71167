use serde::Serialize;
use uuid::Uuid;

use crate::store::SchedulingStore;

/// Fire-and-forget events published on the state's broadcast channel.
/// Delivery is best-effort; a lagging or closed subscriber is not an
/// error and nothing is retried.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    JobAssigned {
        job_id: Uuid,
        worker_id: Uuid,
    },
    ScheduleConflict {
        job_id: Uuid,
        conflicting_worker_ids: Vec<Uuid>,
        /// The provider's office staff, who triage double-bookings.
        recipients: Vec<Uuid>,
    },
}

/// Office-role workers of a provider, the audience for conflict warnings.
pub fn office_recipients(store: &dyn SchedulingStore, provider_id: Uuid) -> Vec<Uuid> {
    store
        .active_workers(provider_id)
        .into_iter()
        .filter(|worker| worker.role.is_office())
        .map(|worker| worker.id)
        .collect()
}
