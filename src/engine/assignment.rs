use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::conflict::{check_creation, overlapping_workers, ConflictDecision};
use crate::engine::queue::enqueue_job;
use crate::engine::recommend::recommend;
use crate::error::AppError;
use crate::models::job::JobStatus;
use crate::notify::{office_recipients, NotificationEvent};
use crate::state::AppState;
use crate::store::SchedulingStore;

/// Background worker that assigns queued jobs to their best-scoring
/// worker. Jobs with nobody to assign are re-queued after a short delay.
pub async fn run_assignment_engine(state: Arc<AppState>, mut job_rx: mpsc::Receiver<Uuid>) {
    info!("assignment engine started");

    while let Some(job_id) = job_rx.recv().await {
        state.metrics.jobs_in_queue.dec();

        let start = Instant::now();
        let outcome = match assign_job(&state, job_id).await {
            Ok(()) => "success",
            Err(AppError::NotFound(reason)) => {
                warn!(job_id = %job_id, reason, "no assignable worker; re-queueing job");
                sleep(Duration::from_millis(250)).await;
                if let Err(err) = enqueue_job(&state, job_id).await {
                    error!(error = %err, job_id = %job_id, "failed to re-queue job");
                }
                "requeued"
            }
            Err(err) => {
                error!(error = %err, job_id = %job_id, "failed to assign job");
                "error"
            }
        };

        let elapsed = start.elapsed().as_secs_f64();
        state
            .metrics
            .assignment_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed);
        state
            .metrics
            .assignments_total
            .with_label_values(&[outcome])
            .inc();
    }

    warn!("assignment engine stopped: queue channel closed");
}

async fn assign_job(state: &AppState, job_id: Uuid) -> Result<(), AppError> {
    let job = state
        .store
        .job(job_id)
        .ok_or_else(|| AppError::Internal(format!("queued job {job_id} no longer exists")))?;

    if job.status != JobStatus::Scheduled || !job.assigned_worker_ids.is_empty() {
        info!(job_id = %job_id, "job no longer needs assignment");
        return Ok(());
    }

    let ranked = recommend(&state.store, &state.weights, job_id, usize::MAX)?;

    // Creation ran the conflict check with an empty assignment set, so
    // worker-scope windows have not been applied to these candidates yet.
    let winner = ranked
        .into_iter()
        .find(|result| {
            matches!(
                check_creation(
                    &state.store,
                    job.provider_id,
                    job.start,
                    job.end,
                    &[result.worker_id],
                ),
                ConflictDecision::Allowed
            )
        })
        .ok_or_else(|| {
            AppError::NotFound(format!("all candidates blocked for job {job_id}"))
        })?;

    let updated = state
        .store
        .assign_worker(job_id, winner.worker_id)
        .ok_or_else(|| AppError::Internal(format!("job {job_id} vanished during assignment")))?;

    let _ = state.notifications_tx.send(NotificationEvent::JobAssigned {
        job_id,
        worker_id: winner.worker_id,
    });

    let conflicting = overlapping_workers(&state.store, &updated);
    if !conflicting.is_empty() {
        let recipients = office_recipients(&state.store, updated.provider_id);
        let _ = state
            .notifications_tx
            .send(NotificationEvent::ScheduleConflict {
                job_id,
                conflicting_worker_ids: conflicting,
                recipients,
            });
    }

    info!(
        job_id = %job_id,
        worker_id = %winner.worker_id,
        score = winner.total_score,
        quality = ?winner.match_quality,
        "job assigned"
    );

    Ok(())
}
