use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Hands a job id to the auto-assignment worker.
pub async fn enqueue_job(state: &AppState, job_id: Uuid) -> Result<(), AppError> {
    state
        .job_tx
        .send(job_id)
        .await
        .map_err(|err| AppError::Internal(format!("assignment queue send failed: {err}")))?;

    state.metrics.jobs_in_queue.inc();
    Ok(())
}
