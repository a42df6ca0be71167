use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::conflict::{
    check_creation, overlapping_workers, ConflictDecision, ConflictRejection,
};
use crate::engine::queue::enqueue_job;
use crate::engine::recommend::{recommend, DEFAULT_LIMIT};
use crate::error::AppError;
use crate::models::address::Address;
use crate::models::job::{Job, JobStatus};
use crate::models::score::ScoreResult;
use crate::notify::{office_recipients, NotificationEvent};
use crate::state::AppState;
use crate::store::SchedulingStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id/status", patch(update_job_status))
        .route("/jobs/:id/recommendations", get(recommendations))
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub provider_id: Uuid,
    pub service_type: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub address: String,
    pub estimated_value: f64,
    #[serde(default)]
    pub assigned_worker_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct CreateJobResponse {
    pub job: Job,
    pub has_conflicts: bool,
    pub conflicting_worker_ids: Vec<Uuid>,
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, AppError> {
    if payload.service_type.trim().is_empty() {
        return Err(AppError::BadRequest("service_type cannot be empty".to_string()));
    }
    if payload.start >= payload.end {
        return Err(AppError::BadRequest("start must be before end".to_string()));
    }

    let decision = check_creation(
        &state.store,
        payload.provider_id,
        payload.start,
        payload.end,
        &payload.assigned_worker_ids,
    );
    if let ConflictDecision::Rejected(rejection) = decision {
        let outcome = match &rejection {
            ConflictRejection::Company { .. } => "rejected_company",
            ConflictRejection::Workers { .. } => "rejected_workers",
        };
        state
            .metrics
            .conflict_decisions_total
            .with_label_values(&[outcome])
            .inc();
        return Err(AppError::SchedulingConflict(rejection));
    }

    let job = Job {
        id: Uuid::new_v4(),
        provider_id: payload.provider_id,
        service_type: payload.service_type,
        start: payload.start,
        end: payload.end,
        address: Address::parse(&payload.address),
        estimated_value: payload.estimated_value,
        assigned_worker_ids: payload.assigned_worker_ids,
        status: JobStatus::Scheduled,
        created_at: Utc::now(),
    };
    state.store.insert_job(job.clone());

    for worker_id in &job.assigned_worker_ids {
        let _ = state.notifications_tx.send(NotificationEvent::JobAssigned {
            job_id: job.id,
            worker_id: *worker_id,
        });
    }

    // Overlaps with other workers' jobs do not roll the creation back;
    // they surface as an advisory warning to the office.
    let conflicting_worker_ids = overlapping_workers(&state.store, &job);
    let has_conflicts = !conflicting_worker_ids.is_empty();
    if has_conflicts {
        state
            .metrics
            .conflict_decisions_total
            .with_label_values(&["warning"])
            .inc();
        let recipients = office_recipients(&state.store, job.provider_id);
        let _ = state
            .notifications_tx
            .send(NotificationEvent::ScheduleConflict {
                job_id: job.id,
                conflicting_worker_ids: conflicting_worker_ids.clone(),
                recipients,
            });
    } else {
        state
            .metrics
            .conflict_decisions_total
            .with_label_values(&["allowed"])
            .inc();
    }

    if job.assigned_worker_ids.is_empty() {
        enqueue_job(&state, job.id).await?;
    }

    Ok(Json(CreateJobResponse {
        job,
        has_conflicts,
        conflicting_worker_ids,
    }))
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .job(id)
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;
    Ok(Json(job))
}

#[derive(Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: JobStatus,
}

async fn update_job_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusRequest>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .update_job_status(id, payload.status)
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;
    Ok(Json(job))
}

#[derive(Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<usize>,
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<Vec<ScoreResult>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let start = Instant::now();
    let result = recommend(&state.store, &state.weights, id, limit);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .recommendation_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());

    result.map(Json)
}
