use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::worker::{Capabilities, Skill, SkillLevel, Worker, WorkerRole, WorkerStatus};
use crate::state::AppState;
use crate::store::SchedulingStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/workers", post(create_worker).get(list_workers))
        .route("/workers/:id/status", patch(update_worker_status))
}

#[derive(Deserialize)]
pub struct SkillPayload {
    pub name: String,
    pub category: Option<String>,
    pub level: SkillLevel,
}

#[derive(Deserialize)]
pub struct CreateWorkerRequest {
    pub provider_id: Uuid,
    pub name: String,
    pub role: WorkerRole,
    /// Structured skills with proficiency levels.
    pub skills: Option<Vec<SkillPayload>>,
    /// Flat skill-name list from providers onboarded before levels existed.
    pub legacy_skills: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdateWorkerStatusRequest {
    pub status: WorkerStatus,
}

async fn create_worker(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<Json<Worker>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if payload.skills.is_some() && payload.legacy_skills.is_some() {
        return Err(AppError::BadRequest(
            "provide either skills or legacy_skills, not both".to_string(),
        ));
    }

    // The two skill representations collapse into one canonical value
    // here; the scoring loop never branches on the wire format again.
    let capabilities = match (payload.skills, payload.legacy_skills) {
        (Some(skills), _) => Capabilities::Leveled(
            skills
                .into_iter()
                .map(|skill| Skill {
                    name: skill.name,
                    category: skill.category,
                    level: skill.level,
                })
                .collect(),
        ),
        (None, Some(names)) => Capabilities::Legacy(names),
        (None, None) => Capabilities::Legacy(vec![]),
    };

    let worker = Worker {
        id: Uuid::new_v4(),
        provider_id: payload.provider_id,
        name: payload.name,
        role: payload.role,
        status: WorkerStatus::Active,
        capabilities,
        created_at: Utc::now(),
    };

    state.store.insert_worker(worker.clone());
    Ok(Json(worker))
}

async fn list_workers(State(state): State<Arc<AppState>>) -> Json<Vec<Worker>> {
    Json(state.store.list_workers())
}

async fn update_worker_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkerStatusRequest>,
) -> Result<Json<Worker>, AppError> {
    let worker = state
        .store
        .update_worker_status(id, payload.status)
        .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))?;
    Ok(Json(worker))
}
