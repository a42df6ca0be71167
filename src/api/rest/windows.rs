use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::window::{BlockScope, BlockedWindow, HourRange};
use crate::state::AppState;
use crate::store::SchedulingStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/blocked-windows", post(create_window).get(list_windows))
}

#[derive(Deserialize)]
pub struct CreateWindowRequest {
    pub provider_id: Uuid,
    pub scope: BlockScope,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// 0 = Sunday through 6 = Saturday; presence makes the window weekly.
    pub recurring_days_of_week: Option<Vec<u8>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub blocked_worker_ids: Vec<Uuid>,
    pub reason: Option<String>,
}

async fn create_window(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWindowRequest>,
) -> Result<Json<BlockedWindow>, AppError> {
    if payload.from_date > payload.to_date {
        return Err(AppError::BadRequest(
            "from_date must not be after to_date".to_string(),
        ));
    }

    if payload.scope == BlockScope::Workers && payload.blocked_worker_ids.is_empty() {
        return Err(AppError::BadRequest(
            "worker-scoped window needs blocked_worker_ids".to_string(),
        ));
    }

    if let Some(days) = &payload.recurring_days_of_week {
        if days.is_empty() {
            return Err(AppError::BadRequest(
                "recurring_days_of_week cannot be empty".to_string(),
            ));
        }
        if days.iter().any(|day| *day > 6) {
            return Err(AppError::BadRequest(
                "recurring_days_of_week values must be 0-6".to_string(),
            ));
        }
    }

    // Intraday bounds are validated here, once; a malformed time string
    // never reaches the store as a silently always-pass window.
    let hours = match (payload.start_time, payload.end_time) {
        (Some(start), Some(end)) => {
            Some(HourRange::parse(&start, &end).map_err(AppError::BadRequest)?)
        }
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "start_time and end_time must be provided together".to_string(),
            ))
        }
    };

    let window = BlockedWindow {
        id: Uuid::new_v4(),
        provider_id: payload.provider_id,
        scope: payload.scope,
        from_date: payload.from_date,
        to_date: payload.to_date,
        recurring_days: payload.recurring_days_of_week,
        hours,
        blocked_worker_ids: payload.blocked_worker_ids,
        reason: payload.reason,
    };

    state.store.insert_window(window.clone());
    Ok(Json(window))
}

async fn list_windows(State(state): State<Arc<AppState>>) -> Json<Vec<BlockedWindow>> {
    Json(state.store.list_windows())
}
