use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::engine::conflict::ConflictRejection;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("scheduling conflict: {0}")]
    SchedulingConflict(ConflictRejection),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::SchedulingConflict(rejection) => {
                // Flatten the rejection fields (blocked_type, reason or
                // blocked_workers) next to the error message.
                let mut body = json!({ "error": rejection.to_string() });
                if let (Some(object), serde_json::Value::Object(fields)) = (
                    body.as_object_mut(),
                    serde_json::to_value(&rejection).unwrap_or_default(),
                ) {
                    object.extend(fields);
                }
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg })))
                    .into_response()
            }
        }
    }
}
