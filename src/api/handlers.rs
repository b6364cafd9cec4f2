//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    error::SessionError,
    state::{AppState, ExerciseTemplate, SetField},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, SessionResponse};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(err: SessionError) -> HandlerError {
    let status = match &err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::IndexOutOfRange { .. } | SessionError::InvalidValue { .. } => {
            StatusCode::BAD_REQUEST
        }
        SessionError::LibraryUnavailable(_) | SessionError::SubmissionFailed(_) => {
            StatusCode::BAD_GATEWAY
        }
        SessionError::PersistenceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Request rejected: {}", err);
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Body of PUT /session/exercises/:id/sets/:index
#[derive(Debug, Deserialize)]
pub struct UpdateSetRequest {
    pub field: SetField,
    pub value: String,
}

/// Body of POST /session/finish
#[derive(Debug, Deserialize)]
pub struct FinishRequest {
    #[serde(default)]
    pub name: String,
}

/// Handle GET /session - Current draft and server metadata
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let draft = state.draft();
    let (last_action, last_action_time) = state.get_last_action();

    Json(SessionResponse {
        elapsed_display: draft.formatted_elapsed(),
        draft,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle POST /session/timer - Flip the global timer
pub async fn toggle_timer_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let draft = state.toggle_timer();
    let message = if draft.is_running {
        "Global timer resumed".to_string()
    } else {
        "Global timer paused".to_string()
    };
    Json(ApiResponse::for_draft(message, draft))
}

/// Handle POST /session/exercises - Add an entry from a library template
pub async fn add_exercise_handler(
    State(state): State<Arc<AppState>>,
    Json(template): Json<ExerciseTemplate>,
) -> Json<ApiResponse> {
    let name = template.name.clone();
    let draft = state.add_exercise(template);
    Json(ApiResponse::for_draft(
        format!("Added exercise '{}'", name),
        draft,
    ))
}

/// Handle DELETE /session/exercises/:id - Remove an entry
pub async fn remove_exercise_handler(
    State(state): State<Arc<AppState>>,
    Path(instance_id): Path<u64>,
) -> Json<ApiResponse> {
    let draft = state.remove_exercise(instance_id);
    Json(ApiResponse::for_draft(
        format!("Removed exercise {}", instance_id),
        draft,
    ))
}

/// Handle POST /session/exercises/:id/sets - Append a default set
pub async fn add_set_handler(
    State(state): State<Arc<AppState>>,
    Path(instance_id): Path<u64>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let draft = state.add_set(instance_id).map_err(reject)?;
    Ok(Json(ApiResponse::for_draft(
        format!("Added set to exercise {}", instance_id),
        draft,
    )))
}

/// Handle PUT /session/exercises/:id/sets/:index - Update one set field
pub async fn update_set_handler(
    State(state): State<Arc<AppState>>,
    Path((instance_id, set_index)): Path<(u64, usize)>,
    Json(request): Json<UpdateSetRequest>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let draft = state
        .update_set_field(instance_id, set_index, request.field, &request.value)
        .map_err(reject)?;
    Ok(Json(ApiResponse::for_draft(
        format!("Updated set {} of exercise {}", set_index, instance_id),
        draft,
    )))
}

/// Handle POST /session/exercises/:id/sets/:index/timer - Toggle a set timer
pub async fn toggle_set_timer_handler(
    State(state): State<Arc<AppState>>,
    Path((instance_id, set_index)): Path<(u64, usize)>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let draft = state
        .toggle_set_timer(instance_id, set_index)
        .map_err(reject)?;
    Ok(Json(ApiResponse::for_draft(
        format!("Toggled timer on set {} of exercise {}", set_index, instance_id),
        draft,
    )))
}

/// Handle DELETE /session - Discard the draft
pub async fn discard_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Discard endpoint called");
    let draft = state.discard();
    Json(ApiResponse::for_draft(
        "Session discarded".to_string(),
        draft,
    ))
}

/// Handle POST /session/finish - Submit the workout, then clear the draft
///
/// The draft is discarded only after the remote save is confirmed; a
/// failed submission leaves it intact for a manual retry.
pub async fn finish_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FinishRequest>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let payload = state.build_submission(&request.name);
    let saved_name = payload.name.clone();

    if let Err(e) = state.remote.submit_workout(&payload).await {
        error!("Workout submission failed, draft preserved: {}", e);
        return Err(reject(e));
    }

    let draft = state.discard();
    info!("Workout '{}' saved, draft cleared", saved_name);
    Ok(Json(ApiResponse::for_draft(
        format!("Workout '{}' saved", saved_name),
        draft,
    )))
}

/// Handle GET /library - List the user's exercise library
pub async fn library_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<crate::services::LibraryExercise>>, HandlerError> {
    let exercises = state
        .remote
        .list_exercises(&state.user_id)
        .await
        .map_err(reject)?;
    Ok(Json(exercises))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
