//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session", get(session_handler).delete(discard_handler))
        .route("/session/timer", post(toggle_timer_handler))
        .route("/session/exercises", post(add_exercise_handler))
        .route(
            "/session/exercises/:instance_id",
            axum::routing::delete(remove_exercise_handler),
        )
        .route(
            "/session/exercises/:instance_id/sets",
            post(add_set_handler),
        )
        .route(
            "/session/exercises/:instance_id/sets/:set_index",
            put(update_set_handler),
        )
        .route(
            "/session/exercises/:instance_id/sets/:set_index/timer",
            post(toggle_set_timer_handler),
        )
        .route("/session/finish", post(finish_handler))
        .route("/library", get(library_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
