//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", post(create_task_handler).get(list_tasks_handler))
        .route(
            "/tasks/:task_id",
            get(get_task_handler).delete(delete_task_handler),
        )
        .route("/tasks/:task_id/timer/start", post(start_timer_handler))
        .route("/tasks/:task_id/timer/pause", post(pause_timer_handler))
        .route("/tasks/:task_id/timer/reset", post(reset_timer_handler))
        .route("/tasks/:task_id/timer", get(timer_state_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
