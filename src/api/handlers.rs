//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    state::{AppState, TimerMode},
    store::{NewTask, StoreError, TaskRecord},
};
use super::responses::{HealthResponse, StatusResponse, TimerActionResponse, TimerView};

/// Request body for POST /tasks/:task_id/timer/start
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerRequest {
    pub mode: TimerMode,
    /// Countdown length in minutes; ignored by the other modes
    #[serde(default)]
    pub duration_minutes: u64,
}

fn store_error_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
    }
}

/// Handle POST /tasks - Create a task document
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Json(new_task): Json<NewTask>,
) -> Result<Json<TaskRecord>, StatusCode> {
    match state.store.create(new_task).await {
        Ok(record) => {
            info!("Created task {}", record.id);
            Ok(Json(record))
        }
        Err(e) => {
            error!("Failed to create task: {}", e);
            Err(store_error_status(&e))
        }
    }
}

/// Handle GET /tasks - List task documents, newest first
pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskRecord>>, StatusCode> {
    match state.store.list().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /tasks/:task_id - Fetch one task document
pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskRecord>, StatusCode> {
    match state.store.get(&task_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to fetch task {}: {}", task_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /tasks/:task_id - Delete a task document
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    match state.store.delete(&task_id).await {
        Ok(()) => {
            info!("Deleted task {}", task_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!("Failed to delete task {}: {}", task_id, e);
            Err(store_error_status(&e))
        }
    }
}

/// Handle POST /tasks/:task_id/timer/start - Start or resume a timer
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(request): Json<StartTimerRequest>,
) -> Result<Json<TimerActionResponse>, StatusCode> {
    let task = match state.store.get(&task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to fetch task {}: {}", task_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if let Err(e) = state.start_timer(&task, request.mode, request.duration_minutes) {
        error!("Failed to start timer for task {}: {}", task_id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    timer_action_response(&state, &task_id, "Timer started".to_string())
}

/// Handle POST /tasks/:task_id/timer/pause - Pause a running timer
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerActionResponse>, StatusCode> {
    if let Err(e) = state.pause_timer(&task_id, false) {
        error!("Failed to pause timer for task {}: {}", task_id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    timer_action_response(&state, &task_id, "Timer paused".to_string())
}

/// Handle POST /tasks/:task_id/timer/reset - Reset a timer
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerActionResponse>, StatusCode> {
    if let Err(e) = state.reset_timer(&task_id) {
        error!("Failed to reset timer for task {}: {}", task_id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    timer_action_response(&state, &task_id, "Timer reset".to_string())
}

/// Handle GET /tasks/:task_id/timer - Read live timer state
pub async fn timer_state_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerView>, StatusCode> {
    match state.get_timer_state(&task_id) {
        Ok(Some(timer)) => Ok(Json(TimerView::from_state(&timer))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to read timer state for task {}: {}", task_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current engine status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let focused_task = match state.focused_task() {
        Ok(focused) => focused,
        Err(e) => {
            error!("Failed to read focus: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let running_timers = match state.running_task_ids() {
        Ok(ids) => ids.len(),
        Err(e) => {
            error!("Failed to read timer registry: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        focused_task,
        document_title: state.title.current(),
        running_timers,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn timer_action_response(
    state: &Arc<AppState>,
    task_id: &str,
    message: String,
) -> Result<Json<TimerActionResponse>, StatusCode> {
    match state.get_timer_state(task_id) {
        Ok(timer) => {
            let view = timer.as_ref().map(TimerView::from_state);
            Ok(Json(TimerActionResponse::new(message, view)))
        }
        Err(e) => {
            error!("Failed to read timer state for task {}: {}", task_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
