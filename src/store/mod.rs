//! Task document store module
//!
//! This module contains the task document types, the partial-update
//! contract, and the structured error events published when a
//! fire-and-forget write fails.

pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::PomodoroSettings;

// Re-export main types
pub use memory::MemoryStore;

/// Task or habit classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
    Habit,
}

/// Task priority level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Time-of-day bucket a task is grouped under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPeriod {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Anytime,
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

/// A task document as persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub priority: TaskPriority,
    pub period: TaskPeriod,
    pub tags: Vec<String>,
    pub status: TaskStatus,
    /// Accumulated elapsed work time in seconds
    pub time_spent: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pomodoro_settings: Option<PomodoroSettings>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields a client supplies when creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub period: TaskPeriod,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pomodoro_settings: Option<PomodoroSettings>,
}

/// Partial update applied to a task document
///
/// Only the fields present serialize, so an error event's payload shows
/// exactly the subset that was attempted. `updatedAt` is stamped by the
/// store on every successful update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
}

impl TaskPatch {
    /// Patch that only moves the task status
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Store operation kind, carried in error events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOperation {
    Create,
    Update,
    Delete,
    List,
}

/// Errors produced by store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("document {path} not found")]
    NotFound { path: String },
    #[error("permission denied writing {path}")]
    PermissionDenied { path: String },
}

impl StoreError {
    /// Document path the failed operation targeted
    pub fn path(&self) -> &str {
        match self {
            StoreError::NotFound { path } => path,
            StoreError::PermissionDenied { path } => path,
        }
    }
}

/// Structured event published when an asynchronous store write fails
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreErrorEvent {
    /// Document path the write targeted, e.g. `tasks/<id>`
    pub path: String,
    pub operation: StoreOperation,
    /// The payload the write attempted to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<serde_json::Value>,
}

/// Document path for a task id
pub fn task_path(task_id: &str) -> String {
    format!("tasks/{}", task_id)
}
