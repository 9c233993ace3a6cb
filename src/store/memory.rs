//! In-process task document store
//!
//! Plays the role of the remote per-user document store: task documents
//! keyed by id, partial updates with a store-generated `updatedAt`
//! timestamp, and a deniable-write switch so the asynchronous failure
//! path of the persistence bridge can be exercised.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{task_path, NewTask, StoreError, TaskPatch, TaskRecord, TaskStatus};

/// In-memory task document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, TaskRecord>>,
    deny_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle write denial (simulates a permission-denied / offline store)
    pub fn set_deny_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::SeqCst);
    }

    fn writes_denied(&self) -> bool {
        self.deny_writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, TaskRecord>>, StoreError> {
        // Lock poisoning means a writer panicked mid-mutation; surface it
        // as a denied write on the affected path.
        self.documents.lock().map_err(|_| StoreError::PermissionDenied {
            path: "tasks".to_string(),
        })
    }

    /// Create a task document with server-stamped metadata
    pub async fn create(&self, new: NewTask) -> Result<TaskRecord, StoreError> {
        if self.writes_denied() {
            return Err(StoreError::PermissionDenied {
                path: "tasks".to_string(),
            });
        }

        let record = TaskRecord {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            priority: new.priority,
            period: new.period,
            tags: new.tags,
            status: TaskStatus::Pending,
            time_spent: 0,
            pomodoro_settings: new.pomodoro_settings,
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut documents = self.lock()?;
        documents.insert(record.id.clone(), record.clone());
        debug!("Created task document {}", task_path(&record.id));
        Ok(record)
    }

    /// Fetch a task document by id
    pub async fn get(&self, task_id: &str) -> Result<Option<TaskRecord>, StoreError> {
        let documents = self.lock()?;
        Ok(documents.get(task_id).cloned())
    }

    /// List all task documents, newest first
    pub async fn list(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let documents = self.lock()?;
        let mut records: Vec<TaskRecord> = documents.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Apply a partial update to a task document, stamping `updatedAt`
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> Result<TaskRecord, StoreError> {
        if self.writes_denied() {
            return Err(StoreError::PermissionDenied {
                path: task_path(task_id),
            });
        }

        let mut documents = self.lock()?;
        let record = documents.get_mut(task_id).ok_or_else(|| StoreError::NotFound {
            path: task_path(task_id),
        })?;

        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(time_spent) = patch.time_spent {
            record.time_spent = time_spent;
        }
        record.updated_at = Some(Utc::now());

        debug!("Updated task document {}", task_path(task_id));
        Ok(record.clone())
    }

    /// Delete a task document
    pub async fn delete(&self, task_id: &str) -> Result<(), StoreError> {
        if self.writes_denied() {
            return Err(StoreError::PermissionDenied {
                path: task_path(task_id),
            });
        }

        let mut documents = self.lock()?;
        documents.remove(task_id).ok_or_else(|| StoreError::NotFound {
            path: task_path(task_id),
        })?;
        debug!("Deleted task document {}", task_path(task_id));
        Ok(())
    }
}
