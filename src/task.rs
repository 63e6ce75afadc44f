//! Task model: the download entity and its state machine
//!
//! All operations here are pure transitions that return a new [`Task`]. The
//! engine decides when to apply them; nothing in this module performs I/O.
//!
//! ```text
//! pending ──► downloading ──► completed
//!    │             │      └─► failed
//!    └─────────────┴────────► cancelled   (explicit user action)
//! ```
//!
//! No transition leaves a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DownloadRequest, RemoteTask, Status, TaskId};

/// One tracked download request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the worker
    pub id: TaskId,
    /// Video URL
    pub url: String,
    /// Requested format
    pub format_id: String,
    /// Requested quality label
    pub quality: String,
    /// Current status
    pub status: Status,
    /// Progress percentage in `[0, 100]`
    pub progress: f32,
    /// Video title
    pub title: Option<String>,
    /// Output filename on the worker
    pub filename: Option<String>,
    /// Output size in bytes
    pub file_size: Option<u64>,
    /// Human-readable speed reported by the worker
    pub download_speed: Option<String>,
    /// Estimated remaining time in seconds
    pub estimated_time: Option<u64>,
    /// Failure message
    pub error: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Completion time
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure time
    pub failed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a freshly created task for an id returned by the worker
    pub fn create(id: TaskId, request: &DownloadRequest) -> Self {
        Self {
            id,
            url: request.url.clone(),
            format_id: request.format_id.clone(),
            quality: request.quality.clone(),
            status: Status::Pending,
            progress: 0.0,
            title: request.title.clone(),
            filename: None,
            file_size: None,
            download_speed: None,
            estimated_time: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            failed_at: None,
        }
    }

    /// Build a local task from a server entry the client has never seen
    ///
    /// Only active entries are adopted. Terminal entries carry nothing the
    /// user can act on, and entries without a status cannot be placed in the
    /// state machine, so both yield `None`.
    pub fn adopt(remote: &RemoteTask) -> Option<Self> {
        let status = remote.status.filter(Status::is_active)?;

        let mut task = Self {
            id: remote.id.clone(),
            url: remote.url.clone().unwrap_or_default(),
            format_id: remote.format_id.clone().unwrap_or_default(),
            quality: remote.quality.clone().unwrap_or_default(),
            status,
            progress: 0.0,
            title: None,
            filename: None,
            file_size: None,
            download_speed: None,
            estimated_time: None,
            error: None,
            created_at: remote.created_at.unwrap_or_else(Utc::now),
            completed_at: None,
            failed_at: None,
        };
        task.apply_fields(remote);
        Some(task)
    }

    /// Whether the task is still being worked on
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether the task reached a final state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Merge one server report into this task
    ///
    /// A terminal task is returned unchanged: the client already rendered
    /// that outcome and a stale or recycled server entry must not revive it.
    /// An active task takes every field the server reported (field rule) and
    /// the reported status, if any (status rule).
    pub fn apply_server_snapshot(&self, remote: &RemoteTask) -> Self {
        if self.is_terminal() {
            return self.clone();
        }

        let mut merged = self.clone();
        merged.apply_fields(remote);
        if let Some(status) = remote.status {
            merged.transition(status);
        }
        merged
    }

    /// Cancel the task on the user's behalf
    ///
    /// Terminal tasks are returned unchanged.
    pub fn cancel(&self) -> Self {
        let mut cancelled = self.clone();
        if self.is_active() {
            cancelled.status = Status::Cancelled;
        }
        cancelled
    }

    /// Field rule: descriptive fields reported by the server win, absent
    /// fields keep the local value. Creation inputs and timestamps that are
    /// already set are never overwritten.
    fn apply_fields(&mut self, remote: &RemoteTask) {
        if let Some(progress) = remote.progress.filter(|p| p.is_finite()) {
            self.progress = progress.clamp(0.0, 100.0);
        }
        overwrite(&mut self.title, &remote.title);
        overwrite(&mut self.filename, &remote.filename);
        overwrite(&mut self.file_size, &remote.file_size);
        overwrite(&mut self.download_speed, &remote.download_speed);
        overwrite(&mut self.estimated_time, &remote.estimated_time);
        overwrite(&mut self.error, &remote.error);

        fill_once(&mut self.completed_at, remote.completed_at);
        fill_once(&mut self.failed_at, remote.failed_at);
    }

    /// Status rule: move to the reported status, stamping the outcome time
    /// if the server did not send one. Callers guarantee `self` is active.
    fn transition(&mut self, status: Status) {
        self.status = status;
        match status {
            Status::Completed => fill_once(&mut self.completed_at, Some(Utc::now())),
            Status::Failed => fill_once(&mut self.failed_at, Some(Utc::now())),
            _ => {}
        }
    }
}

fn overwrite<T: Clone>(local: &mut Option<T>, remote: &Option<T>) {
    if let Some(value) = remote {
        *local = Some(value.clone());
    }
}

fn fill_once<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}
