//! Queue operations delegated to the engine.

use std::sync::Arc;

use crate::engine::MergeReport;
use crate::error::{Error, Result};
use crate::gateway;
use crate::task::Task;
use crate::types::{DownloadRequest, Status, TaskId};

use super::DownloadClient;

impl DownloadClient {
    /// Enqueue a download for an explicit URL and format
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if the URL
    /// fails local validation, or the gateway error.
    pub async fn create_download(&self, url: &str, format_id: &str, quality: &str) -> Result<Task> {
        self.validate_url(url).await?;
        self.engine
            .create_and_track(DownloadRequest::new(url.trim(), format_id, quality))
            .await
    }

    /// Cancel a task on the worker and locally
    ///
    /// # Errors
    ///
    /// Returns the gateway error unless the worker no longer knows a task
    /// that already finished.
    pub async fn cancel(&self, id: &TaskId) -> Result<()> {
        self.engine.cancel(id).await
    }

    /// Stop tracking a task; returns whether it was tracked
    pub fn remove(&self, id: &TaskId) -> bool {
        self.engine.remove(id)
    }

    /// Remove completed and failed tasks; returns how many were removed
    pub fn clear_completed(&self) -> usize {
        self.engine.clear_completed()
    }

    /// Merge the worker's current task list now, outside the poll timer
    pub async fn refresh(&self) -> MergeReport {
        self.engine.refresh().await
    }

    /// Snapshot of all tracked tasks, in insertion order
    pub fn tasks(&self) -> Arc<[Task]> {
        self.engine.tasks()
    }

    /// Snapshot of one task
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.engine.task(id)
    }

    /// Direct URL of a completed task's file
    ///
    /// `None` until the task completed and the worker reported a filename.
    pub fn download_url(&self, task: &Task) -> Option<String> {
        if task.status != Status::Completed {
            return None;
        }
        task.filename
            .as_deref()
            .map(|filename| gateway::file_url(&self.config.api, filename))
    }

    /// Direct URL of a tracked task's file, looked up by id
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an untracked id and
    /// [`Error::InvalidInput`] while the task has no downloadable file.
    pub fn download_url_for(&self, id: &TaskId) -> Result<String> {
        let task = self
            .engine
            .task(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        self.download_url(&task).ok_or_else(|| {
            Error::InvalidInput(format!("task {} has no downloadable file yet", id))
        })
    }
}
