//! User-initiated mutations of the tracked collection

use crate::error::Result;
use crate::task::Task;
use crate::types::{DownloadRequest, Event, Status, TaskId};

use super::TaskEngine;

impl TaskEngine {
    /// Ask the worker to start a download and track the resulting task
    ///
    /// The task is tracked as `pending` at 0 %. If a refresh already adopted
    /// the same id while the request was in flight, that entry is kept (it
    /// carries newer server state) and only the creation inputs it lacks
    /// are filled from the request.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the collection is not modified.
    pub async fn create_and_track(&self, request: DownloadRequest) -> Result<Task> {
        let created = self
            .gateway
            .create_task(&request.url, &request.format_id, &request.quality)
            .await?;

        let fresh = Task::create(created.id, &request);
        let id = fresh.id.clone();
        let mut tracked = fresh.clone();

        self.mutate(|tasks| match tasks.iter_mut().find(|t| t.id == fresh.id) {
            Some(existing) => {
                let filled = fill_creation_inputs(existing, &request);
                tracked = existing.clone();
                filled
            }
            None => {
                tasks.push(fresh);
                true
            }
        });

        tracing::info!(
            task_id = %id,
            url = %request.url,
            format_id = %request.format_id,
            "Download task created"
        );
        self.emit_event(Event::TaskCreated { id });

        Ok(tracked)
    }

    /// Cancel a task on the worker, then locally
    ///
    /// A "not found" answer is tolerated only when the local task already
    /// reached a terminal state: the worker forgot a task that finished.
    /// For any other failure the collection is left unchanged and the error
    /// is returned. An id that is not tracked locally is still forwarded.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unless it is a tolerated "not found".
    pub async fn cancel(&self, id: &TaskId) -> Result<()> {
        if let Err(e) = self.gateway.cancel_task(id).await {
            let terminal = self.task(id).is_some_and(|t| t.is_terminal());
            if !(e.is_not_found() && terminal) {
                tracing::warn!(task_id = %id, error = %e, "Failed to cancel task");
                return Err(e.into());
            }
            tracing::debug!(task_id = %id, "Worker no longer knows finished task, ignoring");
        }

        let cancelled = self.mutate(|tasks| {
            let Some(task) = tasks.iter_mut().find(|t| &t.id == id) else {
                return false;
            };
            let next = task.cancel();
            let changed = next.status != task.status;
            *task = next;
            changed
        });

        if cancelled {
            tracing::info!(task_id = %id, "Download task cancelled");
            self.emit_event(Event::TaskCancelled { id: id.clone() });
        }

        Ok(())
    }

    /// Stop tracking a task, whatever its status
    ///
    /// Purely local: the worker is not contacted. Returns whether a task was
    /// removed.
    pub fn remove(&self, id: &TaskId) -> bool {
        let removed = self.mutate(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| &t.id != id);
            tasks.len() != before
        });

        if removed {
            tracing::info!(task_id = %id, "Download task removed");
            self.emit_event(Event::TaskRemoved { id: id.clone() });
        }
        removed
    }

    /// Remove every completed or failed task
    ///
    /// Cancelled tasks stay listed until removed individually. Returns the
    /// number of tasks removed.
    pub fn clear_completed(&self) -> usize {
        let mut count = 0;
        self.mutate(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| !matches!(t.status, Status::Completed | Status::Failed));
            count = before - tasks.len();
            count > 0
        });

        if count > 0 {
            tracing::info!(count, "Cleared finished download tasks");
            self.emit_event(Event::CompletedCleared { count });
        }
        count
    }
}

// Returns whether any input was missing
fn fill_creation_inputs(task: &mut Task, request: &DownloadRequest) -> bool {
    let mut filled = false;
    if task.url.is_empty() {
        task.url = request.url.clone();
        filled = true;
    }
    if task.format_id.is_empty() {
        task.format_id = request.format_id.clone();
        filled = true;
    }
    if task.quality.is_empty() {
        task.quality = request.quality.clone();
        filled = true;
    }
    if task.title.is_none() && request.title.is_some() {
        task.title = request.title.clone();
        filled = true;
    }
    filled
}
