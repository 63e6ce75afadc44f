//! Merging server snapshots into the tracked collection

use std::collections::{HashMap, HashSet};

use crate::task::Task;
use crate::types::{Event, RemoteTask, Status, TaskId};

use super::TaskEngine;

/// Outcome of merging one snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeReport {
    /// Entries in the snapshot
    pub remote: usize,
    /// Local tasks changed by the merge
    pub updated: usize,
    /// Remote-only tasks adopted by the merge
    pub adopted: usize,
    /// Events describing each change, in collection order
    pub events: Vec<Event>,
}

impl MergeReport {
    /// Whether the merge changed the collection
    pub fn changed(&self) -> usize {
        self.updated + self.adopted
    }
}

/// Merge one snapshot into `tasks` in place
///
/// Local tasks reported by the server take the server's view through
/// [`Task::apply_server_snapshot`]; local tasks the server no longer reports
/// are left alone. Remote-only entries are appended only while active. When
/// the snapshot repeats an id, its last entry is used.
pub(crate) fn merge_into(tasks: &mut Vec<Task>, remote: &[RemoteTask]) -> MergeReport {
    let mut report = MergeReport {
        remote: remote.len(),
        ..Default::default()
    };

    let by_id: HashMap<&TaskId, &RemoteTask> = remote.iter().map(|r| (&r.id, r)).collect();

    for task in tasks.iter_mut() {
        let Some(entry) = by_id.get(&task.id) else {
            continue;
        };
        let merged = task.apply_server_snapshot(entry);
        if merged != *task {
            report.events.push(change_event(task, &merged));
            report.updated += 1;
            *task = merged;
        }
    }

    let mut known: HashSet<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
    for entry in remote {
        if known.contains(&entry.id) {
            continue;
        }
        known.insert(entry.id.clone());

        let latest = by_id.get(&entry.id).copied().unwrap_or(entry);
        if let Some(task) = Task::adopt(latest) {
            report.events.push(Event::TaskAdopted {
                id: task.id.clone(),
                status: task.status,
            });
            report.adopted += 1;
            tasks.push(task);
        }
    }

    report
}

fn change_event(before: &Task, after: &Task) -> Event {
    if before.status == after.status {
        return Event::TaskUpdated {
            id: after.id.clone(),
            status: after.status,
            progress: after.progress,
        };
    }
    match after.status {
        Status::Completed => Event::TaskCompleted {
            id: after.id.clone(),
            filename: after.filename.clone(),
        },
        Status::Failed => Event::TaskFailed {
            id: after.id.clone(),
            error: after.error.clone(),
        },
        Status::Cancelled => Event::TaskCancelled {
            id: after.id.clone(),
        },
        Status::Pending | Status::Downloading => Event::TaskUpdated {
            id: after.id.clone(),
            status: after.status,
            progress: after.progress,
        },
    }
}

impl TaskEngine {
    /// Fetch the server's task list and merge it into the collection
    ///
    /// Never fails: the server may be briefly unavailable between polls, so
    /// a failed fetch is logged, reported as [`Event::RefreshFailed`], and
    /// leaves the collection untouched.
    pub async fn refresh(&self) -> MergeReport {
        let remote = match self.gateway.list_tasks().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "Task refresh failed, keeping current queue");
                self.emit_event(Event::RefreshFailed {
                    error: e.to_string(),
                });
                return MergeReport::default();
            }
        };

        let mut report = MergeReport::default();
        self.mutate(|tasks| {
            report = merge_into(tasks, &remote);
            report.changed() > 0
        });

        tracing::debug!(
            remote = report.remote,
            updated = report.updated,
            adopted = report.adopted,
            "Merged task snapshot"
        );

        for event in &report.events {
            self.emit_event(event.clone());
        }
        self.emit_event(Event::Refreshed {
            remote: report.remote,
            changed: report.changed(),
        });

        report
    }
}
