//! Task reconciliation engine, split into focused submodules.
//!
//! The [`TaskEngine`] owns the canonical task collection. Its methods are
//! organized by concern:
//! - `control` - user-initiated mutations (create, cancel, remove, clear)
//! - `reconcile` - merging server snapshots into the collection
//!
//! ## Consistency
//!
//! The collection is published through a `tokio::sync::watch` channel as an
//! immutable `Arc<[Task]>`. Every mutation builds the next collection and
//! swaps it in inside a single synchronous closure, so readers never lock
//! and never observe a half-applied merge. Across overlapping refreshes the
//! last applied snapshot wins; terminal-state protection in
//! [`Task::apply_server_snapshot`] bounds what a stale snapshot can do.

mod control;
mod reconcile;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use reconcile::MergeReport;

use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use crate::gateway::RemoteGateway;
use crate::task::Task;
use crate::types::{Event, TaskId};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Owner of the tracked task collection (cloneable - all fields are shared)
#[derive(Clone)]
pub struct TaskEngine {
    /// Worker API
    pub(crate) gateway: Arc<dyn RemoteGateway>,
    /// Canonical collection, published as immutable snapshots
    tasks: Arc<watch::Sender<Arc<[Task]>>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: broadcast::Sender<Event>,
}

impl TaskEngine {
    /// Create an engine with an empty collection and its own event channel
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self::with_event_sender(gateway, event_tx)
    }

    /// Create an engine that publishes into an existing event channel
    pub fn with_event_sender(
        gateway: Arc<dyn RemoteGateway>,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        let (tasks, _rx) = watch::channel(Arc::<[Task]>::from(Vec::new()));
        Self {
            gateway,
            tasks: Arc::new(tasks),
            event_tx,
        }
    }

    /// Snapshot of the collection, in insertion order
    pub fn tasks(&self) -> Arc<[Task]> {
        self.tasks.borrow().clone()
    }

    /// Snapshot of one task
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| &t.id == id).cloned()
    }

    /// Number of tracked tasks
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Whether no task is tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tracked tasks that are still active
    pub fn active_count(&self) -> usize {
        self.tasks.borrow().iter().filter(|t| t.is_active()).count()
    }

    /// Receiver notified whenever the collection changes
    ///
    /// The receiver always holds the latest snapshot; intermediate snapshots
    /// may be skipped by slow readers.
    pub fn watch(&self) -> watch::Receiver<Arc<[Task]>> {
        self.tasks.subscribe()
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Sender side of the event channel, for components publishing alongside
    /// the engine
    pub fn event_sender(&self) -> broadcast::Sender<Event> {
        self.event_tx.clone()
    }

    /// Emit an event to all subscribers
    ///
    /// Having no subscriber is not an error.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Apply a mutation atomically
    ///
    /// `mutate` works on a private copy of the collection and returns whether
    /// it changed anything; only then is the copy published. No await point
    /// may happen inside.
    pub(crate) fn mutate<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut Vec<Task>) -> bool,
    {
        self.tasks.send_if_modified(|current| {
            let mut next = current.to_vec();
            let modified = mutate(&mut next);
            if modified {
                *current = Arc::from(next);
            }
            modified
        })
    }
}

impl std::fmt::Debug for TaskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEngine")
            .field("gateway", &self.gateway.name())
            .field("tasks", &self.len())
            .finish()
    }
}
