//! Waiting helpers for polling tests

use std::time::Duration;
use video_dl::{DownloadClient, Event, Status, TaskId};

/// Wait until the tracked task reaches `status`
///
/// Returns `false` on timeout.
pub async fn wait_for_status(
    client: &DownloadClient,
    id: &TaskId,
    status: Status,
    timeout: Duration,
) -> bool {
    let mut snapshots = client.engine().watch();

    let result = tokio::time::timeout(timeout, async {
        loop {
            let reached = snapshots
                .borrow_and_update()
                .iter()
                .any(|t| &t.id == id && t.status == status);
            if reached {
                return;
            }
            if snapshots.changed().await.is_err() {
                return;
            }
        }
    })
    .await;

    result.is_ok() && client.task(id).is_some_and(|t| t.status == status)
}

/// Collect events until one matches `predicate` or the timeout elapses
pub async fn collect_events_until<F>(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
    timeout: Duration,
    mut predicate: F,
) -> Vec<Event>
where
    F: FnMut(&Event) -> bool,
{
    let mut collected = Vec::new();

    let _ = tokio::time::timeout(timeout, async {
        while let Ok(event) = events.recv().await {
            let done = predicate(&event);
            collected.push(event);
            if done {
                break;
            }
        }
    })
    .await;

    collected
}
