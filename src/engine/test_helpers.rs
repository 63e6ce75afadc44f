//! Scripted in-memory gateway for engine, poller and client tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::engine::TaskEngine;
use crate::error::RemoteError;
use crate::gateway::{RemoteGateway, RemoteResult};
use crate::task::Task;
use crate::types::{CreatedTask, DownloadRequest, RemoteTask, Status, TaskId, VideoInfo};

/// Gateway whose answers are set by the test
///
/// - `list_tasks` returns the current listing on every call
/// - `create_task` pops queued results, falling back to sequential ids
/// - `cancel_task` returns the queued error once, then succeeds
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    listing: Mutex<Option<RemoteResult<Vec<RemoteTask>>>>,
    listing_delay: Mutex<Duration>,
    created: Mutex<VecDeque<RemoteResult<CreatedTask>>>,
    cancel_errors: Mutex<VecDeque<RemoteError>>,
    metadata: Mutex<Option<RemoteResult<VideoInfo>>>,
    services: Mutex<Option<RemoteResult<Vec<String>>>>,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) create_calls: AtomicUsize,
    pub(crate) cancel_calls: AtomicUsize,
    pub(crate) metadata_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the listing returned by every following `list_tasks`
    pub(crate) fn set_listing(&self, tasks: Vec<RemoteTask>) {
        *self.listing.lock().unwrap() = Some(Ok(tasks));
    }

    /// Make every following `list_tasks` fail
    pub(crate) fn fail_listing(&self, error: RemoteError) {
        *self.listing.lock().unwrap() = Some(Err(error));
    }

    /// Delay every following `list_tasks`
    pub(crate) fn delay_listing(&self, delay: Duration) {
        *self.listing_delay.lock().unwrap() = delay;
    }

    /// Queue the result of the next `create_task`
    pub(crate) fn push_created(&self, result: RemoteResult<CreatedTask>) {
        self.created.lock().unwrap().push_back(result);
    }

    /// Queue an error for the next `cancel_task`
    pub(crate) fn push_cancel_error(&self, error: RemoteError) {
        self.cancel_errors.lock().unwrap().push_back(error);
    }

    pub(crate) fn set_metadata(&self, result: RemoteResult<VideoInfo>) {
        *self.metadata.lock().unwrap() = Some(result);
    }

    pub(crate) fn set_services(&self, result: RemoteResult<Vec<String>>) {
        *self.services.lock().unwrap() = Some(result);
    }

    pub(crate) fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn fetch_metadata(&self, url: &str) -> RemoteResult<VideoInfo> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.metadata.lock().unwrap().clone();
        scripted
            .unwrap_or_else(|| Err(RemoteError::unavailable("no metadata scripted")))
            .map(|mut info| {
                info.url = url.to_string();
                info
            })
    }

    async fn create_task(
        &self,
        _url: &str,
        _format_id: &str,
        _quality: &str,
    ) -> RemoteResult<CreatedTask> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let scripted = self.created.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(CreatedTask {
                id: TaskId::new(format!("t{}", n)),
            })
        })
    }

    async fn list_tasks(&self) -> RemoteResult<Vec<RemoteTask>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.listing_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.listing.lock().unwrap().clone();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn cancel_task(&self, _id: &TaskId) -> RemoteResult<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.cancel_errors.lock().unwrap().pop_front();
        match scripted {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_services(&self) -> RemoteResult<Vec<String>> {
        let scripted = self.services.lock().unwrap().clone();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Engine wired to a fresh scripted gateway
pub(crate) fn create_test_engine() -> (TaskEngine, Arc<ScriptedGateway>) {
    let gateway = ScriptedGateway::new();
    let engine = TaskEngine::new(gateway.clone());
    (engine, gateway)
}

/// A typical request for `https://youtu.be/<suffix>`
pub(crate) fn request(suffix: &str) -> DownloadRequest {
    DownloadRequest::new(format!("https://youtu.be/{}", suffix), "22", "720p")
}

/// Create a task through the engine under a chosen id
pub(crate) async fn track(engine: &TaskEngine, gateway: &ScriptedGateway, id: &str) -> Task {
    gateway.push_created(Ok(CreatedTask {
        id: TaskId::from(id),
    }));
    engine.create_and_track(request(id)).await.unwrap()
}

/// Create a task and drive it to `status` through a refresh
pub(crate) async fn track_with_status(
    engine: &TaskEngine,
    gateway: &ScriptedGateway,
    id: &str,
    status: Status,
) -> Task {
    track(engine, gateway, id).await;
    gateway.set_listing(vec![RemoteTask::new(id).with_status(status)]);
    engine.refresh().await;
    gateway.set_listing(Vec::new());
    engine.task(&TaskId::from(id)).unwrap()
}
