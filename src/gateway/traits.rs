//! The gateway trait

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{CreatedTask, RemoteTask, TaskId, VideoInfo};

/// Result type for gateway operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Narrow interface to the remote download worker
///
/// Every operation fails with a [`RemoteError`] classified as
/// `InvalidInput`, `Unavailable` or `RemoteRejected`. Implementations must
/// not synthesize task ids: the worker is the only authority for them.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch metadata and available formats for a video URL
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the worker answers with a 4xx status
    /// - `Unavailable` on network failure, timeout or a gateway-type 5xx
    /// - `RemoteRejected` for other server errors or a malformed body
    async fn fetch_metadata(&self, url: &str) -> RemoteResult<VideoInfo>;

    /// Ask the worker to start a download
    ///
    /// Returns the id the worker assigned. A response without an id is a
    /// `RemoteRejected` error.
    async fn create_task(
        &self,
        url: &str,
        format_id: &str,
        quality: &str,
    ) -> RemoteResult<CreatedTask>;

    /// List the tasks the worker currently tracks
    ///
    /// Malformed or non-array payloads yield an empty listing. Only
    /// transport failures and unexpected statuses are errors.
    async fn list_tasks(&self) -> RemoteResult<Vec<RemoteTask>>;

    /// Cancel a task on the worker
    ///
    /// A "not found" answer is reported as `RemoteRejected` with status 404
    /// so the caller can decide whether it is tolerable.
    async fn cancel_task(&self, id: &TaskId) -> RemoteResult<()>;

    /// List the identifiers of the services the worker accepts URLs for
    async fn list_services(&self) -> RemoteResult<Vec<String>>;

    /// Human-readable name for logging
    fn name(&self) -> &str {
        "remote"
    }
}
