//! Remote gateway to the download worker API
//!
//! The engine talks to the worker exclusively through the [`RemoteGateway`]
//! trait, which narrows the API down to the operations the client needs:
//! fetch metadata, create a task, list tasks, cancel a task and list the
//! supported services.
//!
//! ## Implementations
//!
//! - [`HttpGateway`]: reqwest-based client for the worker's REST API
//!
//! Tests and embedders can provide their own implementation (an in-memory
//! worker, a different transport) and hand it to
//! [`DownloadClient::with_gateway`](crate::DownloadClient::with_gateway).
//!
//! ## Wire tolerance
//!
//! The worker wraps every payload in a `{success, message, data}` envelope,
//! may name the task id `id` or `taskId`, and is expected to be unstable.
//! Task listings are therefore normalized aggressively: anything that is not
//! an array of identifiable entries becomes an empty listing rather than an
//! error. See [`wire`] for the exact rules.

mod http;
mod traits;
pub(crate) mod wire;

pub use http::HttpGateway;
pub use traits::{RemoteGateway, RemoteResult};

use crate::config::ApiConfig;

/// Direct download URL for a file produced by the worker
///
/// Pure formatting, no request is made. The filename is percent-encoded as
/// a single path segment.
///
/// ```
/// use video_dl::config::ApiConfig;
/// use video_dl::gateway::file_url;
///
/// let api = ApiConfig::default();
/// assert_eq!(
///     file_url(&api, "dl-a1 (1).mp4"),
///     "http://localhost:8080/api/downloads/dl-a1%20%281%29.mp4"
/// );
/// ```
pub fn file_url(api: &ApiConfig, filename: &str) -> String {
    format!(
        "{}{}/{}",
        api.base_url.trim_end_matches('/'),
        api.endpoints.files.trim_end_matches('/'),
        urlencoding::encode(filename)
    )
}
