//! Core types for video-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a download task
///
/// Assigned by the worker when a task is created. The client never
/// generates one; it is only ever copied from a server response.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task status
///
/// `Pending` and `Downloading` are active; the rest are terminal and never
/// change again except through explicit removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted by the worker, not started yet
    Pending,
    /// Currently downloading
    Downloading,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
    /// Cancelled by the user
    Cancelled,
}

impl Status {
    /// Whether the task is still being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Pending | Status::Downloading)
    }

    /// Whether the task reached a final state
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Downloading => "downloading",
            Status::Completed => "completed",
            Status::Failed => "failed",
            Status::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "downloading" => Ok(Status::Downloading),
            "completed" => Ok(Status::Completed),
            "failed" => Ok(Status::Failed),
            "cancelled" => Ok(Status::Cancelled),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// A task as reported by one server snapshot
///
/// Every field except the id is optional: the server reports whatever it
/// currently knows, and an absent field never erases local knowledge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteTask {
    /// Join key with the local task
    pub id: TaskId,
    /// Source URL
    pub url: Option<String>,
    /// Requested format
    pub format_id: Option<String>,
    /// Requested quality label
    pub quality: Option<String>,
    /// Reported status (unknown status strings are dropped while decoding)
    pub status: Option<Status>,
    /// Progress percentage
    pub progress: Option<f32>,
    /// Video title
    pub title: Option<String>,
    /// Output filename on the worker
    pub filename: Option<String>,
    /// Output size in bytes
    pub file_size: Option<u64>,
    /// Human-readable speed, as formatted by the worker (e.g. "1.2MiB/s")
    pub download_speed: Option<String>,
    /// Estimated remaining time in seconds
    pub estimated_time: Option<u64>,
    /// Failure message
    pub error: Option<String>,
    /// When the worker accepted the task
    pub created_at: Option<DateTime<Utc>>,
    /// When the worker finished the task
    pub completed_at: Option<DateTime<Utc>>,
    /// When the worker gave up on the task
    pub failed_at: Option<DateTime<Utc>>,
}

impl RemoteTask {
    /// Create an empty report for the given id
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            url: None,
            format_id: None,
            quality: None,
            status: None,
            progress: None,
            title: None,
            filename: None,
            file_size: None,
            download_speed: None,
            estimated_time: None,
            error: None,
            created_at: None,
            completed_at: None,
            failed_at: None,
        }
    }

    /// Set the reported status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the reported progress
    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Server acknowledgement of a created task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    /// Identifier assigned by the worker
    pub id: TaskId,
}

/// One encoding offered for a video
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Worker-side format identifier
    #[serde(default, alias = "formatId")]
    pub format_id: String,
    /// Quality label (e.g. "1080p")
    #[serde(default)]
    pub quality: Option<String>,
    /// Resolution (e.g. "1920x1080", "audio only")
    #[serde(default)]
    pub resolution: Option<String>,
    /// Container extension
    #[serde(default)]
    pub ext: Option<String>,
    /// Video codec
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Audio codec
    #[serde(default)]
    pub acodec: Option<String>,
    /// Size in bytes, when known
    #[serde(default)]
    pub filesize: Option<u64>,
    /// Free-form note from the extractor
    #[serde(default)]
    pub note: Option<String>,
}

impl Format {
    /// Quality label for a download request: the explicit quality, the
    /// resolution, or the format id as a last resort
    pub fn quality_label(&self) -> &str {
        self.quality
            .as_deref()
            .or(self.resolution.as_deref())
            .unwrap_or(&self.format_id)
    }
}

/// Metadata of the last inspected video
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// URL the metadata was fetched for (filled in by the gateway)
    #[serde(default)]
    pub url: String,
    /// Video title
    #[serde(default)]
    pub title: String,
    /// Channel or uploader
    #[serde(default, alias = "uploader")]
    pub author: Option<String>,
    /// Duration in seconds
    #[serde(default, alias = "durationSeconds")]
    pub duration: Option<u64>,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Available encodings, in server order
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// Parameters for enqueuing a download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Video URL
    pub url: String,
    /// Chosen format
    pub format_id: String,
    /// Quality label
    pub quality: String,
    /// Title to show until the worker reports one
    pub title: Option<String>,
}

impl DownloadRequest {
    /// Create a request without a title
    pub fn new(
        url: impl Into<String>,
        format_id: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            format_id: format_id.into(),
            quality: quality.into(),
            title: None,
        }
    }

    /// Attach the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Event emitted as the tracked queue changes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A task was created by the user and is now tracked
    TaskCreated {
        /// Task ID
        id: TaskId,
    },

    /// An active task reported only by the server was picked up
    TaskAdopted {
        /// Task ID
        id: TaskId,
        /// Status at adoption time
        status: Status,
    },

    /// A server snapshot changed an active task
    TaskUpdated {
        /// Task ID
        id: TaskId,
        /// Status after the merge
        status: Status,
        /// Progress after the merge
        progress: f32,
    },

    /// A task finished successfully
    TaskCompleted {
        /// Task ID
        id: TaskId,
        /// Output filename, if reported
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },

    /// A task failed on the worker
    TaskFailed {
        /// Task ID
        id: TaskId,
        /// Failure message, if reported
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A task was cancelled by the user
    TaskCancelled {
        /// Task ID
        id: TaskId,
    },

    /// A task was removed from the queue
    TaskRemoved {
        /// Task ID
        id: TaskId,
    },

    /// Completed and failed tasks were cleared
    CompletedCleared {
        /// Number of tasks removed
        count: usize,
    },

    /// A server snapshot was merged
    Refreshed {
        /// Number of entries in the snapshot
        remote: usize,
        /// Number of local tasks changed by the merge
        changed: usize,
    },

    /// A refresh failed; the queue was left untouched
    RefreshFailed {
        /// Failure message
        error: String,
    },

    /// New video metadata was loaded
    VideoInfoLoaded {
        /// Video URL
        url: String,
        /// Number of available formats
        formats: usize,
    },

    /// The supported-service list was loaded
    ServicesLoaded {
        /// Number of services
        count: usize,
    },

    /// The poll scheduler started
    PollingStarted {
        /// Poll period in milliseconds
        interval_ms: u64,
    },

    /// The poll scheduler stopped
    PollingStopped,

    /// Client shutting down
    Shutdown,
}
