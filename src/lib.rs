//! # video-dl
//!
//! Client-side task tracking for a remote video download worker.
//!
//! The worker extracts and downloads videos; this crate keeps the user's
//! view of that work. It enqueues downloads, polls the worker for progress
//! and merges each snapshot into a local task queue that outlives the
//! worker's own, short-lived, bookkeeping.
//!
//! ## Design Philosophy
//!
//! - **The client is the durable record** - a finished task stays finished
//!   locally, whatever a stale or recycled server snapshot says
//! - **Unstable servers are normal** - failed polls are logged and skipped,
//!   malformed listings read as empty
//! - **Library-first** - no UI, purely a Rust crate for embedding
//! - **Event-driven** - consumers subscribe to events or watch snapshots
//!
//! ## Quick Start
//!
//! ```no_run
//! use video_dl::{Config, DownloadClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DownloadClient::new(Config::from_env()?)?;
//!     client.initialize().await?;
//!
//!     // Subscribe to events
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     client
//!         .fetch_video_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     let task = client.download_selected().await?;
//!     println!("Tracking task {}", task.id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Client facade wiring all components together
pub mod client;
/// Configuration types
pub mod config;
/// Task reconciliation engine
pub mod engine;
/// Error types
pub mod error;
/// Worker API access
pub mod gateway;
/// Periodic refresh scheduling
pub mod poller;
/// Format selection for the current video
pub mod selection;
/// Supported video services
pub mod services;
/// Task model and state machine
pub mod task;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use client::DownloadClient;
pub use config::{ApiConfig, Config, Endpoints, PollingConfig};
pub use engine::{MergeReport, TaskEngine};
pub use error::{Error, ErrorCode, RemoteError, Result};
pub use gateway::{HttpGateway, RemoteGateway};
pub use poller::{PollScheduler, Refresh};
pub use selection::FormatSelection;
pub use services::{ServiceKind, SupportedServices};
pub use task::Task;
pub use types::{
    CreatedTask, DownloadRequest, Event, Format, RemoteTask, Status, TaskId, VideoInfo,
};
