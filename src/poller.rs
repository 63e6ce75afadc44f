//! Periodic refresh of the task queue
//!
//! The [`PollScheduler`] owns at most one background timer task. Each tick
//! runs one refresh to completion before the next tick is considered, and
//! ticks missed while a slow refresh was running are skipped rather than
//! replayed in a burst.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use video_dl::engine::TaskEngine;
//! use video_dl::gateway::HttpGateway;
//! use video_dl::config::ApiConfig;
//! use video_dl::poller::PollScheduler;
//!
//! # async fn example() -> video_dl::Result<()> {
//! let gateway = Arc::new(HttpGateway::new(&ApiConfig::default())?);
//! let engine = TaskEngine::new(gateway);
//! let scheduler = PollScheduler::new(Arc::new(engine.clone()), engine.event_sender());
//!
//! scheduler.start(Duration::from_secs(3)).await?;
//! // ...
//! scheduler.stop().await;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::TaskEngine;
use crate::error::{Error, Result};
use crate::types::Event;

/// Something the scheduler can refresh
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    /// Run one refresh; must not fail
    async fn refresh(&self);
}

#[async_trait]
impl Refresh for TaskEngine {
    async fn refresh(&self) {
        TaskEngine::refresh(self).await;
    }
}

/// The running timer
struct Ticker {
    period: Duration,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Repeating timer driving [`Refresh::refresh`]
pub struct PollScheduler {
    target: Arc<dyn Refresh>,
    ticker: Mutex<Option<Ticker>>,
    event_tx: broadcast::Sender<Event>,
}

impl PollScheduler {
    /// Create a stopped scheduler
    pub fn new(target: Arc<dyn Refresh>, event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            target,
            ticker: Mutex::new(None),
            event_tx,
        }
    }

    /// Start ticking every `period`; the first tick fires immediately
    ///
    /// A timer that is already running is stopped first, so at most one
    /// timer exists at any time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero period.
    pub async fn start(&self, period: Duration) -> Result<()> {
        if period.is_zero() {
            return Err(Error::InvalidInput(
                "polling interval must be greater than zero".to_string(),
            ));
        }

        let mut ticker = self.ticker.lock().await;
        if let Some(previous) = ticker.take() {
            debug!(period_ms = previous.period.as_millis() as u64, "Replacing running poll timer");
            halt(previous).await;
        }

        let cancel_token = CancellationToken::new();
        let handle = spawn_ticker(self.target.clone(), period, cancel_token.clone());
        *ticker = Some(Ticker {
            period,
            cancel_token,
            handle,
        });

        let interval_ms = period.as_millis() as u64;
        info!(interval_ms, "Task polling started");
        self.event_tx.send(Event::PollingStarted { interval_ms }).ok();
        Ok(())
    }

    /// Stop the timer
    ///
    /// No tick fires after this returns. A refresh already in flight is
    /// allowed to finish first. Safe to call when not running; returns
    /// whether a timer was stopped.
    pub async fn stop(&self) -> bool {
        let Some(ticker) = self.ticker.lock().await.take() else {
            return false;
        };
        halt(ticker).await;

        info!("Task polling stopped");
        self.event_tx.send(Event::PollingStopped).ok();
        true
    }

    /// Whether a timer is running
    pub async fn is_running(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    /// Period of the running timer
    pub async fn period(&self) -> Option<Duration> {
        self.ticker.lock().await.as_ref().map(|t| t.period)
    }

    /// Refresh once, outside the timer
    pub async fn refresh_now(&self) {
        self.target.refresh().await;
    }
}

impl Drop for PollScheduler {
    // The timer task only holds the refresh target, so it must be told to
    // stop when the last handle to the scheduler goes away
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            ticker.cancel_token.cancel();
            debug!("Poll scheduler dropped, timer cancelled");
        }
    }
}

impl std::fmt::Debug for PollScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollScheduler").finish_non_exhaustive()
    }
}

fn spawn_ticker(
    target: Arc<dyn Refresh>,
    period: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    break;
                }
                _ = interval.tick() => {
                    target.refresh().await;
                }
            }
        }
    })
}

async fn halt(ticker: Ticker) {
    ticker.cancel_token.cancel();
    if let Err(e) = ticker.handle.await {
        tracing::warn!(error = %e, "Poll timer task ended abnormally");
    }
}
