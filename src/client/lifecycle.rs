//! Start-up, polling control and shutdown.

use crate::error::Result;
use crate::types::Event;

use super::DownloadClient;

impl DownloadClient {
    /// Prepare the client for use
    ///
    /// Starts polling when `polling.auto_start` is set, then loads the
    /// supported-service list once. Polling does not depend on the service
    /// list, so it keeps running when that load fails.
    ///
    /// # Errors
    ///
    /// Returns the error of the service list request; the catalog then stays
    /// not loaded and URLs are not validated locally.
    pub async fn initialize(&self) -> Result<()> {
        if self.config.polling.auto_start {
            self.start_polling().await?;
        }
        self.load_services().await?;
        Ok(())
    }

    /// Start polling the worker at the configured interval
    ///
    /// Restarts the timer if it is already running.
    pub async fn start_polling(&self) -> Result<()> {
        self.poller.start(self.config.polling.interval).await
    }

    /// Stop polling; returns whether polling was running
    pub async fn stop_polling(&self) -> bool {
        self.poller.stop().await
    }

    /// Whether the poll timer is running
    pub async fn is_polling(&self) -> bool {
        self.poller.is_running().await
    }

    /// Stop background work
    ///
    /// Stops the poll timer (letting an in-flight refresh finish) and emits
    /// [`Event::Shutdown`]. Tracked tasks stay readable afterwards.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating shutdown");

        if self.poller.stop().await {
            tracing::info!("Stopped task polling");
        }

        self.emit_event(Event::Shutdown);
        tracing::info!(tasks = self.engine.len(), "Shutdown complete");
        Ok(())
    }
}
