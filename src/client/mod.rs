//! Client facade, split into focused submodules.
//!
//! [`DownloadClient`] wires the configured gateway, the task engine, the poll
//! scheduler, the format selection and the supported-service catalog
//! together. Its methods are organized by concern:
//! - `lifecycle` - start-up, polling control and shutdown
//! - `metadata` - video inspection, format choice and service validation
//! - `tasks` - queue operations delegated to the engine

mod lifecycle;
mod metadata;
mod tasks;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::engine::TaskEngine;
use crate::error::Result;
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::poller::PollScheduler;
use crate::selection::FormatSelection;
use crate::services::SupportedServices;

/// Main client instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct DownloadClient {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Worker API (trait object so tests and embedders can swap transports)
    pub(crate) gateway: Arc<dyn RemoteGateway>,
    /// Owner of the tracked task collection
    pub(crate) engine: TaskEngine,
    /// Timer driving periodic refreshes
    pub(crate) poller: Arc<PollScheduler>,
    /// Last inspected video and the format chosen for it
    pub(crate) selection: Arc<RwLock<FormatSelection>>,
    /// Services the worker accepts, loaded by `initialize()`
    pub(crate) services: Arc<RwLock<SupportedServices>>,
}

impl DownloadClient {
    /// Create a client talking to the worker over HTTP
    ///
    /// Nothing is requested yet; call [`initialize`](Self::initialize) to
    /// load the service list and start polling.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let gateway = Arc::new(HttpGateway::new(&config.api)?);
        Self::with_gateway(config, gateway)
    }

    /// Create a client using a custom gateway implementation
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn with_gateway(config: Config, gateway: Arc<dyn RemoteGateway>) -> Result<Self> {
        config.validate()?;

        let engine = TaskEngine::new(gateway.clone());
        let poller = PollScheduler::new(Arc::new(engine.clone()), engine.event_sender());

        tracing::debug!(
            gateway = gateway.name(),
            base_url = %config.api.base_url,
            "Download client created"
        );

        Ok(Self {
            config: Arc::new(config),
            gateway,
            engine,
            poller: Arc::new(poller),
            selection: Arc::new(RwLock::new(FormatSelection::new())),
            services: Arc::new(RwLock::new(SupportedServices::NotLoaded)),
        })
    }

    /// The configuration the client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The task engine, for direct access to snapshots and watchers
    pub fn engine(&self) -> &TaskEngine {
        &self.engine
    }

    /// Subscribe to client events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Multiple subscribers are supported.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::types::Event> {
        self.engine.subscribe()
    }

    pub(crate) fn emit_event(&self, event: crate::types::Event) {
        self.engine.emit_event(event);
    }
}

impl std::fmt::Debug for DownloadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadClient")
            .field("base_url", &self.config.api.base_url)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
