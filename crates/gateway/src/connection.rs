//! Connection lifecycle
//!
//! `connect` builds the adapters named in the configuration, wires them to
//! the protocol interfaces and starts the dispatcher. `disconnect` cancels all
//! in-flight work before closing the adapters.

use std::sync::Arc;

use log::info;
use mercury_core::VenueId;
use tokio::sync::{Mutex, watch};

use crate::catalog::VenueCatalog;
use crate::config::GatewayConfig;
use crate::dispatcher::TaskDispatcher;
use crate::error::{ConfigError, GatewayError};
use crate::interface::InterfaceRegistry;
use crate::messages::Envelope;
use crate::registry::AdapterRegistry;

/// Lifecycle state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnecting,
    Disconnected,
}

/// Live gateway connection
pub struct Connection {
    adapters: Arc<AdapterRegistry>,
    dispatcher: TaskDispatcher,
    state: watch::Sender<ConnectionState>,
    lifecycle: Mutex<()>,
}

impl Connection {
    /// Build every configured venue and start dispatching
    ///
    /// Fails on the first venue that cannot be built; nothing is left running.
    pub async fn connect(
        config: GatewayConfig,
        catalog: &VenueCatalog,
    ) -> Result<Connection, ConfigError> {
        Self::connect_with(config, catalog, InterfaceRegistry::standard()).await
    }

    /// Connect with a custom interface table
    pub async fn connect_with(
        config: GatewayConfig,
        catalog: &VenueCatalog,
        interfaces: InterfaceRegistry,
    ) -> Result<Connection, ConfigError> {
        let adapters = Arc::new(AdapterRegistry::build(&config, catalog)?);
        let dispatcher = TaskDispatcher::spawn(Arc::new(interfaces), adapters.clone());
        let (state, _) = watch::channel(ConnectionState::Connected);

        info!("Connected: venues={}", adapters.len());
        Ok(Connection {
            adapters,
            dispatcher,
            state,
            lifecycle: Mutex::new(()),
        })
    }

    /// Submit a request envelope
    pub fn send(&self, envelope: Envelope) -> Result<(), GatewayError> {
        if self.state() != ConnectionState::Connected {
            return Err(GatewayError::NotConnected);
        }
        self.dispatcher.send(envelope)
    }

    /// Next reply, in completion order
    ///
    /// Returns `None` after `disconnect` once every queued reply is consumed.
    pub async fn receive(&self) -> Option<Envelope> {
        self.dispatcher.receive().await
    }

    /// Cancel in-flight work and close every adapter
    ///
    /// Idempotent; concurrent callers wait for the first to finish.
    pub async fn disconnect(&self) {
        let _guard = self.lifecycle.lock().await;
        if self.state() == ConnectionState::Disconnected {
            return;
        }

        info!("Disconnecting: in_flight={}", self.dispatcher.in_flight());
        self.state.send_replace(ConnectionState::Disconnecting);
        self.dispatcher.shutdown().await;
        self.state.send_replace(ConnectionState::Disconnected);

        self.adapters.close_all().await;
        info!("Disconnected");
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch lifecycle transitions
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Connected venues, sorted
    pub fn venues(&self) -> Vec<VenueId> {
        self.adapters.venues()
    }

    /// Units currently executing
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }
}
