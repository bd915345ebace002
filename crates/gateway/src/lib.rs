//! Mercury Gateway
//!
//! Concurrent request broker between trading agents and venues. Provides:
//! - Typed protocol messages (orders, markets, tickers, balances, positions,
//!   approvals) carried in envelopes
//! - Per-protocol dialogue contracts and the interfaces that enforce them
//! - A task dispatcher running one unit of work per request
//! - Connection lifecycle over a catalog of venue adapters (paper venues
//!   included)
//!
//! ## Architecture
//!
//! ```text
//! Agent ──Envelope──► Connection::send
//!                          │
//!                    ┌─────▼──────┐   validate    ┌───────────────────┐
//!                    │ Dispatcher ├──────────────►│ InterfaceRegistry │
//!                    │  (actor)   │◄──reply───────┤  orders, markets… │
//!                    └─────┬──────┘               └─────────┬─────────┘
//!                          │                                │ handler
//! Agent ◄──Envelope── Connection::receive          ┌────────▼────────┐
//!                                                  │ AdapterRegistry │
//!                                                  │ (ledger, exch.) │
//!                                                  └────────┬────────┘
//!                                                           ▼
//!                                                      Venue (SDK/RPC)
//! ```

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod interface;
pub mod messages;
pub mod protocols;
pub mod registry;

// Re-export commonly used types
pub use catalog::VenueCatalog;
pub use config::{Credentials, GatewayConfig, VenueConfig};
pub use connection::{Connection, ConnectionState};
pub use dispatcher::TaskDispatcher;
pub use error::{ConfigError, GatewayError, ProtocolError};
pub use interface::{Handler, HandlerFuture, InterfaceRegistry, ProtocolInterface};
pub use messages::{Body, DialogueReference, Envelope, ErrorCode, Message, Performative, ProtocolId};
pub use protocols::{Dialogue, DialogueContract, DialogueStore, Role};
pub use registry::AdapterRegistry;
