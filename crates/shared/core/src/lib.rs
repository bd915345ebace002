//! Mercury Core Domain
//!
//! Pure domain types shared by every Mercury crate: venue identity and the
//! venue-reported snapshots (orders, markets, tickers, balances, positions,
//! approvals) that flow through the gateway.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod venue;

// Re-export commonly used types at crate root
pub use entities::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, OrderStatus, OrderType,
    OrderValidationError, Position, PositionSide, Side, Ticker,
};
pub use venue::{OFF_CHAIN_LEDGER, VenueId};
