use async_trait::async_trait;
use mercury_core::{
    ApprovalRequest, ApprovalResult, Balance, Market, Order, Position, Ticker, VenueId,
};

use crate::error::VenueResult;

/// Port for a trading venue
///
/// Every venue exposes the same capability set whatever its kind, so the
/// gateway can dispatch uniformly:
/// - Off-chain order books (REST/WebSocket exchanges)
/// - On-chain swap venues (AMMs, aggregators) on any ledger
///
/// A venue that structurally cannot serve a capability (an AMM has no resting
/// book to cancel from) still implements the method and fails with
/// `VenueError::NotSupported`.
///
/// Implementations are shared across concurrently running requests and own
/// the safety of their internal state (sessions, nonces). Each call enforces
/// its own timeout and must tolerate being dropped at any await point when
/// the gateway shuts down.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// The (ledger_id, exchange_id) this adapter serves
    fn venue(&self) -> &VenueId;

    /// All markets listed by the venue
    async fn fetch_markets(&self) -> VenueResult<Vec<Market>>;

    /// Tickers for every listed market
    async fn fetch_tickers(&self) -> VenueResult<Vec<Ticker>>;

    /// Ticker for one symbol
    async fn fetch_ticker(&self, symbol: &str) -> VenueResult<Ticker>;

    /// Balances held at the venue, optionally for a specific on-chain address
    async fn fetch_balance(&self, address: Option<&str>) -> VenueResult<Vec<Balance>>;

    /// Open derivatives positions
    async fn fetch_positions(&self) -> VenueResult<Vec<Position>>;

    /// Submit an order and return it as acknowledged by the venue
    async fn create_order(&self, order: Order) -> VenueResult<Order>;

    /// Cancel a resting order
    async fn cancel_order(&self, order_id: &str, symbol: &str) -> VenueResult<Order>;

    /// Current state of one order
    async fn fetch_order(&self, order_id: &str, symbol: &str) -> VenueResult<Order>;

    /// Orders still working at the venue, optionally for one symbol
    async fn fetch_open_orders(&self, symbol: Option<&str>) -> VenueResult<Vec<Order>>;

    /// Approve a spender to move a token (on-chain venues)
    async fn set_approval(&self, request: ApprovalRequest) -> VenueResult<ApprovalResult>;

    /// Release sessions and pending work. Called once on disconnect.
    async fn close(&self) -> VenueResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure the trait is object-safe
    fn _assert_adapter_object_safe(_: &dyn ExchangeAdapter) {}
}
