use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{OrderStatus, OrderType, Side};
use crate::venue::VenueId;

/// Reasons an order is rejected before it reaches a venue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("Order symbol is empty")]
    EmptySymbol,

    #[error("Order amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Limit order requires a positive price")]
    MissingLimitPrice,

    #[error("Order id is required")]
    MissingId,
}

/// Order as exchanged between the strategy and a venue
///
/// Requests carry the fields the strategy knows (venue, symbol, side, type,
/// amount, price); venues fill in `id`, `status`, fills and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Venue-assigned identifier (absent until the venue accepts the order)
    pub id: Option<String>,
    pub exchange_id: String,
    pub ledger_id: String,
    /// Caller-assigned identifier for correlation
    pub client_order_id: Option<String>,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Required for limit orders
    pub price: Option<Decimal>,
    pub amount: Decimal,
    pub filled: Decimal,
    pub remaining: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a limit order request
    pub fn limit(
        venue: &VenueId,
        symbol: impl Into<String>,
        side: Side,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self::request(venue, symbol, side, OrderType::Limit, amount, Some(price))
    }

    /// Create a market order request
    pub fn market(venue: &VenueId, symbol: impl Into<String>, side: Side, amount: Decimal) -> Self {
        Self::request(venue, symbol, side, OrderType::Market, amount, None)
    }

    /// Reference an existing order by id (for cancel/fetch requests)
    pub fn reference(venue: &VenueId, id: impl Into<String>, symbol: impl Into<String>) -> Self {
        let mut order = Self::request(venue, symbol, Side::Buy, OrderType::Limit, Decimal::ZERO, None);
        order.id = Some(id.into());
        order
    }

    fn request(
        venue: &VenueId,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Self {
        Self {
            id: None,
            exchange_id: venue.exchange_id.clone(),
            ledger_id: venue.ledger_id.clone(),
            client_order_id: None,
            symbol: symbol.into(),
            side,
            order_type,
            status: OrderStatus::Submitted,
            price,
            amount,
            filled: Decimal::ZERO,
            remaining: amount,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach a caller-assigned identifier
    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    /// The venue this order is addressed to
    pub fn venue(&self) -> VenueId {
        VenueId::new(self.ledger_id.clone(), self.exchange_id.clone())
    }

    /// Validate a new order before it is handed to a venue
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(OrderValidationError::EmptySymbol);
        }
        if self.amount <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositiveAmount(self.amount));
        }
        match (self.order_type, self.price) {
            (OrderType::Limit, Some(price)) if price > Decimal::ZERO => Ok(()),
            (OrderType::Limit, _) => Err(OrderValidationError::MissingLimitPrice),
            (OrderType::Market, _) => Ok(()),
        }
    }

    /// Validate a reference to an existing order
    pub fn validate_reference(&self) -> Result<(), OrderValidationError> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(()),
            _ => Err(OrderValidationError::MissingId),
        }
    }

    /// Apply a fill and advance the status accordingly
    pub fn apply_fill(&mut self, quantity: Decimal, timestamp: DateTime<Utc>) {
        self.filled = (self.filled + quantity).min(self.amount);
        self.remaining = self.amount - self.filled;
        self.status = if self.remaining.is_zero() {
            OrderStatus::Filled
        } else if self.filled.is_zero() {
            OrderStatus::Open
        } else {
            OrderStatus::PartiallyFilled
        };
        self.updated_at = Some(timestamp);
    }
}
