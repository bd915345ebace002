use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tradeable pair as listed by a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Venue-specific market identifier
    pub id: String,
    /// Unified symbol (e.g. `ETH/USDC`)
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub exchange_id: String,
    pub ledger_id: String,
    pub active: bool,
    /// Smallest order amount accepted by the venue
    pub min_amount: Option<Decimal>,
    /// Number of decimal places for prices
    pub price_precision: Option<u32>,
}

impl Market {
    /// Returns true if either side of the pair is the given currency
    pub fn involves(&self, currency: &str) -> bool {
        self.base.eq_ignore_ascii_case(currency) || self.quote.eq_ignore_ascii_case(currency)
    }
}
