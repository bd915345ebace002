use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-of-book snapshot for a pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    /// Base asset of the pair
    pub asset_a: String,
    /// Quote asset of the pair
    pub asset_b: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub last: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl Ticker {
    /// Mid price between best bid and ask
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}
