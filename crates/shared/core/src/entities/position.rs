use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position side - long (bought) or short (sold)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Long position - profit when price rises
    Long,
    /// Short position - profit when price falls
    Short,
}

/// Open derivatives position as reported by a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub side: PositionSide,
    /// Position size (always positive)
    pub size: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub leverage: Option<Decimal>,
    pub exchange_id: String,
    pub ledger_id: String,
}

impl Position {
    /// Unrealized PnL at the current mark price
    pub fn unrealized_pnl(&self) -> Decimal {
        let diff = self.mark_price - self.entry_price;
        match self.side {
            PositionSide::Long => diff * self.size,
            PositionSide::Short => -diff * self.size,
        }
    }
}
