use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Holding of one asset at a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub asset_id: String,
    /// Available for new orders
    pub free: Decimal,
    /// Locked in open orders
    pub used: Decimal,
    pub total: Decimal,
    /// True for a ledger's native gas asset
    pub is_native: bool,
    /// Token contract for on-chain assets
    pub contract_address: Option<String>,
}

impl Balance {
    /// Balance with nothing locked
    pub fn free(asset_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            free: amount,
            used: Decimal::ZERO,
            total: amount,
            is_native: false,
            contract_address: None,
        }
    }
}
