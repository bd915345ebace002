use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::venue::VenueId;

/// Request to let a spender (router, vault) move a token on the caller's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub ledger_id: String,
    pub exchange_id: String,
    /// Token contract address or symbol
    pub token: String,
    pub spender: String,
    pub amount: Decimal,
}

impl ApprovalRequest {
    pub fn venue(&self) -> VenueId {
        VenueId::new(self.ledger_id.clone(), self.exchange_id.clone())
    }
}

/// Outcome of an approval submitted on-chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalResult {
    pub token: String,
    pub spender: String,
    pub amount: Decimal,
    pub tx_hash: String,
}
