//! Venue identity
//!
//! A venue is addressed by the pair (ledger_id, exchange_id). On-chain venues
//! carry the ledger they settle on; off-chain order books use the
//! [`OFF_CHAIN_LEDGER`] sentinel.

use serde::{Deserialize, Serialize};

/// Ledger sentinel for venues that do not settle on a blockchain
pub const OFF_CHAIN_LEDGER: &str = "off_chain";

/// Addressable trading destination
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VenueId {
    pub ledger_id: String,
    pub exchange_id: String,
}

impl VenueId {
    /// Create a venue identity for the given ledger
    pub fn new(ledger_id: impl Into<String>, exchange_id: impl Into<String>) -> Self {
        Self {
            ledger_id: ledger_id.into(),
            exchange_id: exchange_id.into(),
        }
    }

    /// Create a venue identity for an off-chain exchange
    pub fn off_chain(exchange_id: impl Into<String>) -> Self {
        Self::new(OFF_CHAIN_LEDGER, exchange_id)
    }

    pub fn is_off_chain(&self) -> bool {
        self.ledger_id == OFF_CHAIN_LEDGER
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.exchange_id, self.ledger_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_chain_sentinel() {
        let venue = VenueId::off_chain("binance");
        assert!(venue.is_off_chain());
        assert_eq!(venue.to_string(), "binance@off_chain");

        let dex = VenueId::new("ethereum", "balancer");
        assert!(!dex.is_off_chain());
        assert_ne!(venue, dex);
    }
}
