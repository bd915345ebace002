use std::collections::BTreeMap;

use mercury_core::Position;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quoted pair of a paper venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperMarket {
    /// `BASE/QUOTE`
    pub symbol: String,
    pub bid: Decimal,
    pub ask: Decimal,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
}

impl PaperMarket {
    pub fn new(symbol: impl Into<String>, bid: Decimal, ask: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            bid,
            ask,
            min_amount: None,
        }
    }
}

/// Options of the `paper` and `paper_swap` venues
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperOptions {
    pub markets: Vec<PaperMarket>,
    /// Starting free balance per asset
    pub balances: BTreeMap<String, Decimal>,
    /// Open positions reported by `fetch_positions`
    pub positions: Vec<Position>,
    /// Simulated round trip per call
    pub latency_ms: u64,
    pub request_timeout_ms: u64,
    /// Simulated on-chain confirmation (swap only)
    pub confirmation_ms: u64,
    /// Swaps require an allowance for the router (swap only)
    pub require_approval: bool,
    /// Spender swaps are routed through (swap only)
    pub router: String,
    /// Gas asset of the ledger (swap only)
    pub native_asset: String,
}

impl Default for PaperOptions {
    fn default() -> Self {
        Self {
            markets: vec![PaperMarket::new(
                "ETH/USDC",
                Decimal::new(2_000, 0),
                Decimal::new(2_001, 0),
            )],
            balances: BTreeMap::from([
                ("ETH".to_string(), Decimal::new(10, 0)),
                ("USDC".to_string(), Decimal::new(100_000, 0)),
            ]),
            positions: Vec::new(),
            latency_ms: 0,
            request_timeout_ms: 10_000,
            confirmation_ms: 0,
            require_approval: false,
            router: "paper_router".to_string(),
            native_asset: "ETH".to_string(),
        }
    }
}
