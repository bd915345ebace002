use serde::{Deserialize, Serialize};

/// Order types accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at specified price or better
    Limit,
    /// Execute at current market price
    Market,
}
