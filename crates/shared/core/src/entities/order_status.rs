use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been handed to the venue but not yet acknowledged
    Submitted,
    /// Order is resting on the venue's book
    Open,
    /// Order has been partially filled and the rest is still resting
    PartiallyFilled,
    /// Order has been cancelled
    Cancelled,
    /// Order has been completely filled
    Filled,
    /// Order was closed by the venue (settled swap, closed position)
    Closed,
    /// Order has expired
    Expired,
    /// Order failed at the venue (reverted transaction, rejected request)
    Failed,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Cancelled
                | OrderStatus::Filled
                | OrderStatus::Closed
                | OrderStatus::Expired
                | OrderStatus::Failed
        )
    }

    /// Returns true if the order can still trade
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Submitted | OrderStatus::Open | OrderStatus::PartiallyFilled
        )
    }
}
