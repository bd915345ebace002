mod approval;
mod balance;
mod market;
mod order;
mod order_status;
mod order_type;
mod position;
mod side;
mod ticker;

pub use approval::{ApprovalRequest, ApprovalResult};
pub use balance::Balance;
pub use market::Market;
pub use order::{Order, OrderValidationError};
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use position::{Position, PositionSide};
pub use side::Side;
pub use ticker::Ticker;
