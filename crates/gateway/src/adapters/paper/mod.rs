//! In-memory paper venues
//!
//! - `paper`: off-chain order book. Marketable orders fill at the quoted
//!   bid/ask, others rest with their funds locked until cancelled.
//! - `paper_swap`: on-chain swap venue. Swaps fill immediately after a
//!   simulated confirmation; there is no order book to cancel against.

mod exchange;
mod options;
mod quotes;
mod session;
mod swap;

pub use exchange::PaperExchange;
pub use options::{PaperMarket, PaperOptions};
pub use swap::PaperSwap;
