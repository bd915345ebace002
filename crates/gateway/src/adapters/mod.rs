//! Exchange adapters
//!
//! Adapters implement [`ExchangeAdapter`](mercury_ports::ExchangeAdapter) for
//! one venue kind and are built by the [`VenueCatalog`](crate::VenueCatalog).

pub mod paper;

pub use paper::{PaperExchange, PaperSwap};
