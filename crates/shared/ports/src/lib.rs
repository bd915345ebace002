//! Mercury Ports
//!
//! Port definitions (traits) for the Mercury gateway.
//! These define the boundary between the request broker and venue-specific
//! infrastructure: every venue is reached through [`ExchangeAdapter`] and
//! every venue failure is expressed as a [`VenueError`].

mod adapter;
mod error;

pub use adapter::ExchangeAdapter;
pub use error::{ErrorKind, VenueError, VenueResult};
