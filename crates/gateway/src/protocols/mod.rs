//! Dialogue contracts and per-protocol dialogue state

pub mod contract;
pub mod dialogue;

pub use contract::DialogueContract;
pub use dialogue::{Dialogue, DialogueStore, Role};
