//! Messages exchanged between agents and the gateway
//!
//! An [`Envelope`] carries one [`Message`]; the message's [`Body`] variant
//! determines its [`Performative`].

mod body;
mod envelope;
mod message;

pub use body::{Body, ErrorCode, Performative};
pub use envelope::Envelope;
pub use message::{DialogueReference, Message, ProtocolId};
