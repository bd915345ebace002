use serde::{Deserialize, Serialize};

use super::message::Message;

/// Transport wrapper around one message
///
/// Addresses are opaque to the gateway; replies swap them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    to: String,
    sender: String,
    message: Message,
}

impl Envelope {
    pub fn new(to: impl Into<String>, sender: impl Into<String>, message: Message) -> Self {
        Self {
            to: to.into(),
            sender: sender.into(),
            message,
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }

    /// Wrap a response addressed back to this envelope's sender
    pub fn reply(&self, message: Message) -> Envelope {
        Envelope {
            to: self.sender.clone(),
            sender: self.to.clone(),
            message,
        }
    }
}
