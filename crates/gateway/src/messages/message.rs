use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::body::{Body, Performative};

/// Protocols understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolId {
    Orders,
    Markets,
    Tickers,
    Balances,
    Positions,
    Approvals,
}

impl ProtocolId {
    pub const ALL: [ProtocolId; 6] = [
        ProtocolId::Orders,
        ProtocolId::Markets,
        ProtocolId::Tickers,
        ProtocolId::Balances,
        ProtocolId::Positions,
        ProtocolId::Approvals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Markets => "markets",
            Self::Tickers => "tickers",
            Self::Balances => "balances",
            Self::Positions => "positions",
            Self::Approvals => "approvals",
        }
    }
}

impl std::fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nonce pair identifying one dialogue
///
/// The first element is chosen by the party opening the dialogue, the second
/// by the responder (empty until assigned).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueReference(pub String, pub String);

impl DialogueReference {
    pub fn new(starter: impl Into<String>, responder: impl Into<String>) -> Self {
        Self(starter.into(), responder.into())
    }

    /// Fresh reference for a new outgoing request
    pub fn new_request() -> Self {
        Self(Uuid::new_v4().simple().to_string(), String::new())
    }
}

impl std::fmt::Display for DialogueReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Immutable protocol message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    protocol_id: ProtocolId,
    dialogue_reference: DialogueReference,
    message_id: i64,
    /// Id of the message this one answers, 0 for a dialogue opener
    target: i64,
    #[serde(flatten)]
    body: Body,
}

impl Message {
    pub fn new(
        protocol_id: ProtocolId,
        dialogue_reference: DialogueReference,
        message_id: i64,
        target: i64,
        body: Body,
    ) -> Self {
        Self {
            protocol_id,
            dialogue_reference,
            message_id,
            target,
            body,
        }
    }

    /// First message of a new dialogue
    pub fn request(protocol_id: ProtocolId, body: Body) -> Self {
        Self::new(protocol_id, DialogueReference::new_request(), 1, 0, body)
    }

    /// Reply to this message within the same dialogue
    pub fn reply(&self, body: Body) -> Self {
        Self {
            protocol_id: self.protocol_id,
            dialogue_reference: self.dialogue_reference.clone(),
            // ids are host-supplied; the successor of i64::MAX wraps
            message_id: self.message_id.wrapping_add(1),
            target: self.message_id,
            body,
        }
    }

    pub fn protocol_id(&self) -> ProtocolId {
        self.protocol_id
    }

    pub fn dialogue_reference(&self) -> &DialogueReference {
        &self.dialogue_reference
    }

    pub fn message_id(&self) -> i64 {
        self.message_id
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn performative(&self) -> Performative {
        self.body.performative()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}
