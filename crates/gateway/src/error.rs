//! Error types for the gateway crate

use mercury_core::VenueId;
use thiserror::Error;

use crate::messages::{ErrorCode, Performative, ProtocolId};

/// Protocol-level errors raised while validating an inbound message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("No interface registered for protocol {0}")]
    UnknownProtocol(ProtocolId),

    #[error("Performative {performative} is not recognized by protocol {protocol}")]
    UnrecognizedPerformative {
        protocol: ProtocolId,
        performative: Performative,
    },

    #[error(
        "Performative {performative} is not a valid continuation of {} in protocol {protocol}",
        continuation_of(.previous)
    )]
    InvalidDialogue {
        protocol: ProtocolId,
        performative: Performative,
        previous: Option<Performative>,
    },
}

impl ProtocolError {
    /// Wire code of the ERROR reply for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::UnknownProtocol(_) => ErrorCode::UnknownProtocol,
            ProtocolError::UnrecognizedPerformative { .. } => ErrorCode::UnrecognizedPerformative,
            ProtocolError::InvalidDialogue { .. } => ErrorCode::InvalidDialogue,
        }
    }
}

fn continuation_of(previous: &Option<Performative>) -> &'static str {
    previous.map_or("an empty dialogue", |p| p.as_str())
}

/// Configuration errors, fatal to `connect`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("Venue {venue} requires credential `{field}`")]
    MissingCredentials { venue: String, field: &'static str },

    #[error("Venue {0} is configured more than once")]
    DuplicateVenue(VenueId),

    #[error("Invalid options for venue {venue}: {reason}")]
    InvalidOptions { venue: String, reason: String },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gateway-level errors (connection operations)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection is not connected")]
    NotConnected,
}
