//! Protocol interfaces
//!
//! One [`ProtocolInterface`] per protocol validates inbound messages against
//! its dialogue contract and dispatches them to the handler registered for
//! their performative. Handlers resolve nothing themselves: the interface
//! hands them the adapter of the venue the request names.

mod approvals;
mod balances;
mod markets;
mod orders;
mod positions;
mod registry;
mod tickers;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::{debug, error, warn};
use mercury_ports::{ExchangeAdapter, VenueError, VenueResult};

use crate::error::ProtocolError;
use crate::messages::{Body, ErrorCode, Message, Performative, ProtocolId};
use crate::protocols::{Dialogue, DialogueContract, DialogueStore};
use crate::registry::AdapterRegistry;

pub use registry::InterfaceRegistry;

/// Future returned by a handler
///
/// `Ok(None)` means the handler delivered its reply by other means and the
/// dialogue is closed without a reply.
pub type HandlerFuture = Pin<Box<dyn Future<Output = VenueResult<Option<Body>>> + Send>>;

/// Request handler: the venue adapter and the request payload
pub type Handler = fn(Arc<dyn ExchangeAdapter>, Body) -> HandlerFuture;

pub struct ProtocolInterface {
    contract: &'static DialogueContract,
    handlers: HashMap<Performative, Handler>,
    dialogues: DialogueStore,
}

impl ProtocolInterface {
    /// Interface with no handlers
    pub fn new(protocol_id: ProtocolId) -> Self {
        let contract = DialogueContract::for_protocol(protocol_id);
        Self {
            contract,
            handlers: HashMap::new(),
            dialogues: DialogueStore::new(contract),
        }
    }

    /// Interface with the standard handler table of a protocol
    pub fn standard(protocol_id: ProtocolId) -> Self {
        let interface = Self::new(protocol_id);
        match protocol_id {
            ProtocolId::Orders => orders::register(interface),
            ProtocolId::Markets => markets::register(interface),
            ProtocolId::Tickers => tickers::register(interface),
            ProtocolId::Balances => balances::register(interface),
            ProtocolId::Positions => positions::register(interface),
            ProtocolId::Approvals => approvals::register(interface),
        }
    }

    pub fn with_handler(mut self, performative: Performative, handler: Handler) -> Self {
        self.handlers.insert(performative, handler);
        self
    }

    pub fn protocol_id(&self) -> ProtocolId {
        self.contract.protocol_id
    }

    pub fn contract(&self) -> &'static DialogueContract {
        self.contract
    }

    pub fn dialogues(&self) -> &DialogueStore {
        &self.dialogues
    }

    /// Admit an inbound message, opening or advancing its dialogue
    pub fn validate(&self, message: &Message) -> Result<Dialogue, ProtocolError> {
        let performative = message.performative();
        let unrecognized = || ProtocolError::UnrecognizedPerformative {
            protocol: self.contract.protocol_id,
            performative,
        };

        if !self.contract.contains(performative) {
            return Err(unrecognized());
        }
        self.dialogues
            .check(message.dialogue_reference(), performative)?;
        if !self.handlers.contains_key(&performative) {
            return Err(unrecognized());
        }
        self.dialogues
            .update(message.dialogue_reference(), performative)
    }

    /// Run the handler of a validated message and build its reply
    pub async fn handle(&self, message: &Message, adapters: &AdapterRegistry) -> Option<Message> {
        let request = message.performative();
        let Some(handler) = self.handlers.get(&request).copied() else {
            return self.reply(
                message,
                Body::error(
                    ErrorCode::UnrecognizedPerformative,
                    format!("no handler for {}", request),
                ),
            );
        };
        let Some(venue) = message.body().venue() else {
            return self.reply(
                message,
                Body::error(
                    ErrorCode::ExchangeError,
                    format!("{} does not name a venue", request),
                ),
            );
        };
        let Some(adapter) = adapters.get(&venue) else {
            return self.reply(
                message,
                Body::venue_error(
                    ErrorCode::ExchangeNotAvailable,
                    format!("no adapter connected for {}", venue),
                    &venue,
                ),
            );
        };

        debug!(
            "Handling {} for {} in dialogue {}",
            request,
            venue,
            message.dialogue_reference()
        );
        let body = match handler(adapter, message.body().clone()).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                self.dialogues.discard(message.dialogue_reference());
                return None;
            }
            Err(err) => {
                if err.is_classified() {
                    debug!("{} on {} failed: {}", request, venue, err);
                } else {
                    error!("Unclassified failure from {} on {}: {}", venue, request, err);
                }
                failure_body(&err, &venue)
            }
        };

        let replied = body.performative();
        let expected = self.contract.success_reply(request);
        let body = if replied == Performative::Error || Some(replied) == expected {
            body
        } else {
            error!(
                "Handler for {} replied with {} instead of {:?} in protocol {}",
                request,
                replied,
                expected.map(|p| p.as_str()),
                self.contract.protocol_id
            );
            Body::venue_error(
                ErrorCode::ExchangeError,
                format!("{} produced an invalid reply", request),
                &venue,
            )
        };
        self.reply(message, body)
    }

    /// Reply within the message's dialogue, recording the reply
    fn reply(&self, message: &Message, body: Body) -> Option<Message> {
        let reply = message.reply(body);
        if let Err(err) = self
            .dialogues
            .update(reply.dialogue_reference(), reply.performative())
        {
            warn!("Reply not recorded: {}", err);
            self.dialogues.discard(reply.dialogue_reference());
        }
        Some(reply)
    }
}

fn failure_body(err: &VenueError, venue: &mercury_core::VenueId) -> Body {
    Body::venue_error(ErrorCode::from(err.kind()), err.to_string(), venue)
}

/// Error for a handler registered under the wrong performative
fn mismatched(expected: Performative) -> VenueError {
    VenueError::Exchange(format!("handler for {} received another payload", expected))
}
