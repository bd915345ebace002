use std::collections::HashMap;

use log::{error, warn};

use super::ProtocolInterface;
use crate::error::ProtocolError;
use crate::messages::{Body, Envelope, ErrorCode, Message, ProtocolId};
use crate::registry::AdapterRegistry;

/// Routes messages to the interface of their protocol
#[derive(Default)]
pub struct InterfaceRegistry {
    interfaces: HashMap<ProtocolId, ProtocolInterface>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard interface of every protocol
    pub fn standard() -> Self {
        ProtocolId::ALL
            .into_iter()
            .fold(Self::new(), |registry, protocol_id| {
                registry.with_interface(ProtocolInterface::standard(protocol_id))
            })
    }

    /// Register an interface, returning the one it replaces
    pub fn register(&mut self, interface: ProtocolInterface) -> Option<ProtocolInterface> {
        self.interfaces.insert(interface.protocol_id(), interface)
    }

    pub fn with_interface(mut self, interface: ProtocolInterface) -> Self {
        self.register(interface);
        self
    }

    pub fn get(&self, protocol_id: ProtocolId) -> Option<&ProtocolInterface> {
        self.interfaces.get(&protocol_id)
    }

    /// Admit an inbound message
    pub fn validate(&self, message: &Message) -> Result<(), ProtocolError> {
        let interface = self
            .get(message.protocol_id())
            .ok_or(ProtocolError::UnknownProtocol(message.protocol_id()))?;
        interface.validate(message)?;
        Ok(())
    }

    /// Handle a validated message
    pub async fn handle(&self, message: &Message, adapters: &AdapterRegistry) -> Option<Message> {
        match self.get(message.protocol_id()) {
            Some(interface) => interface.handle(message, adapters).await,
            None => Some(self.reject(
                message,
                &ProtocolError::UnknownProtocol(message.protocol_id()),
            )),
        }
    }

    /// ERROR reply for a message that failed validation
    pub fn reject(&self, message: &Message, err: &ProtocolError) -> Message {
        message.reply(Body::error(err.code(), err.to_string()))
    }

    /// Wrap a response addressed back to the request's sender
    pub fn build_envelope(&self, request: &Envelope, response: Option<Message>) -> Option<Envelope> {
        response.map(|message| request.reply(message))
    }

    /// Validate, handle and address the reply to one envelope
    pub async fn route(&self, envelope: &Envelope, adapters: &AdapterRegistry) -> Option<Envelope> {
        let message = envelope.message();
        let response = match self.validate(message) {
            Ok(()) => self.handle(message, adapters).await,
            Err(err) => {
                warn!("Rejected message from {}: {}", envelope.sender(), err);
                Some(self.reject(message, &err))
            }
        };
        self.build_envelope(envelope, response)
    }

    /// EXCHANGE_ERROR reply for a request whose handling broke down
    ///
    /// The request's dialogue is discarded.
    pub fn fail(&self, envelope: &Envelope, reason: &str) -> Envelope {
        let message = envelope.message();
        error!(
            "Request {} in dialogue {} failed: {}",
            message.performative(),
            message.dialogue_reference(),
            reason
        );
        if let Some(interface) = self.get(message.protocol_id()) {
            interface.dialogues().discard(message.dialogue_reference());
        }
        let body = match message.body().venue() {
            Some(venue) => Body::venue_error(ErrorCode::ExchangeError, reason, &venue),
            None => Body::error(ErrorCode::ExchangeError, reason),
        };
        envelope.reply(message.reply(body))
    }

    /// Forget the dialogue of a request that will not be answered
    pub fn discard(&self, message: &Message) {
        if let Some(interface) = self.get(message.protocol_id()) {
            interface.dialogues().discard(message.dialogue_reference());
        }
    }
}
