//! Dialogue tracking

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::contract::DialogueContract;
use crate::error::ProtocolError;
use crate::messages::{DialogueReference, Performative};

/// Party that sent a dialogue's latest message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Strategy opening requests
    Agent,
    /// Gateway answering them
    Connection,
}

/// State of one open conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialogue {
    pub label: DialogueReference,
    /// Performative of the most recent message
    pub last: Performative,
    /// Sender of `last`
    pub role: Role,
}

/// Open dialogues of one protocol
///
/// Dialogues are created by an initial performative and evicted as soon as
/// a terminal one is recorded.
pub struct DialogueStore {
    contract: &'static DialogueContract,
    dialogues: DashMap<DialogueReference, Dialogue>,
}

impl DialogueStore {
    pub fn new(contract: &'static DialogueContract) -> Self {
        Self {
            contract,
            dialogues: DashMap::new(),
        }
    }

    pub fn contract(&self) -> &'static DialogueContract {
        self.contract
    }

    /// Check a performative against the dialogue state without recording it
    pub fn check(
        &self,
        reference: &DialogueReference,
        performative: Performative,
    ) -> Result<(), ProtocolError> {
        let previous = self.dialogues.get(reference).map(|d| d.last);
        self.admit(previous, performative)
    }

    /// Record a performative, creating, advancing or closing the dialogue
    ///
    /// Returns the dialogue state after the update. Nothing is recorded on
    /// failure.
    pub fn update(
        &self,
        reference: &DialogueReference,
        performative: Performative,
    ) -> Result<Dialogue, ProtocolError> {
        match self.dialogues.entry(reference.clone()) {
            Entry::Vacant(entry) => {
                self.admit(None, performative)?;
                let dialogue = Dialogue {
                    label: reference.clone(),
                    last: performative,
                    role: self.sender_of(performative),
                };
                if !self.contract.is_terminal(performative) {
                    entry.insert(dialogue.clone());
                }
                Ok(dialogue)
            }
            Entry::Occupied(mut entry) => {
                self.admit(Some(entry.get().last), performative)?;
                if self.contract.is_terminal(performative) {
                    let mut dialogue = entry.remove();
                    dialogue.last = performative;
                    dialogue.role = self.sender_of(performative);
                    Ok(dialogue)
                } else {
                    let dialogue = entry.get_mut();
                    dialogue.last = performative;
                    dialogue.role = self.sender_of(performative);
                    Ok(dialogue.clone())
                }
            }
        }
    }

    /// Forget a dialogue whose reply will never be recorded
    pub fn discard(&self, reference: &DialogueReference) -> Option<Dialogue> {
        self.dialogues.remove(reference).map(|(_, dialogue)| dialogue)
    }

    pub fn get(&self, reference: &DialogueReference) -> Option<Dialogue> {
        self.dialogues.get(reference).map(|d| d.clone())
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    // Agents open dialogues, the gateway answers them
    fn sender_of(&self, performative: Performative) -> Role {
        if self.contract.is_initial(performative) {
            Role::Agent
        } else {
            Role::Connection
        }
    }

    fn admit(
        &self,
        previous: Option<Performative>,
        performative: Performative,
    ) -> Result<(), ProtocolError> {
        let allowed = match previous {
            None => self.contract.is_initial(performative),
            Some(last) => self.contract.is_valid_reply(last, performative),
        };
        if allowed {
            Ok(())
        } else {
            Err(ProtocolError::InvalidDialogue {
                protocol: self.contract.protocol_id,
                performative,
                previous,
            })
        }
    }
}
