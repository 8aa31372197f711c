use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ClientId;

/// Classification of a sequenced message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// A channel operation; `contents` holds the wire operation.
    Operation,
    /// A client (re)joined the session.
    ClientJoin,
    /// A client left the session.
    ClientLeave,
    /// Sequencer keep-alive with no payload.
    NoOp,
}

/// A message after the sequencer assigned it a global position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequencedMessage {
    /// Global position; identical at every replica.
    pub sequence_number: u64,
    /// Submitting client.
    pub client_id: ClientId,
    /// Per-client submission counter, starting at 1. Zero for messages the
    /// sequencer itself originates.
    pub client_sequence_number: u64,
    pub kind: MessageKind,
    pub contents: Value,
}

impl SequencedMessage {
    pub fn is_operation(&self) -> bool {
        self.kind == MessageKind::Operation
    }

    /// Whether this message was submitted by `client`.
    pub fn is_local(&self, client: &ClientId) -> bool {
        &self.client_id == client
    }
}
