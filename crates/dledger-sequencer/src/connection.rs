use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use dledger_types::{ClientId, ConnectionError, DeltaConnection, MessageKind, SequencedMessage};

use crate::sequencer::{SequencerState, Submission};

/// One client's handle on a [`LocalSequencer`](crate::LocalSequencer).
///
/// Cloning yields another handle to the same client, so a host can give one
/// clone to a ledger for submission and keep another to drive delivery.
#[derive(Clone)]
pub struct SequencerConnection {
    client_id: ClientId,
    state: Rc<RefCell<SequencerState>>,
}

impl SequencerConnection {
    pub(crate) fn new(client_id: ClientId, state: Rc<RefCell<SequencerState>>) -> Self {
        Self { client_id, state }
    }

    /// Flip connectivity.
    ///
    /// Going offline pulls this client's not-yet-sequenced operations out of
    /// the global queue. Coming back online resubmits every unacknowledged
    /// operation in original order.
    pub fn set_connected(&self, connected: bool) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(client) = state.clients.get_mut(&self.client_id) else {
            return;
        };
        if client.connected == connected {
            return;
        }
        client.connected = connected;

        if connected {
            let resubmit: Vec<Submission> = client
                .unacked
                .iter()
                .map(|(csn, contents)| Submission {
                    client_id: self.client_id,
                    client_sequence_number: *csn,
                    kind: MessageKind::Operation,
                    contents: contents.clone(),
                })
                .collect();
            state.enqueue_membership(self.client_id, MessageKind::ClientJoin);
            info!(
                client = %self.client_id.short_id(),
                resubmitted = resubmit.len(),
                "client reconnected"
            );
            state.queue.extend(resubmit);
        } else {
            let client_id = self.client_id;
            state.queue.retain(|s| {
                !(s.client_id == client_id && s.kind == MessageKind::Operation)
            });
            state.enqueue_membership(self.client_id, MessageKind::ClientLeave);
            info!(client = %self.client_id.short_id(), "client disconnected");
        }
    }

    /// Operations submitted by this client that have not been sequenced yet.
    pub fn pending_count(&self) -> usize {
        self.state
            .borrow()
            .clients
            .get(&self.client_id)
            .map(|c| c.unacked.len())
            .unwrap_or(0)
    }

    /// Sequenced messages waiting to be delivered to this client.
    pub fn inbound_count(&self) -> usize {
        self.state
            .borrow()
            .clients
            .get(&self.client_id)
            .map(|c| c.inbound.len())
            .unwrap_or(0)
    }

    /// Drain sequenced messages into `handler`, in global order.
    ///
    /// Nothing is delivered while disconnected. The handler runs with no
    /// sequencer borrow held, so it may submit new operations. Delivery stops
    /// at the first handler error; that message is consumed and later ones
    /// stay queued. Returns the number of messages handled.
    pub fn deliver<F, E>(&self, mut handler: F) -> Result<usize, E>
    where
        F: FnMut(&SequencedMessage) -> Result<(), E>,
    {
        let mut delivered = 0;
        while let Some(message) = self.next_inbound() {
            handler(&message)?;
            delivered += 1;
        }
        if delivered > 0 {
            debug!(client = %self.client_id.short_id(), delivered, "inbound drained");
        }
        Ok(delivered)
    }

    fn next_inbound(&self) -> Option<SequencedMessage> {
        let mut state = self.state.borrow_mut();
        let client = state.clients.get_mut(&self.client_id)?;
        if !client.connected {
            return None;
        }
        client.inbound.pop_front()
    }
}

impl DeltaConnection for SequencerConnection {
    fn client_id(&self) -> ClientId {
        self.client_id
    }

    fn is_connected(&self) -> bool {
        self.state
            .borrow()
            .clients
            .get(&self.client_id)
            .is_some_and(|c| c.connected)
    }

    fn submit(&self, contents: Value) -> Result<u64, ConnectionError> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let client = state
            .clients
            .get_mut(&self.client_id)
            .ok_or(ConnectionError::UnknownClient(self.client_id))?;

        client.next_client_sequence_number += 1;
        let csn = client.next_client_sequence_number;
        client.unacked.push_back((csn, contents.clone()));

        if client.connected {
            state.queue.push_back(Submission {
                client_id: self.client_id,
                client_sequence_number: csn,
                kind: MessageKind::Operation,
                contents,
            });
        }
        debug!(client = %self.client_id.short_id(), csn, "operation submitted");
        Ok(csn)
    }
}

impl std::fmt::Debug for SequencerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencerConnection")
            .field("client_id", &self.client_id)
            .finish()
    }
}
