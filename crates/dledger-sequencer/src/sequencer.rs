use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use dledger_types::{ClientId, MessageKind, SequencedMessage};

use crate::connection::SequencerConnection;

/// A submission waiting for a global position.
#[derive(Clone, Debug)]
pub(crate) struct Submission {
    pub client_id: ClientId,
    pub client_sequence_number: u64,
    pub kind: MessageKind,
    pub contents: Value,
}

/// Per-client bookkeeping.
#[derive(Default)]
pub(crate) struct ClientState {
    pub connected: bool,
    pub next_client_sequence_number: u64,
    /// Operations submitted but not yet sequenced, in submission order.
    pub unacked: VecDeque<(u64, Value)>,
    /// Highest client sequence number already sequenced.
    pub acked_through: u64,
    /// Sequenced messages not yet delivered to this client.
    pub inbound: VecDeque<SequencedMessage>,
}

#[derive(Default)]
pub(crate) struct SequencerState {
    pub last_sequence_number: u64,
    pub queue: VecDeque<Submission>,
    pub clients: BTreeMap<ClientId, ClientState>,
}

impl SequencerState {
    pub(crate) fn enqueue_membership(&mut self, client_id: ClientId, kind: MessageKind) {
        self.queue.push_back(Submission {
            client_id,
            client_sequence_number: 0,
            kind,
            contents: Value::Null,
        });
    }

    /// Stamp a submission and fan it out. Returns `None` for a duplicate of an
    /// already-sequenced operation.
    fn sequence(&mut self, submission: Submission) -> Option<SequencedMessage> {
        if submission.kind == MessageKind::Operation {
            let client = self.clients.get_mut(&submission.client_id)?;
            if submission.client_sequence_number <= client.acked_through {
                warn!(
                    client = %submission.client_id.short_id(),
                    csn = submission.client_sequence_number,
                    "dropping duplicate submission"
                );
                return None;
            }
            client
                .unacked
                .retain(|(csn, _)| *csn != submission.client_sequence_number);
            client.acked_through = submission.client_sequence_number;
        }

        self.last_sequence_number += 1;
        let message = SequencedMessage {
            sequence_number: self.last_sequence_number,
            client_id: submission.client_id,
            client_sequence_number: submission.client_sequence_number,
            kind: submission.kind,
            contents: submission.contents,
        };

        for client in self.clients.values_mut() {
            client.inbound.push_back(message.clone());
        }

        debug!(
            seq = message.sequence_number,
            client = %message.client_id.short_id(),
            kind = ?message.kind,
            "message sequenced"
        );
        Some(message)
    }
}

/// Total-order sequencer shared by every connected replica in one process.
///
/// Single-threaded: connections hold an `Rc` to the shared state, so the
/// sequencer and all its clients live on one thread, matching the cooperative
/// execution model of the ledgers they serve.
#[derive(Clone, Default)]
pub struct LocalSequencer {
    state: Rc<RefCell<SequencerState>>,
}

impl LocalSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client, connected, and announce it with a join message.
    pub fn connect(&self) -> SequencerConnection {
        let client_id = ClientId::new();
        let mut state = self.state.borrow_mut();
        state.clients.insert(
            client_id,
            ClientState {
                connected: true,
                ..Default::default()
            },
        );
        state.enqueue_membership(client_id, MessageKind::ClientJoin);
        info!(client = %client_id.short_id(), "client connected");
        SequencerConnection::new(client_id, Rc::clone(&self.state))
    }

    /// Sequence the oldest queued submission.
    pub fn sequence_next(&self) -> Option<SequencedMessage> {
        let mut state = self.state.borrow_mut();
        while let Some(submission) = state.queue.pop_front() {
            if let Some(message) = state.sequence(submission) {
                return Some(message);
            }
        }
        None
    }

    /// Sequence the oldest queued submission from `client`, skipping ahead of
    /// other clients' submissions.
    pub fn sequence_next_from(&self, client: &ClientId) -> Option<SequencedMessage> {
        let mut state = self.state.borrow_mut();
        loop {
            let index = state.queue.iter().position(|s| &s.client_id == client)?;
            let submission = state.queue.remove(index)?;
            if let Some(message) = state.sequence(submission) {
                return Some(message);
            }
        }
    }

    /// Sequence everything currently queued. Returns the number of messages
    /// stamped.
    pub fn sequence_all(&self) -> usize {
        let mut count = 0;
        while self.sequence_next().is_some() {
            count += 1;
        }
        count
    }

    /// Submissions waiting for a global position.
    pub fn queued_count(&self) -> usize {
        self.state.borrow().queue.len()
    }

    pub fn client_count(&self) -> usize {
        self.state.borrow().clients.len()
    }

    pub fn last_sequence_number(&self) -> u64 {
        self.state.borrow().last_sequence_number
    }
}

impl std::fmt::Debug for LocalSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LocalSequencer")
            .field("clients", &state.clients.len())
            .field("queued", &state.queue.len())
            .field("last_sequence_number", &state.last_sequence_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dledger_types::DeltaConnection;
    use serde_json::json;

    fn operations(conn: &SequencerConnection) -> Vec<SequencedMessage> {
        let mut out = Vec::new();
        conn.deliver(|msg| {
            if msg.is_operation() {
                out.push(msg.clone());
            }
            Ok::<(), ()>(())
        })
        .unwrap();
        out
    }

    #[test]
    fn connect_announces_join() {
        let sequencer = LocalSequencer::new();
        let conn = sequencer.connect();
        assert_eq!(sequencer.client_count(), 1);
        assert_eq!(sequencer.sequence_all(), 1);

        let mut kinds = Vec::new();
        conn.deliver(|msg| {
            kinds.push(msg.kind);
            Ok::<(), ()>(())
        })
        .unwrap();
        assert_eq!(kinds, vec![MessageKind::ClientJoin]);
    }

    #[test]
    fn every_client_sees_the_same_order() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let b = sequencer.connect();

        a.submit(json!({"n": 1})).unwrap();
        b.submit(json!({"n": 2})).unwrap();
        a.submit(json!({"n": 3})).unwrap();
        sequencer.sequence_all();

        let seen_a = operations(&a);
        let seen_b = operations(&b);
        assert_eq!(seen_a, seen_b);
        let contents: Vec<_> = seen_a.iter().map(|m| m.contents["n"].clone()).collect();
        assert_eq!(contents, vec![json!(1), json!(2), json!(3)]);
        assert!(seen_a
            .windows(2)
            .all(|w| w[0].sequence_number < w[1].sequence_number));
    }

    #[test]
    fn submitter_receives_its_own_operation() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let csn = a.submit(json!("mine")).unwrap();
        assert_eq!(csn, 1);
        sequencer.sequence_all();

        let seen = operations(&a);
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_local(&a.client_id()));
        assert_eq!(seen[0].client_sequence_number, 1);
        assert_eq!(a.pending_count(), 0);
    }

    #[test]
    fn sequence_next_from_overrides_submission_order() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let b = sequencer.connect();
        sequencer.sequence_all();

        a.submit(json!("first-submitted")).unwrap();
        b.submit(json!("second-submitted")).unwrap();

        sequencer.sequence_next_from(&b.client_id()).unwrap();
        sequencer.sequence_all();

        let seen: Vec<_> = operations(&a).into_iter().map(|m| m.contents).collect();
        assert_eq!(seen, vec![json!("second-submitted"), json!("first-submitted")]);
    }

    #[test]
    fn disconnected_submission_waits_for_reconnect() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let b = sequencer.connect();
        sequencer.sequence_all();

        a.set_connected(false);
        a.submit(json!("offline")).unwrap();
        sequencer.sequence_all();
        assert!(operations(&b).is_empty());
        assert_eq!(a.pending_count(), 1);

        a.set_connected(true);
        sequencer.sequence_all();
        assert_eq!(operations(&a).len(), 1);
        assert_eq!(operations(&b).len(), 1);
        assert_eq!(a.pending_count(), 0);
    }

    #[test]
    fn in_flight_submission_is_resent_exactly_once() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let b = sequencer.connect();

        a.submit(json!("v1")).unwrap();
        a.submit(json!("v2")).unwrap();
        a.set_connected(false);
        a.set_connected(true);
        sequencer.sequence_all();

        let seen: Vec<_> = operations(&b).into_iter().map(|m| m.contents).collect();
        assert_eq!(seen, vec![json!("v1"), json!("v2")]);
    }

    #[test]
    fn disconnected_client_catches_up_on_reconnect() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        let b = sequencer.connect();
        sequencer.sequence_all();
        operations(&a);

        a.set_connected(false);
        b.submit(json!("while-away")).unwrap();
        sequencer.sequence_all();
        assert!(operations(&a).is_empty());

        a.set_connected(true);
        sequencer.sequence_all();
        let seen: Vec<_> = operations(&a).into_iter().map(|m| m.contents).collect();
        assert_eq!(seen, vec![json!("while-away")]);
    }

    #[test]
    fn duplicate_submission_is_dropped() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        a.submit(json!("once")).unwrap();

        let duplicate = sequencer.state.borrow().queue.back().cloned().unwrap();
        sequencer.state.borrow_mut().queue.push_back(duplicate);

        sequencer.sequence_all();
        assert_eq!(operations(&a).len(), 1);
    }

    #[test]
    fn deliver_stops_at_first_error() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        sequencer.sequence_all();
        operations(&a);

        a.submit(json!("bad")).unwrap();
        a.submit(json!("good")).unwrap();
        sequencer.sequence_all();

        let err = a
            .deliver(|msg| {
                if msg.contents == json!("bad") {
                    Err("rejected")
                } else {
                    Ok(())
                }
            })
            .unwrap_err();
        assert_eq!(err, "rejected");
        assert_eq!(a.inbound_count(), 1);
        assert_eq!(operations(&a)[0].contents, json!("good"));
    }

    #[test]
    fn last_sequence_number_advances() {
        let sequencer = LocalSequencer::new();
        let a = sequencer.connect();
        a.submit(json!(1)).unwrap();
        assert_eq!(sequencer.queued_count(), 2);
        sequencer.sequence_all();
        assert_eq!(sequencer.last_sequence_number(), 2);
        assert_eq!(sequencer.queued_count(), 0);
    }
}
