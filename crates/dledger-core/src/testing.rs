//! Multi-replica harness over the in-process sequencer.

use std::cell::RefCell;
use std::rc::Rc;

use dledger_sequencer::{LocalSequencer, SequencerConnection};

use crate::channel::SharedChannel;
use crate::error::LedgerResult;

/// Connect a new client and attach `channel` to it. The returned handle
/// drives delivery.
pub(crate) fn attach<L: SharedChannel>(
    sequencer: &LocalSequencer,
    channel: &mut L,
) -> SequencerConnection {
    let connection = sequencer.connect();
    channel
        .attach(Box::new(connection.clone()))
        .expect("fresh channel attaches");
    connection
}

/// Deliver everything sequenced for `connection` into `channel`.
pub(crate) fn pump<L: SharedChannel>(
    connection: &SequencerConnection,
    channel: &mut L,
) -> LedgerResult<usize> {
    connection.deliver(|message| channel.process(message))
}

/// A listener that records every value it sees.
pub(crate) fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
}

mod convergence {
    use super::*;
    use crate::clearable::ClearableLedger;
    use crate::error::LedgerError;
    use dledger_codec::JsonCodec;
    use dledger_types::{DeltaConnection, LedgerOperation};
    use proptest::prelude::*;

    const REPLICAS: usize = 3;

    #[derive(Clone, Debug)]
    enum Step {
        Append(usize, u32),
        Clear(usize),
        SequenceOne,
        Deliver(usize),
        Toggle(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => (0..REPLICAS, any::<u32>()).prop_map(|(r, v)| Step::Append(r, v)),
            1 => (0..REPLICAS).prop_map(Step::Clear),
            3 => Just(Step::SequenceOne),
            2 => (0..REPLICAS).prop_map(Step::Deliver),
            1 => (0..REPLICAS).prop_map(Step::Toggle),
        ]
    }

    /// The list obtained by replaying the global order by hand.
    fn replay(observer: &SequencerConnection) -> Vec<u32> {
        let mut list = Vec::new();
        observer
            .deliver(|message| {
                if !message.is_operation() {
                    return Ok::<(), LedgerError>(());
                }
                match LedgerOperation::from_contents(&message.contents)? {
                    LedgerOperation::Append { value } => {
                        list.push(serde_json::from_value::<u32>(value).unwrap())
                    }
                    LedgerOperation::Clear => list.clear(),
                }
                Ok(())
            })
            .unwrap();
        list
    }

    proptest! {
        #[test]
        fn replicas_converge_on_the_delivery_order(steps in prop::collection::vec(step(), 0..60)) {
            let sequencer = LocalSequencer::new();
            let observer = sequencer.connect();
            let mut ledgers: Vec<ClearableLedger<u32>> = (0..REPLICAS)
                .map(|_| ClearableLedger::new("prop", JsonCodec))
                .collect();
            let conns: Vec<SequencerConnection> = ledgers
                .iter_mut()
                .map(|l| attach(&sequencer, l))
                .collect();

            for step in steps {
                match step {
                    Step::Append(r, v) => ledgers[r].append(&v).unwrap(),
                    Step::Clear(r) => ledgers[r].clear().unwrap(),
                    Step::SequenceOne => {
                        sequencer.sequence_next();
                    }
                    Step::Deliver(r) => {
                        pump(&conns[r], &mut ledgers[r]).unwrap();
                    }
                    Step::Toggle(r) => {
                        let online = conns[r].is_connected();
                        conns[r].set_connected(!online);
                    }
                }
            }

            for conn in &conns {
                conn.set_connected(true);
            }
            sequencer.sequence_all();
            for (conn, ledger) in conns.iter().zip(ledgers.iter_mut()) {
                pump(conn, ledger).unwrap();
                prop_assert_eq!(conn.pending_count(), 0);
            }

            let expected = replay(&observer);
            for ledger in &ledgers {
                prop_assert_eq!(ledger.get().copied().collect::<Vec<u32>>(), expected.clone());
            }
        }
    }
}
