//! Replicated ledger core.
//!
//! A ledger is an ordered list that many replicas append to and, in the
//! clearable variant, wipe. Ordering is not decided here: once a ledger is
//! attached, every mutation round-trips through an external sequencer and is
//! applied only when delivered back, in the one global order every replica
//! sees. Before attach, the ledger is a plain local list and operations apply
//! immediately.
//!
//! This crate provides:
//! - [`Ledger`] and [`ClearableLedger`], built on one shared state machine
//! - [`SharedChannel`], the capability set a hosting runtime drives
//!   (attach, summarize, load, process delivered messages)
//! - [`LedgerFactory`] for creating fresh channels or loading them from a
//!   snapshot store
//! - Single-blob snapshot encoding (a JSON array of codec payloads)
//! - Per-instance `append` / `clear` subscriptions

mod base;
pub mod channel;
pub mod clearable;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod ledger;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use channel::SharedChannel;
pub use clearable::ClearableLedger;
pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use events::{LedgerEventKind, SubscriptionId};
pub use factory::{
    ChannelAttributes, LedgerChannel, LedgerFactory, CLEARABLE_LEDGER_TYPE, LEDGER_TYPE,
    PACKAGE_VERSION, SNAPSHOT_FORMAT_VERSION,
};
pub use ledger::Ledger;

pub use dledger_codec::{JsonCodec, ValueCodec};
pub use dledger_types::{AttachState, LedgerOperation, SequencedMessage};
