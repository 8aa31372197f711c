//! The capability set a hosting runtime drives on every ledger.

use async_trait::async_trait;
use serde_json::Value;

use dledger_store::{SnapshotStore, SummaryBlob};
use dledger_types::{AttachState, DeltaConnection, SequencedMessage};

use crate::error::LedgerResult;
use crate::factory::ChannelAttributes;

/// A replicated channel as seen by its host.
///
/// The host owns the connection lifecycle: it calls `attach` once when the
/// channel joins a live session, feeds every sequenced message to `process`
/// in global order, and calls `summarize` whenever it wants a snapshot.
/// Channels are single-threaded, hence `?Send`.
#[async_trait(?Send)]
pub trait SharedChannel {
    /// Channel id, unique within its session.
    fn id(&self) -> &str;

    fn attributes(&self) -> &ChannelAttributes;

    fn attach_state(&self) -> AttachState;

    /// Switch to `Attached`, routing every later mutation through
    /// `connection`. Fails with `AlreadyAttached` on a second call.
    fn attach(&mut self, connection: Box<dyn DeltaConnection>) -> LedgerResult<()>;

    /// Initialize as a brand new, empty channel.
    fn initialize_local(&mut self) -> LedgerResult<()>;

    /// Produce the full-state snapshot blob.
    fn summarize(&self) -> LedgerResult<SummaryBlob>;

    /// Replace the contents with the snapshot held by `store`. Must run before
    /// any operation has been applied.
    async fn load(&mut self, store: &dyn SnapshotStore) -> LedgerResult<()>;

    /// Apply one sequenced message. Only valid while attached.
    fn process(&mut self, message: &SequencedMessage) -> LedgerResult<()>;

    /// Re-apply an operation captured before a restart.
    fn apply_stashed_op(&mut self, contents: &Value) -> LedgerResult<()>;

    /// Connectivity was lost. Resubmission is the connection's job, so the
    /// default does nothing.
    fn on_disconnect(&mut self) {}
}
