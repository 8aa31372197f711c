use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use dledger_codec::{JsonCodec, ValueCodec};
use dledger_store::{SnapshotStore, SummaryBlob};
use dledger_types::{AttachState, DeltaConnection, LedgerOperation, SequencedMessage};

use crate::base::LedgerCore;
use crate::channel::SharedChannel;
use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::events::{LedgerEventKind, SubscriptionId};
use crate::factory::{ChannelAttributes, LedgerChannel, LEDGER_TYPE};

/// Append-only replicated list.
///
/// Detached, `append` applies immediately. Attached, it only submits; the
/// value shows up in [`get`](Self::get) and reaches `append` listeners once
/// the sequencer delivers it back through [`SharedChannel::process`].
pub struct Ledger<T, C = JsonCodec> {
    pub(crate) core: LedgerCore<T, C>,
}

impl<T, C: ValueCodec<T>> Ledger<T, C> {
    /// Create a detached, empty append-only ledger with default configuration.
    pub fn new(id: impl Into<String>, codec: C) -> Self {
        Self::with_config(
            id,
            ChannelAttributes::for_type(LEDGER_TYPE),
            LedgerConfig::default(),
            codec,
        )
    }

    /// Create a detached, empty ledger with explicit attributes and configuration.
    pub fn with_config(
        id: impl Into<String>,
        attributes: ChannelAttributes,
        config: LedgerConfig,
        codec: C,
    ) -> Self {
        Self {
            core: LedgerCore::new(id.into(), attributes, config, codec),
        }
    }

    /// Append `value` to the end of the list.
    pub fn append(&mut self, value: &T) -> LedgerResult<()> {
        let op = self.core.encode_append(value)?;
        if let Some(op) = self.core.route(op)? {
            self.handle_op(&op)?;
        }
        Ok(())
    }

    /// Iterate the list as it is now.
    pub fn get(&self) -> std::slice::Iter<'_, T> {
        self.core.values().iter()
    }

    /// Number of values currently in the list.
    pub fn len(&self) -> usize {
        self.core.values().len()
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.core.values().is_empty()
    }

    /// Register a listener fired with each value as it becomes the last
    /// element.
    pub fn on_append(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.core.subscriptions.on_append(listener)
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.core.subscriptions.unsubscribe(id)
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: LedgerEventKind) -> usize {
        self.core.subscriptions.count(kind)
    }

    pub(crate) fn handle_op(&mut self, op: &LedgerOperation) -> LedgerResult<()> {
        match op {
            LedgerOperation::Append { value } => self.core.apply_append(value),
            LedgerOperation::Clear => Err(self.core.unsupported(op)),
        }
    }
}

impl<T, C> fmt::Debug for Ledger<T, C>
where
    C: ValueCodec<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("id", &self.core.id())
            .field("state", &self.core.attach_state())
            .field("len", &self.len())
            .finish()
    }
}

#[async_trait(?Send)]
impl<T, C: ValueCodec<T>> SharedChannel for Ledger<T, C> {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn attributes(&self) -> &ChannelAttributes {
        self.core.attributes()
    }

    fn attach_state(&self) -> AttachState {
        self.core.attach_state()
    }

    fn attach(&mut self, connection: Box<dyn DeltaConnection>) -> LedgerResult<()> {
        self.core.attach(connection)
    }

    fn initialize_local(&mut self) -> LedgerResult<()> {
        self.core.initialize_local()
    }

    fn summarize(&self) -> LedgerResult<SummaryBlob> {
        self.core.summarize()
    }

    async fn load(&mut self, store: &dyn SnapshotStore) -> LedgerResult<()> {
        self.core.load(store).await
    }

    fn process(&mut self, message: &SequencedMessage) -> LedgerResult<()> {
        if let Some(op) = self.core.accept_delivery(message)? {
            self.handle_op(&op)?;
        }
        Ok(())
    }

    fn apply_stashed_op(&mut self, _contents: &Value) -> LedgerResult<()> {
        Err(self.core.reject_stashed())
    }
}

impl<T, C: ValueCodec<T>> LedgerChannel for Ledger<T, C> {
    type Codec = C;
    const TYPE: &'static str = LEDGER_TYPE;

    fn construct(id: String, attributes: ChannelAttributes, config: LedgerConfig, codec: C) -> Self {
        Self::with_config(id, attributes, config, codec)
    }
}
