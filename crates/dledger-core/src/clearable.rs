use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use dledger_codec::{JsonCodec, ValueCodec};
use dledger_store::{SnapshotStore, SummaryBlob};
use dledger_types::{AttachState, DeltaConnection, LedgerOperation, SequencedMessage};

use crate::channel::SharedChannel;
use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::events::{LedgerEventKind, SubscriptionId};
use crate::factory::{ChannelAttributes, LedgerChannel, CLEARABLE_LEDGER_TYPE};
use crate::ledger::Ledger;

/// A [`Ledger`] that can also be wiped.
///
/// `clear` follows the same two-path rule as `append`: immediate while
/// detached, applied on delivery while attached. Listeners registered with
/// [`on_clear`](Self::on_clear) receive the contents as they were just before
/// the wipe.
pub struct ClearableLedger<T, C = JsonCodec> {
    inner: Ledger<T, C>,
}

impl<T, C: ValueCodec<T>> ClearableLedger<T, C> {
    /// Create a detached, empty clearable ledger with default configuration.
    pub fn new(id: impl Into<String>, codec: C) -> Self {
        Self::with_config(
            id,
            ChannelAttributes::for_type(CLEARABLE_LEDGER_TYPE),
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
            inner: Ledger::with_config(id, attributes, config, codec),
        }
    }

    /// Append `value` to the end of the list.
    pub fn append(&mut self, value: &T) -> LedgerResult<()> {
        let op = self.inner.core.encode_append(value)?;
        if let Some(op) = self.inner.core.route(op)? {
            self.handle_op(&op)?;
        }
        Ok(())
    }

    /// Empty the list.
    pub fn clear(&mut self) -> LedgerResult<()> {
        if let Some(op) = self.inner.core.route(LedgerOperation::Clear)? {
            self.handle_op(&op)?;
        }
        Ok(())
    }

    /// Iterate the list as it is now.
    pub fn get(&self) -> std::slice::Iter<'_, T> {
        self.inner.get()
    }

    /// Number of values currently in the list.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Register a listener fired with each appended value.
    pub fn on_append(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.inner.on_append(listener)
    }

    /// Register a listener fired with the pre-clear contents on every clear.
    pub fn on_clear(&mut self, listener: impl FnMut(&[T]) + 'static) -> SubscriptionId {
        self.inner.core.subscriptions.on_clear(listener)
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: LedgerEventKind) -> usize {
        self.inner.listener_count(kind)
    }

    fn handle_op(&mut self, op: &LedgerOperation) -> LedgerResult<()> {
        match op {
            LedgerOperation::Clear => {
                self.inner.core.apply_clear();
                Ok(())
            }
            _ => self.inner.handle_op(op),
        }
    }
}

impl<T, C> fmt::Debug for ClearableLedger<T, C>
where
    C: ValueCodec<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearableLedger")
            .field("id", &self.inner.core.id())
            .field("state", &self.inner.core.attach_state())
            .field("len", &self.len())
            .finish()
    }
}

#[async_trait(?Send)]
impl<T, C: ValueCodec<T>> SharedChannel for ClearableLedger<T, C> {
    fn id(&self) -> &str {
        self.inner.core.id()
    }

    fn attributes(&self) -> &ChannelAttributes {
        self.inner.core.attributes()
    }

    fn attach_state(&self) -> AttachState {
        self.inner.core.attach_state()
    }

    fn attach(&mut self, connection: Box<dyn DeltaConnection>) -> LedgerResult<()> {
        self.inner.core.attach(connection)
    }

    fn initialize_local(&mut self) -> LedgerResult<()> {
        self.inner.core.initialize_local()
    }

    fn summarize(&self) -> LedgerResult<SummaryBlob> {
        self.inner.core.summarize()
    }

    async fn load(&mut self, store: &dyn SnapshotStore) -> LedgerResult<()> {
        self.inner.core.load(store).await
    }

    fn process(&mut self, message: &SequencedMessage) -> LedgerResult<()> {
        if let Some(op) = self.inner.core.accept_delivery(message)? {
            self.handle_op(&op)?;
        }
        Ok(())
    }

    fn apply_stashed_op(&mut self, _contents: &Value) -> LedgerResult<()> {
        Err(self.inner.core.reject_stashed())
    }
}

impl<T, C: ValueCodec<T>> LedgerChannel for ClearableLedger<T, C> {
    type Codec = C;
    const TYPE: &'static str = CLEARABLE_LEDGER_TYPE;

    fn construct(id: String, attributes: ChannelAttributes, config: LedgerConfig, codec: C) -> Self {
        Self::with_config(id, attributes, config, codec)
    }
}
