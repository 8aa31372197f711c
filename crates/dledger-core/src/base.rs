use serde_json::Value;
use tracing::{debug, info, warn};

use dledger_codec::ValueCodec;
use dledger_store::{read_and_parse, SnapshotStore, SummaryBlob};
use dledger_types::{AttachState, DeltaConnection, LedgerOperation, SequencedMessage};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::events::Subscriptions;
use crate::factory::ChannelAttributes;
use crate::snapshot;

/// Attachment mode. The attached state owns the submit path.
enum Mode {
    Detached,
    Attached(Box<dyn DeltaConnection>),
}

/// State machine shared by every ledger kind.
///
/// Owns the list and decides, per operation, whether it applies now
/// (detached) or is submitted and applied on delivery (attached). The list is
/// only ever changed by `apply_append` / `apply_clear`, which both paths
/// funnel into. Which operation tags are legal is decided by the wrapping
/// ledger type.
pub(crate) struct LedgerCore<T, C> {
    id: String,
    channel: String,
    attributes: ChannelAttributes,
    config: LedgerConfig,
    codec: C,
    values: Vec<T>,
    mode: Mode,
    initialized: bool,
    pub(crate) subscriptions: Subscriptions<T>,
}

impl<T, C: ValueCodec<T>> LedgerCore<T, C> {
    pub(crate) fn new(
        id: String,
        attributes: ChannelAttributes,
        config: LedgerConfig,
        codec: C,
    ) -> Self {
        let channel = config.channel_name(&id);
        Self {
            id,
            channel,
            attributes,
            config,
            codec,
            values: Vec::new(),
            mode: Mode::Detached,
            initialized: false,
            subscriptions: Subscriptions::new(),
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn attributes(&self) -> &ChannelAttributes {
        &self.attributes
    }

    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn attach_state(&self) -> AttachState {
        match self.mode {
            Mode::Detached => AttachState::Detached,
            Mode::Attached(_) => AttachState::Attached,
        }
    }

    /// Take the one-way transition to `Attached`.
    pub(crate) fn attach(&mut self, connection: Box<dyn DeltaConnection>) -> LedgerResult<()> {
        if let Mode::Attached(_) = self.mode {
            return Err(LedgerError::AlreadyAttached);
        }
        info!(
            channel = %self.channel,
            client = %connection.client_id().short_id(),
            len = self.values.len(),
            "ledger attached"
        );
        self.initialized = true;
        self.mode = Mode::Attached(connection);
        Ok(())
    }

    fn ensure_uninitialized(&self) -> LedgerResult<()> {
        if self.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }
        Ok(())
    }

    pub(crate) fn initialize_local(&mut self) -> LedgerResult<()> {
        self.ensure_uninitialized()?;
        self.values.clear();
        self.initialized = true;
        info!(channel = %self.channel, "initialized empty");
        Ok(())
    }

    pub(crate) fn encode_append(&self, value: &T) -> LedgerResult<LedgerOperation> {
        Ok(LedgerOperation::append(self.codec.encode(value)?))
    }

    /// Send `op` where the current mode says it goes.
    ///
    /// Attached: the op is submitted and `None` is returned; nothing changes
    /// locally until it is delivered back. Detached: the op is handed back for
    /// immediate local application.
    pub(crate) fn route(&self, op: LedgerOperation) -> LedgerResult<Option<LedgerOperation>> {
        match &self.mode {
            Mode::Attached(connection) => {
                let csn = connection.submit(op.to_contents())?;
                debug!(channel = %self.channel, op = op.type_name(), csn, "operation submitted");
                Ok(None)
            }
            Mode::Detached => Ok(Some(op)),
        }
    }

    /// Extract the operation from a delivered message.
    ///
    /// Non-operation messages yield `None`. A tag outside the known set fails
    /// this message only.
    pub(crate) fn accept_delivery(
        &self,
        message: &SequencedMessage,
    ) -> LedgerResult<Option<LedgerOperation>> {
        if !self.attach_state().is_attached() {
            return Err(LedgerError::NotAttached);
        }
        if !message.is_operation() {
            return Ok(None);
        }
        LedgerOperation::from_contents(&message.contents)
            .map(Some)
            .map_err(|e| {
                warn!(
                    channel = %self.channel,
                    seq = message.sequence_number,
                    error = %e,
                    "rejected delivered message"
                );
                LedgerError::from(e)
            })
    }

    /// Report a tag the wrapping ledger kind does not support.
    pub(crate) fn unsupported(&self, op: &LedgerOperation) -> LedgerError {
        warn!(channel = %self.channel, op = op.type_name(), "unsupported operation");
        LedgerError::UnknownOperation {
            op_type: op.type_name().to_string(),
        }
    }

    pub(crate) fn apply_append(&mut self, payload: &Value) -> LedgerResult<()> {
        let value = self.codec.decode(payload)?;
        self.initialized = true;
        self.values.push(value);
        if let Some(value) = self.values.last() {
            self.subscriptions.emit_append(value);
        }
        debug!(channel = %self.channel, len = self.values.len(), "append applied");
        Ok(())
    }

    pub(crate) fn apply_clear(&mut self) {
        let cleared = std::mem::take(&mut self.values);
        self.initialized = true;
        self.subscriptions.emit_clear(&cleared);
        debug!(channel = %self.channel, cleared = cleared.len(), "clear applied");
    }

    pub(crate) fn summarize(&self) -> LedgerResult<SummaryBlob> {
        let contents = snapshot::encode_list(&self.codec, &self.values)?;
        debug!(channel = %self.channel, size = contents.len(), "summarized");
        Ok(SummaryBlob::new(self.config.snapshot_key.clone(), contents))
    }

    /// Replace the list with the snapshot held by `store`.
    ///
    /// The list is swapped only after every payload decoded, so a failed load
    /// leaves the instance untouched and still loadable.
    pub(crate) async fn load(&mut self, store: &dyn SnapshotStore) -> LedgerResult<()> {
        self.ensure_uninitialized()?;
        let payloads: Vec<Value> = read_and_parse(store, &self.config.snapshot_key).await?;
        let values = snapshot::decode_payloads(&self.codec, &payloads)?;
        self.values = values;
        self.initialized = true;
        info!(channel = %self.channel, len = self.values.len(), "loaded from snapshot");
        Ok(())
    }

    pub(crate) fn reject_stashed(&self) -> LedgerError {
        warn!(channel = %self.channel, "stashed operation refused");
        LedgerError::StashedOperationUnsupported
    }
}
