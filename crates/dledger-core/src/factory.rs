//! Channel type registration and construction.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dledger_store::SnapshotStore;

use crate::channel::SharedChannel;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};

/// Channel type of the append-only [`Ledger`](crate::Ledger).
pub const LEDGER_TYPE: &str = "ledger-dds";

/// Channel type of the [`ClearableLedger`](crate::ClearableLedger).
pub const CLEARABLE_LEDGER_TYPE: &str = "clearable-ledger-dds";

/// Version of the snapshot layout written by `summarize`.
pub const SNAPSHOT_FORMAT_VERSION: &str = "0.1";

/// Version of this crate, recorded in channel attributes.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identifies what kind of channel a snapshot belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAttributes {
    pub channel_type: String,
    pub snapshot_format_version: String,
    pub package_version: String,
}

impl ChannelAttributes {
    /// Attributes this build writes for `channel_type`.
    pub fn for_type(channel_type: &str) -> Self {
        Self {
            channel_type: channel_type.to_string(),
            snapshot_format_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            package_version: PACKAGE_VERSION.to_string(),
        }
    }

    /// Check that a snapshot written with `self` can be loaded as `expected`.
    ///
    /// Channel type and snapshot format must match. Package versions may
    /// differ.
    pub fn check_compatible(&self, expected: &ChannelAttributes) -> LedgerResult<()> {
        if self.channel_type != expected.channel_type {
            return Err(LedgerError::IncompatibleAttributes(format!(
                "channel type `{}`, expected `{}`",
                self.channel_type, expected.channel_type
            )));
        }
        if self.snapshot_format_version != expected.snapshot_format_version {
            return Err(LedgerError::IncompatibleAttributes(format!(
                "snapshot format {}, expected {}",
                self.snapshot_format_version, expected.snapshot_format_version
            )));
        }
        if self.package_version != expected.package_version {
            debug!(
                written = %self.package_version,
                running = %expected.package_version,
                "loading snapshot from another package version"
            );
        }
        Ok(())
    }
}

/// A channel kind the factory knows how to build.
pub trait LedgerChannel: SharedChannel + Sized {
    type Codec;

    const TYPE: &'static str;

    fn construct(
        id: String,
        attributes: ChannelAttributes,
        config: LedgerConfig,
        codec: Self::Codec,
    ) -> Self;
}

/// Builds channels of kind `L`, either fresh or from a snapshot.
pub struct LedgerFactory<L: LedgerChannel> {
    config: LedgerConfig,
    codec: L::Codec,
}

impl<L> LedgerFactory<L>
where
    L: LedgerChannel,
    L::Codec: Clone,
{
    /// Factory with the default configuration.
    pub fn new(codec: L::Codec) -> Self {
        Self {
            config: LedgerConfig::default(),
            codec,
        }
    }

    /// Factory with a validated configuration.
    pub fn with_config(config: LedgerConfig, codec: L::Codec) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self { config, codec })
    }

    /// Channel type string of `L`.
    pub fn channel_type(&self) -> &'static str {
        L::TYPE
    }

    /// Attributes this build stamps on newly created channels.
    pub fn attributes(&self) -> ChannelAttributes {
        ChannelAttributes::for_type(L::TYPE)
    }

    /// Configuration handed to every channel built here.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn build(&self, id: String, attributes: ChannelAttributes) -> L {
        L::construct(id, attributes, self.config.clone(), self.codec.clone())
    }

    /// A brand new, empty, detached channel.
    pub fn create(&self, id: impl Into<String>) -> LedgerResult<L> {
        let mut channel = self.build(id.into(), self.attributes());
        channel.initialize_local()?;
        info!(channel_type = L::TYPE, id = channel.id(), "channel created");
        Ok(channel)
    }

    /// A detached channel bootstrapped from the snapshot in `store`.
    ///
    /// `attributes` are the ones recorded alongside the snapshot. They are
    /// checked before the store is read and the loaded channel keeps them.
    pub async fn load(
        &self,
        id: impl Into<String>,
        store: &dyn SnapshotStore,
        attributes: &ChannelAttributes,
    ) -> LedgerResult<L> {
        attributes.check_compatible(&self.attributes())?;
        let mut channel = self.build(id.into(), attributes.clone());
        channel.load(store).await?;
        info!(channel_type = L::TYPE, id = channel.id(), "channel loaded");
        Ok(channel)
    }
}

impl<L> Clone for LedgerFactory<L>
where
    L: LedgerChannel,
    L::Codec: Clone,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            codec: self.codec.clone(),
        }
    }
}
