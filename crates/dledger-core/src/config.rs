use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Blob key the list snapshot is stored under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "header";

/// Prefix joined with the channel id to name a ledger in log output.
pub const DEFAULT_DEBUG_PREFIX: &str = "ledger_";

/// Per-instance ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Key of the single snapshot blob.
    pub snapshot_key: String,
    /// Prefix for the channel name attached to every log record.
    pub debug_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            debug_prefix: DEFAULT_DEBUG_PREFIX.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> LedgerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.snapshot_key.trim().is_empty() {
            return Err(LedgerError::Config("snapshot_key must not be empty".into()));
        }
        Ok(())
    }

    /// Name used for the channel `id` in log output.
    pub fn channel_name(&self, id: &str) -> String {
        format!("{}{}", self.debug_prefix, id)
    }
}
