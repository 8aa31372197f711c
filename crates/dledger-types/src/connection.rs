use serde_json::Value;

use crate::client::ClientId;
use crate::error::ConnectionError;

/// Submit boundary towards the sequencing service.
///
/// Implementations own connectivity: a submission made while disconnected
/// must be held and resubmitted, in order, on reconnect, and every submission
/// must be sequenced exactly once. Delivery back to replicas happens outside
/// this trait, through whatever inbound path the host drives.
pub trait DeltaConnection {
    fn client_id(&self) -> ClientId;

    fn is_connected(&self) -> bool;

    /// Hand message contents to the sequencer. Returns the client sequence
    /// number assigned to the submission.
    fn submit(&self, contents: Value) -> Result<u64, ConnectionError>;
}
