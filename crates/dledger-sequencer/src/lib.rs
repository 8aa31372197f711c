//! In-process sequencing service for the replicated ledger.
//!
//! [`LocalSequencer`] plays the role of the remote ordering service: it
//! assigns every submission one global sequence number and fans the result out
//! to every client, the submitter included. Each client talks to it through a
//! [`SequencerConnection`], which implements the `DeltaConnection` submit
//! boundary and exposes the inbound delivery queue.
//!
//! Connectivity is simulated per client. Submissions made while disconnected,
//! or still queued when the client dropped, are resubmitted in original order
//! on reconnect and are sequenced exactly once.

pub mod connection;
pub mod sequencer;

pub use connection::SequencerConnection;
pub use sequencer::LocalSequencer;
