//! Foundation types for the replicated ledger.
//!
//! This crate provides the identity, wire, and boundary types shared by every
//! other dledger crate. It has no knowledge of the list state machine itself.
//!
//! # Key Types
//!
//! - [`ClientId`]: UUID v7 identity of one replica's connection
//! - [`AttachState`]: one-way `Detached` → `Attached` mode of a ledger
//! - [`LedgerOperation`]: the `append` / `clear` wire operation
//! - [`SequencedMessage`]: an operation stamped with its global position
//! - [`DeltaConnection`]: submit boundary towards the sequencer

pub mod client;
pub mod connection;
pub mod error;
pub mod message;
pub mod operation;
pub mod state;

pub use client::ClientId;
pub use connection::DeltaConnection;
pub use error::{ConnectionError, TypeError};
pub use message::{MessageKind, SequencedMessage};
pub use operation::LedgerOperation;
pub use state::AttachState;
