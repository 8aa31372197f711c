//! Snapshot blob storage for the replicated ledger.
//!
//! A ledger persists exactly one opaque blob, under one fixed key, holding its
//! full list. There is no op-log and no incremental format.
//!
//! # Storage Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`InMemorySnapshotStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. The store never interprets blob contents.
//! 2. Reading a missing key is an error, not an empty blob.
//! 3. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod summary;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemorySnapshotStore;
pub use summary::{read_and_parse, SummaryBlob};
pub use traits::SnapshotStore;
