//! Value codec boundary for the replicated ledger.
//!
//! The ledger never interprets the values it stores. Every value crosses this
//! boundary on its way to the wire or a snapshot, and back on delivery or load.
//! Codecs may rewrite embedded references to other shared objects into stable
//! handles; the handle path is the object's identity and must survive the
//! round trip unchanged.

pub mod codec;
pub mod error;
pub mod handle;

pub use codec::{JsonCodec, ValueCodec};
pub use error::{CodecError, CodecResult};
pub use handle::{embedded_handles, HandleCodec, HandleResolver, ObjectHandle, SessionHandles};
