use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::codec::{JsonCodec, ValueCodec};
use crate::error::{CodecError, CodecResult};

/// JSON key marking an embedded handle: `{"__handle__": "/path"}`.
pub const HANDLE_KEY: &str = "__handle__";

/// Stable indirect reference to another shared object in the session.
///
/// Serializes as `{"__handle__": "<path>"}`. The path is the referenced
/// object's identity, so two handles are the same object iff their paths match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle {
    #[serde(rename = "__handle__")]
    path: String,
}

impl ObjectHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Collect the paths of every handle embedded anywhere in `payload`.
pub fn embedded_handles(payload: &Value) -> Vec<&str> {
    let mut found = Vec::new();
    collect_handles(payload, &mut found);
    found
}

fn collect_handles<'a>(value: &'a Value, found: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(path)) = map.get(HANDLE_KEY) {
                    found.push(path);
                    return;
                }
            }
            for child in map.values() {
                collect_handles(child, found);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_handles(child, found);
            }
        }
        _ => {}
    }
}

/// Answers whether a handle path names a live object in the session.
pub trait HandleResolver {
    fn resolves(&self, path: &str) -> bool;
}

impl<R: HandleResolver + ?Sized> HandleResolver for Rc<R> {
    fn resolves(&self, path: &str) -> bool {
        (**self).resolves(path)
    }
}

impl<R: HandleResolver + ?Sized> HandleResolver for Arc<R> {
    fn resolves(&self, path: &str) -> bool {
        (**self).resolves(path)
    }
}

/// Set of object paths bound in the local session.
#[derive(Clone, Debug, Default)]
pub struct SessionHandles {
    paths: BTreeSet<String>,
}

impl SessionHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object and return a handle to it.
    pub fn bind(&mut self, path: impl Into<String>) -> ObjectHandle {
        let handle = ObjectHandle::new(path);
        self.paths.insert(handle.path.clone());
        handle
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl HandleResolver for SessionHandles {
    fn resolves(&self, path: &str) -> bool {
        self.contains(path)
    }
}

/// JSON codec that refuses payloads referencing objects unknown to the session.
///
/// The check runs on both directions: a replica cannot transmit a reference it
/// could not itself resolve, and a delivered or loaded payload naming an object
/// missing from this session fails rather than producing a dangling value.
pub struct HandleCodec<R> {
    resolver: R,
}

impl<R: HandleResolver> HandleCodec<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    fn check(&self, payload: &Value) -> CodecResult<()> {
        for path in embedded_handles(payload) {
            if !self.resolver.resolves(path) {
                debug!(path, "payload references unknown object");
                return Err(CodecError::UnresolvedHandle(path.to_string()));
            }
        }
        Ok(())
    }
}

impl<R: Clone> Clone for HandleCodec<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<T, R> ValueCodec<T> for HandleCodec<R>
where
    T: Serialize + DeserializeOwned,
    R: HandleResolver,
{
    fn encode(&self, value: &T) -> CodecResult<Value> {
        let payload = ValueCodec::<T>::encode(&JsonCodec, value)?;
        self.check(&payload)?;
        Ok(payload)
    }

    fn decode(&self, payload: &Value) -> CodecResult<T> {
        self.check(payload)?;
        ValueCodec::<T>::decode(&JsonCodec, payload)
    }
}
