use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one replica's connection to the sequencer (UUID v7).
///
/// Time-ordered, so ids handed out by one sequencer sort in connect order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    /// Generate a new time-ordered client ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.short_id())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ClientId::new(), ClientId::new());
    }

    #[test]
    fn short_id_is_prefix_of_display() {
        let id = ClientId::new();
        assert_eq!(id.short_id().len(), 8);
        assert!(id.to_string().starts_with(&id.short_id()));
        assert_eq!(format!("{id:?}"), format!("ClientId({})", id.short_id()));
    }

    #[test]
    fn from_uuid_preserves_value() {
        let uuid = uuid::Uuid::now_v7();
        assert_eq!(ClientId::from_uuid(uuid).as_uuid(), &uuid);
    }
}
