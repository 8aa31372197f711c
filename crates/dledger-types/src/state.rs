use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating mode of a ledger instance.
///
/// The only legal transition is `Detached` → `Attached`, taken once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachState {
    /// Single local replica; operations apply immediately.
    #[default]
    Detached,
    /// Connected to a sequencer; operations apply only once delivered.
    Attached,
}

impl AttachState {
    pub fn is_attached(self) -> bool {
        matches!(self, Self::Attached)
    }
}

impl fmt::Display for AttachState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Detached => "detached",
            Self::Attached => "attached",
        };
        write!(f, "{s}")
    }
}
