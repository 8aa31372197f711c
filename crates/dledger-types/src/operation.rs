use serde_json::{json, Value};

use crate::error::TypeError;

/// Wire tags for ledger operations.
pub mod op_types {
    pub const APPEND: &str = "append";
    pub const CLEAR: &str = "clear";
}

/// A ledger operation as it travels through the sequencer.
///
/// Wire shape is one JSON object per message:
/// `{"type":"append","value":<payload>}` or `{"type":"clear"}`. The append
/// payload is whatever the value codec produced; it is never inspected here.
#[derive(Clone, Debug, PartialEq)]
pub enum LedgerOperation {
    Append { value: Value },
    Clear,
}

impl LedgerOperation {
    pub fn append(value: Value) -> Self {
        Self::Append { value }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Append { .. } => op_types::APPEND,
            Self::Clear => op_types::CLEAR,
        }
    }

    /// Render the operation as message contents.
    pub fn to_contents(&self) -> Value {
        match self {
            Self::Append { value } => json!({ "type": op_types::APPEND, "value": value }),
            Self::Clear => json!({ "type": op_types::CLEAR }),
        }
    }

    /// Parse message contents.
    ///
    /// An unrecognised tag is reported as [`TypeError::UnknownOperation`] so the
    /// caller can tell a version mismatch apart from a damaged message.
    pub fn from_contents(contents: &Value) -> Result<Self, TypeError> {
        let op_type = contents
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| TypeError::MalformedOperation("missing string `type` field".into()))?;

        match op_type {
            op_types::APPEND => {
                let value = contents.get("value").cloned().ok_or_else(|| {
                    TypeError::MalformedOperation("append operation without `value`".into())
                })?;
                Ok(Self::Append { value })
            }
            op_types::CLEAR => Ok(Self::Clear),
            other => Err(TypeError::UnknownOperation(other.to_string())),
        }
    }
}
