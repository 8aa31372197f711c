use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CodecError, CodecResult};

/// Converts application values to transmissible payloads and back.
pub trait ValueCodec<T> {
    fn encode(&self, value: &T) -> CodecResult<Value>;

    fn decode(&self, payload: &Value) -> CodecResult<T>;
}

/// Plain serde_json codec for values with no cross-object references.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T> ValueCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> CodecResult<Value> {
        serde_json::to_value(value).map_err(|e| CodecError::Serialization(e.to_string()))
    }

    fn decode(&self, payload: &Value) -> CodecResult<T> {
        T::deserialize(payload).map_err(|e| CodecError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stroke {
        color: String,
        points: Vec<(u32, u32)>,
    }

    #[test]
    fn encodes_structs_as_json_objects() {
        let stroke = Stroke {
            color: "red".into(),
            points: vec![(1, 2), (3, 4)],
        };
        let payload = JsonCodec.encode(&stroke).unwrap();
        assert_eq!(payload, json!({"color": "red", "points": [[1, 2], [3, 4]]}));

        let decoded: Stroke = JsonCodec.decode(&payload).unwrap();
        assert_eq!(decoded, stroke);
    }

    #[test]
    fn decode_type_mismatch_is_reported() {
        let err = ValueCodec::<u32>::decode(&JsonCodec, &json!("not a number")).unwrap_err();
        assert!(matches!(err, CodecError::Deserialization(_)));
    }

    #[test]
    fn arbitrary_json_passes_through() {
        let payload = json!({"nested": [null, true, 1.5]});
        let decoded: Value = JsonCodec.decode(&payload).unwrap();
        assert_eq!(JsonCodec.encode(&decoded).unwrap(), payload);
    }
}
