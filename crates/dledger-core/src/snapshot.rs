//! Snapshot encoding.
//!
//! A snapshot is one blob holding a JSON array of codec payloads, one per list
//! element, in list order. No operations or metadata are stored alongside.

use serde_json::Value;

use dledger_codec::ValueCodec;

use crate::error::{LedgerError, LedgerResult};

/// Encode every value and serialize the payloads as a JSON array.
pub fn encode_list<T, C: ValueCodec<T>>(codec: &C, values: &[T]) -> LedgerResult<Vec<u8>> {
    let payloads = values
        .iter()
        .map(|value| codec.encode(value))
        .collect::<Result<Vec<Value>, _>>()?;
    serde_json::to_vec(&payloads).map_err(|e| LedgerError::Snapshot(e.to_string()))
}

/// Decode an already-parsed payload array back into values.
///
/// Either every payload decodes or nothing is returned.
pub fn decode_payloads<T, C: ValueCodec<T>>(codec: &C, payloads: &[Value]) -> LedgerResult<Vec<T>> {
    payloads
        .iter()
        .map(|payload| codec.decode(payload).map_err(LedgerError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dledger_codec::{CodecError, HandleCodec, JsonCodec, ObjectHandle, SessionHandles};
    use serde_json::json;

    #[test]
    fn blob_is_a_json_array_in_list_order() {
        let values = vec!["item1".to_string(), "item2".to_string()];
        let bytes = encode_list(&JsonCodec, &values).unwrap();
        assert_eq!(bytes, br#"["item1","item2"]"#.to_vec());

        let payloads: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
        let decoded: Vec<String> = decode_payloads(&JsonCodec, &payloads).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn empty_list_is_empty_array() {
        let bytes = encode_list::<u32, _>(&JsonCodec, &[]).unwrap();
        assert_eq!(bytes, b"[]".to_vec());
    }

    #[test]
    fn one_bad_payload_fails_the_whole_decode() {
        let payloads = vec![json!(1), json!("two"), json!(3)];
        let err = decode_payloads::<u32, _>(&JsonCodec, &payloads).unwrap_err();
        assert!(matches!(err, LedgerError::Codec(CodecError::Deserialization(_))));
    }

    #[test]
    fn handles_survive_a_snapshot() {
        let mut handles = SessionHandles::new();
        let canvas = handles.bind("/canvas");
        let codec = HandleCodec::new(handles);

        let bytes = encode_list(&codec, &[canvas.clone()]).unwrap();
        let payloads: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
        let decoded: Vec<ObjectHandle> = decode_payloads(&codec, &payloads).unwrap();
        assert_eq!(decoded, vec![canvas]);
    }
}
