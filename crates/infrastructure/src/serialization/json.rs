//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const INDENT: &[u8] = b"  ";

/// Serializes a value to the byte layout used for collection files:
/// pretty-printed with 2-space indentation and a trailing newline.
///
/// Field order follows the struct declarations, which keep fields sorted.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_json_stable_bytes<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::with_capacity(512);
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Same layout as [`to_json_stable_bytes`], as a `String`.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_json_stable<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    Ok(String::from_utf8(to_json_stable_bytes(value)?)?)
}

/// Parses JSON, pretty-printed or minified.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use apiweave_domain::persistence::PersistenceCollection;
    use apiweave_domain::{GlobalPolicy, Item, OrderEntry, StoredOrder};

    #[test]
    fn test_order_entry_layout() {
        let json = to_json_stable(&OrderEntry::new("A", 0)).expect("serialization should work");

        assert_eq!(
            json,
            "{\n  \"item_id\": \"A\",\n  \"position\": 0,\n  \"enabled\": true,\n  \"continue_on_failure\": true\n}\n"
        );
    }

    #[test]
    fn test_collection_bytes_are_reproducible() {
        let collection = PersistenceCollection::new("c1".to_string(), "Suite")
            .with_workflow(Item::new("A", "Login"));

        let first = to_json_stable_bytes(&collection).expect("serialization should work");
        let second = to_json_stable_bytes(&collection).expect("serialization should work");

        assert_eq!(first, second);
        assert_eq!(first.last(), Some(&b'\n'));
    }

    #[test]
    fn test_from_json_bytes_reads_minified_input() {
        let json = br#"{"entries":[{"item_id":"A","position":0}],"policy":{"continue_on_failure":false}}"#;
        let order: StoredOrder = from_json_bytes(json).expect("deserialization should work");

        assert_eq!(order.entries, vec![OrderEntry::new("A", 0)]);
        assert_eq!(order.policy, GlobalPolicy::new(false));
    }

    #[test]
    fn test_from_json_bytes_rejects_invalid_json() {
        let result: Result<StoredOrder, _> = from_json_bytes(b"{\"entries\": }");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
