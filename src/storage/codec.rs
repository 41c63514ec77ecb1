//! Text codec for stored collections.
//!
//! The default [`JsonCodec`] uses serde_json, so any type with serde
//! derives can be stored and field names follow its serde attributes.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Encoding or decoding failure, without file context.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CodecError {
    message: String,
}

impl CodecError {
    /// Creates a codec error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Converts values to and from text.
pub trait Codec: Send + Sync {
    /// Serializes `value` to text.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError>;

    /// Deserializes text into a value.
    ///
    /// # Errors
    /// Returns error if `text` is not a valid encoding of `T`.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError>;
}

/// JSON codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Single-line output.
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented, human-readable output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Returns true if output is indented.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.map_err(|e| CodecError::new(format!("serialization failed: {e}")))
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        serde_json::from_str(text)
            .map_err(|e| CodecError::new(format!("deserialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Record;

    #[test]
    fn test_compact_and_pretty_output() {
        let items = vec![Record::new(1), Record::new(2)];

        let compact = JsonCodec::compact().encode(&items).unwrap();
        assert_eq!(compact, r#"[{"id":1},{"id":2}]"#);

        let pretty = JsonCodec::pretty().encode(&items).unwrap();
        assert!(pretty.contains('\n'));

        let back: Vec<Record<i32>> = JsonCodec::pretty().decode(&pretty).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let result: Result<Vec<Record<i32>>, _> = JsonCodec::default().decode(r#"{"id":1}"#);
        let err = result.unwrap_err();
        assert!(err.message().contains("deserialization failed"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<Vec<Record<i32>>, _> = JsonCodec::default().decode("[{\"id\":");
        assert!(result.is_err());
    }
}
