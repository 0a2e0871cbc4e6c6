//! Serde bridge for binary struct fields via unpadded URL-safe Base64.
//!
//! Annotate a `Vec<u8>` field with `#[serde(with = "b64buf::serde_b64")]` to
//! carry it through text formats as a URL-safe Base64 string.

use serde::{Deserialize, Deserializer, Serializer};

use crate::base64url;

/// # Errors
///
/// Propagates the serializer's own errors.
pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&base64url::encode(bytes))
}

/// # Errors
///
/// Fails when the field is not a string or not valid URL-safe Base64.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    base64url::to_buffer(&value)
        .map(|buffer| buffer.to_vec())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
    struct Payload {
        #[serde(with = "crate::serde_b64")]
        data: Vec<u8>,
    }

    #[test]
    fn round_trips_through_json() {
        let payload = Payload {
            data: b"hello world".to_vec(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"data":"aGVsbG8gd29ybGQ"}"#);
        assert_eq!(serde_json::from_str::<Payload>(&json).unwrap(), payload);
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(serde_json::from_str::<Payload>(r#"{"data":"a!c"}"#).is_err());
    }
}
