//! Transfer codes
//!
//! A transfer code is the JSON form of a snapshot, base64-encoded so it can
//! be pasted as plain text. Codes carry no signature: anything that decodes
//! to an object with a valid `identity` is accepted.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::TransferSnapshot;

/// Decoder that accepts codes whose trailing `=` padding was lost in copying
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a transfer code was rejected
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Transfer code is empty")]
    Empty,

    #[error("Transfer code is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Transfer code does not contain valid JSON: {0}")]
    InvalidJson(String),

    #[error("Transfer code has no identity")]
    MissingIdentity,

    #[error("Transfer code has a malformed snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Encode any serializable value as a transfer code
///
/// Returns an empty string if serialization fails; callers treat an empty
/// code as failure.
pub fn encode_transfer_code<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => STANDARD.encode(json),
        Err(e) => {
            warn!("Failed to generate transfer code: {}", e);
            String::new()
        }
    }
}

/// Decode a transfer code into untyped JSON
pub fn decode_transfer_value(code: &str) -> Result<Value, TransferError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(TransferError::Empty);
    }

    let bytes = LENIENT.decode(code)?;
    let json = String::from_utf8(bytes).map_err(|e| TransferError::InvalidJson(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| TransferError::InvalidJson(e.to_string()))
}

/// Decode and validate a transfer code
pub fn decode_transfer_code(code: &str) -> Result<TransferSnapshot, TransferError> {
    let value = decode_transfer_value(code)?;

    match value.get("identity") {
        None | Some(Value::Null) => return Err(TransferError::MissingIdentity),
        Some(_) => {}
    }

    serde_json::from_value(value).map_err(|e| TransferError::InvalidSnapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn snapshot() -> TransferSnapshot {
        TransferSnapshot {
            identity: Identity::create(
                "OM-SHANTI-lq2x9c0a-1a2b3c4d-55",
                "Mira",
                "flower",
                Utc.with_ymd_and_hms(2023, 5, 4, 3, 2, 1).unwrap(),
            )
            .unwrap(),
            lifetime_count: 1080,
        }
    }

    #[test]
    fn test_snapshot_survives_transfer() {
        let code = encode_transfer_code(&snapshot());
        assert!(!code.is_empty());
        assert_eq!(decode_transfer_code(&code).unwrap(), snapshot());
    }

    #[test]
    fn test_value_round_trip() {
        let value = json!({
            "identity": {"id": "x"},
            "nested": [1, 2.5, null, "ॐ", {"deep": true}],
        });
        let code = encode_transfer_code(&value);
        assert_eq!(decode_transfer_value(&code).unwrap(), value);
    }

    #[test]
    fn test_code_is_plain_base64_of_json() {
        let code = encode_transfer_code(&json!({"a": 1}));
        assert_eq!(code, "eyJhIjoxfQ==");
    }

    #[test]
    fn test_missing_padding_is_accepted() {
        assert_eq!(
            decode_transfer_value("eyJhIjoxfQ").unwrap(),
            json!({"a": 1})
        );

        let code = encode_transfer_code(&snapshot());
        let unpadded = code.trim_end_matches('=');
        assert_eq!(decode_transfer_code(unpadded).unwrap(), snapshot());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let code = format!("  {}\n", encode_transfer_code(&snapshot()));
        assert!(decode_transfer_code(&code).is_ok());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            decode_transfer_code("not base64 or not json"),
            Err(TransferError::InvalidEncoding(_))
        ));
        assert!(matches!(decode_transfer_code(""), Err(TransferError::Empty)));

        // Valid base64, not JSON
        let code = STANDARD.encode("hello there");
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::InvalidJson(_))
        ));

        // Valid base64, not UTF-8
        let code = STANDARD.encode([0xff, 0xfe, 0x00]);
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let code = encode_transfer_code(&json!({"lifetimeCount": 10}));
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::MissingIdentity)
        ));

        let code = encode_transfer_code(&json!({"identity": null, "lifetimeCount": 10}));
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::MissingIdentity)
        ));

        let code = encode_transfer_code(&json!([1, 2, 3]));
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::MissingIdentity)
        ));
    }

    #[test]
    fn test_malformed_identity_is_rejected() {
        let code = encode_transfer_code(&json!({"identity": {"id": "x"}, "lifetimeCount": 1}));
        assert!(matches!(
            decode_transfer_code(&code),
            Err(TransferError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_missing_count_defaults_to_zero() {
        let mut value = serde_json::to_value(snapshot()).unwrap();
        value.as_object_mut().unwrap().remove("lifetimeCount");

        let decoded = decode_transfer_code(&encode_transfer_code(&value)).unwrap();
        assert_eq!(decoded.lifetime_count, 0);
    }
}
