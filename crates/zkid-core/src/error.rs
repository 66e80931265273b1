//! # Error Hierarchy
//!
//! Structured error types for the foundational crate, built with
//! `thiserror`. Each variant carries the offending value so operators can
//! diagnose a failure without reproducing it.
//!
//! Higher layers wrap these in their own error enums; nothing here is ever
//! downgraded to a default value inside the proof pipeline.

use thiserror::Error;

/// Errors raised by the foundational types: codecs, identifiers, and the
/// operator table.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A hex string could not be decoded.
    #[error("malformed hex: \"{value}\" ({reason})")]
    MalformedHex {
        /// The string that failed to decode.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A byte sequence or encoded value has the wrong width.
    #[error("invalid length: expected at most {expected} bytes, got {actual}")]
    InvalidLength {
        /// The maximum permitted width in bytes.
        expected: usize,
        /// The width actually supplied.
        actual: usize,
    },

    /// A query operator code or name outside the closed enumeration.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A genesis identifier failed structural or checksum validation.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A DID string does not parse or does not map to a known id type.
    #[error("invalid DID: \"{value}\" ({reason})")]
    InvalidDid {
        /// The DID string that was rejected.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_hex_display_carries_value_and_reason() {
        let err = CoreError::MalformedHex {
            value: "0xzz".to_string(),
            reason: "invalid digit".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("0xzz"));
        assert!(msg.contains("invalid digit"));
    }

    #[test]
    fn invalid_length_display() {
        let err = CoreError::InvalidLength {
            expected: 32,
            actual: 40,
        };
        let msg = format!("{err}");
        assert!(msg.contains("32"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn unsupported_operator_display() {
        let err = CoreError::UnsupportedOperator("$between".to_string());
        assert!(format!("{err}").contains("$between"));
    }

    #[test]
    fn invalid_did_display() {
        let err = CoreError::InvalidDid {
            value: "did:web:x".to_string(),
            reason: "unknown method".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("did:web:x"));
        assert!(msg.contains("unknown method"));
    }
}
