//! # Numeric Codec
//!
//! Byte-order conversions between the encodings used on-chain and the
//! field-element big-integer representation circuits consume, plus the
//! state-hash hex reformatting required by the revocation-status service.
//!
//! All conversions are pure functions, total over well-formed input, and
//! fail with [`CoreError::MalformedHex`] / [`CoreError::InvalidLength`]
//! otherwise.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::error::CoreError;

/// Byte order of an integer encoding.
///
/// Challenge hashes arrive big-endian from the signing envelope while the
/// signature and circuit layers consume little-endian field integers, so
/// both directions are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first (circuit / Merkle hash convention).
    LittleEndian,
    /// Most significant byte first (hash-envelope convention).
    BigEndian,
}

/// Interpret a byte sequence as an unsigned integer in the requested byte
/// order.
///
/// The empty slice maps to zero. The result is always non-negative.
pub fn bytes_to_field_int(bytes: &[u8], order: ByteOrder) -> BigInt {
    match order {
        ByteOrder::LittleEndian => BigInt::from_bytes_le(Sign::Plus, bytes),
        ByteOrder::BigEndian => BigInt::from_bytes_be(Sign::Plus, bytes),
    }
}

/// Encode a non-negative integer into exactly `width` bytes in the
/// requested byte order.
///
/// Exact inverse of [`bytes_to_field_int`] for inputs of `width` bytes.
///
/// # Errors
///
/// Returns [`CoreError::InvalidLength`] if the value does not fit in
/// `width` bytes, or [`CoreError::MalformedHex`] if the value is negative.
pub fn field_int_to_bytes(value: &BigInt, order: ByteOrder, width: usize) -> Result<Vec<u8>, CoreError> {
    if value.sign() == Sign::Minus {
        return Err(CoreError::MalformedHex {
            value: value.to_string(),
            reason: "negative value cannot be encoded".to_string(),
        });
    }

    let (_, mut le) = value.to_bytes_le();
    if value.is_zero() {
        le.clear();
    }
    if le.len() > width {
        return Err(CoreError::InvalidLength {
            expected: width,
            actual: le.len(),
        });
    }
    le.resize(width, 0);

    match order {
        ByteOrder::LittleEndian => Ok(le),
        ByteOrder::BigEndian => {
            le.reverse();
            Ok(le)
        }
    }
}

/// Re-encode a `0x`-prefixed state hash from the on-chain byte order into
/// the form the revocation-status service expects.
///
/// The hex payload is decoded, interpreted as a little-endian integer, and
/// re-encoded big-endian, left-padded to exactly 64 hex digits. The result
/// keeps the `0x` prefix.
///
/// Two non-equivalent versions of this conversion have circulated: one
/// reverses the raw bytes, one goes through the integer value. This is
/// the big-integer one, and it always pads to the full 64 digits rather
/// than prepending a single `0` when digits are missing.
///
/// # Errors
///
/// Returns [`CoreError::MalformedHex`] if the prefix is missing or the
/// payload is not valid hex, and [`CoreError::InvalidLength`] if the
/// payload is wider than 32 bytes.
pub fn reformat_state_hash(hash: &str) -> Result<String, CoreError> {
    let payload = hash.strip_prefix("0x").ok_or_else(|| CoreError::MalformedHex {
        value: hash.to_string(),
        reason: "missing 0x prefix".to_string(),
    })?;

    let bytes = hex::decode(payload).map_err(|e| CoreError::MalformedHex {
        value: hash.to_string(),
        reason: e.to_string(),
    })?;

    if bytes.len() > 32 {
        return Err(CoreError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        });
    }

    let value = bytes_to_field_int(&bytes, ByteOrder::LittleEndian);
    Ok(format!("0x{:0>64}", value.to_str_radix(16)))
}
