//! # Field hashes
//!
//! [`FieldHash`] is a BN254 scalar-field element stored as 32 little-endian
//! bytes — the representation the Merkle trees key on and the circuits
//! consume. Hex forms encode the raw little-endian bytes; the serde form is
//! the decimal big-integer string used on the circuit wire.

use std::sync::OnceLock;

use num_bigint::{BigInt, Sign};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zkid_core::codec::{bytes_to_field_int, ByteOrder};

use crate::error::CryptoError;

/// Decimal form of the BN254 scalar-field modulus.
const FIELD_MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// The BN254 scalar-field modulus.
pub fn field_modulus() -> &'static BigInt {
    static MODULUS: OnceLock<BigInt> = OnceLock::new();
    MODULUS.get_or_init(|| {
        BigInt::parse_bytes(FIELD_MODULUS_DEC.as_bytes(), 10)
            .expect("modulus constant parses")
    })
}

/// A BN254 field element as 32 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldHash([u8; 32]);

impl FieldHash {
    /// The zero hash (empty subtree marker).
    pub const ZERO: FieldHash = FieldHash([0u8; 32]);

    /// Build a field hash from a non-negative integer below the modulus.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::FieldOverflow`] for negative values or values
    /// at or above the modulus.
    pub fn from_big_int(value: &BigInt) -> Result<Self, CryptoError> {
        if value.sign() == Sign::Minus || value >= field_modulus() {
            return Err(CryptoError::FieldOverflow(value.to_string()));
        }
        let (_, le) = value.to_bytes_le();
        let mut bytes = [0u8; 32];
        bytes[..le.len()].copy_from_slice(&le);
        Ok(FieldHash(bytes))
    }

    /// Parse a decimal big-integer string.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::FieldOverflow`] if the string is not a
    /// decimal integer in the field.
    pub fn from_decimal(s: &str) -> Result<Self, CryptoError> {
        let value = BigInt::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| CryptoError::FieldOverflow(s.to_string()))?;
        Self::from_big_int(&value)
    }

    /// Parse 64 hex digits (optional `0x` prefix) as raw little-endian
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedHex`] on bad hex or wrong width, and
    /// [`CryptoError::FieldOverflow`] if the decoded value is not in the
    /// field.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let payload = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(payload).map_err(|e| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: format!("expected 32 bytes, got {}", v.len()),
        })?;
        let hash = FieldHash(bytes);
        if &hash.big_int() >= field_modulus() {
            return Err(CryptoError::FieldOverflow(hash.big_int().to_string()));
        }
        Ok(hash)
    }

    /// The value as a non-negative big integer.
    pub fn big_int(&self) -> BigInt {
        bytes_to_field_int(&self.0, ByteOrder::LittleEndian)
    }

    /// The raw little-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding of the raw little-endian bytes (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this is the zero hash.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::fmt::Display for FieldHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.big_int())
    }
}

impl Serialize for FieldHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.big_int().to_string())
    }
}

impl<'de> Deserialize<'de> for FieldHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FieldHash::from_decimal(&s).map_err(de::Error::custom)
    }
}
