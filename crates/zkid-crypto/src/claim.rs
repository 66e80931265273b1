//! # Claim encoding
//!
//! A [`Claim`] is a fixed-width binary record of eight 32-byte slots: four
//! index slots and four value slots, each a little-endian field element.
//! The layout used here:
//!
//! - index slot 0, bytes `0..16` — schema hash;
//! - index slots 2 and 3 — the two index data integers (a public-key
//!   coordinate pair for authentication claims);
//! - value slot 0, bytes `0..8` — the revocation nonce, little-endian.
//!
//! A claim is addressed in the trees by its two derived keys: `h_index`
//! (Poseidon over the index slots) and `h_value` (Poseidon over the value
//! slots). Claims are immutable once created.

use num_bigint::{BigInt, Sign};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zkid_core::codec::{bytes_to_field_int, ByteOrder};

use crate::error::CryptoError;
use crate::hash::field_modulus;
use crate::poseidon::hash_elems;

/// Width of one claim slot in bytes.
const SLOT_WIDTH: usize = 32;

/// Width of the schema hash in bytes.
const SCHEMA_WIDTH: usize = 16;

/// A claim schema identifier: the first 16 bytes of index slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaHash([u8; SCHEMA_WIDTH]);

impl SchemaHash {
    /// Parse 32 hex digits.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedHex`] on bad hex or wrong width.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let decoded = hex::decode(s).map_err(|e| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; SCHEMA_WIDTH] =
            decoded.try_into().map_err(|v: Vec<u8>| CryptoError::MalformedHex {
                value: s.to_string(),
                reason: format!("expected 16 bytes, got {}", v.len()),
            })?;
        Ok(SchemaHash(bytes))
    }

    /// The raw 16 bytes.
    pub fn as_bytes(&self) -> &[u8; SCHEMA_WIDTH] {
        &self.0
    }

    /// The schema hash as a little-endian integer (the `claimSchema`
    /// circuit input form).
    pub fn big_int(&self) -> BigInt {
        bytes_to_field_int(&self.0, ByteOrder::LittleEndian)
    }

    /// Hex encoding (32 digits).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// A fixed-width eight-slot claim record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    index: [[u8; SLOT_WIDTH]; 4],
    value: [[u8; SLOT_WIDTH]; 4],
}

impl Claim {
    /// Build an authentication-style claim: schema hash, two index data
    /// integers, and a revocation nonce.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::FieldOverflow`] if either data integer is
    /// outside the field.
    pub fn new_auth(
        schema: SchemaHash,
        index_a: &BigInt,
        index_b: &BigInt,
        revocation_nonce: u64,
    ) -> Result<Self, CryptoError> {
        let mut claim = Claim {
            index: [[0u8; SLOT_WIDTH]; 4],
            value: [[0u8; SLOT_WIDTH]; 4],
        };
        claim.index[0][..SCHEMA_WIDTH].copy_from_slice(schema.as_bytes());
        claim.index[2] = int_to_slot(index_a)?;
        claim.index[3] = int_to_slot(index_b)?;
        claim.value[0][..8].copy_from_slice(&revocation_nonce.to_le_bytes());
        Ok(claim)
    }

    /// Parse a claim from its 512-hex-digit binary encoding (index slots
    /// first, then value slots).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedHex`] on bad hex or wrong width and
    /// [`CryptoError::FieldOverflow`] if any slot is outside the field.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let decoded = hex::decode(s).map_err(|e| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        if decoded.len() != SLOT_WIDTH * 8 {
            return Err(CryptoError::MalformedHex {
                value: s.to_string(),
                reason: format!("expected 256 bytes, got {}", decoded.len()),
            });
        }

        let mut claim = Claim {
            index: [[0u8; SLOT_WIDTH]; 4],
            value: [[0u8; SLOT_WIDTH]; 4],
        };
        for i in 0..4 {
            claim.index[i].copy_from_slice(&decoded[i * SLOT_WIDTH..(i + 1) * SLOT_WIDTH]);
            claim.value[i]
                .copy_from_slice(&decoded[(i + 4) * SLOT_WIDTH..(i + 5) * SLOT_WIDTH]);
        }
        for slot in claim.index.iter().chain(claim.value.iter()) {
            let v = bytes_to_field_int(slot, ByteOrder::LittleEndian);
            if &v >= field_modulus() {
                return Err(CryptoError::FieldOverflow(v.to_string()));
            }
        }
        Ok(claim)
    }

    /// The claim's 512-hex-digit binary encoding.
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(SLOT_WIDTH * 8);
        for slot in self.index.iter().chain(self.value.iter()) {
            bytes.extend_from_slice(slot);
        }
        hex::encode(bytes)
    }

    /// One index slot as a little-endian integer.
    pub fn index_slot(&self, i: usize) -> BigInt {
        bytes_to_field_int(&self.index[i], ByteOrder::LittleEndian)
    }

    /// One value slot as a little-endian integer.
    pub fn value_slot(&self, i: usize) -> BigInt {
        bytes_to_field_int(&self.value[i], ByteOrder::LittleEndian)
    }

    /// The schema hash embedded in index slot 0.
    pub fn schema_hash(&self) -> SchemaHash {
        let mut bytes = [0u8; SCHEMA_WIDTH];
        bytes.copy_from_slice(&self.index[0][..SCHEMA_WIDTH]);
        SchemaHash(bytes)
    }

    /// The revocation nonce from value slot 0.
    pub fn revocation_nonce(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.value[0][..8]);
        u64::from_le_bytes(bytes)
    }

    /// The claim's index tree key: Poseidon over the four index slots.
    pub fn h_index(&self) -> Result<BigInt, CryptoError> {
        let slots: Vec<BigInt> = (0..4).map(|i| self.index_slot(i)).collect();
        Ok(hash_elems(&slots)?.big_int())
    }

    /// The claim's value tree key: Poseidon over the four value slots.
    pub fn h_value(&self) -> Result<BigInt, CryptoError> {
        let slots: Vec<BigInt> = (0..4).map(|i| self.value_slot(i)).collect();
        Ok(hash_elems(&slots)?.big_int())
    }

    /// Both tree keys.
    pub fn hi_hv(&self) -> Result<(BigInt, BigInt), CryptoError> {
        Ok((self.h_index()?, self.h_value()?))
    }
}

fn int_to_slot(value: &BigInt) -> Result<[u8; SLOT_WIDTH], CryptoError> {
    if value.sign() == Sign::Minus || value >= field_modulus() {
        return Err(CryptoError::FieldOverflow(value.to_string()));
    }
    let (_, le) = value.to_bytes_le();
    let mut slot = [0u8; SLOT_WIDTH];
    slot[..le.len()].copy_from_slice(&le);
    Ok(slot)
}

// Circuit wire form: an eight-element array of decimal slot strings,
// index slots first.
impl Serialize for Claim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(8))?;
        for i in 0..4 {
            seq.serialize_element(&self.index_slot(i).to_string())?;
        }
        for i in 0..4 {
            seq.serialize_element(&self.value_slot(i).to_string())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Claim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClaimVisitor;

        impl<'de> Visitor<'de> for ClaimVisitor {
            type Value = Claim;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an array of eight decimal slot strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Claim, A::Error> {
                let mut slots = Vec::with_capacity(8);
                while let Some(s) = seq.next_element::<String>()? {
                    let value = BigInt::parse_bytes(s.as_bytes(), 10)
                        .ok_or_else(|| de::Error::custom(format!("bad slot integer: {s}")))?;
                    slots.push(int_to_slot(&value).map_err(de::Error::custom)?);
                }
                if slots.len() != 8 {
                    return Err(de::Error::invalid_length(slots.len(), &self));
                }
                let mut claim = Claim {
                    index: [[0u8; SLOT_WIDTH]; 4],
                    value: [[0u8; SLOT_WIDTH]; 4],
                };
                claim.index.copy_from_slice(&slots[..4]);
                claim.value.copy_from_slice(&slots[4..]);
                Ok(claim)
            }
        }

        deserializer.deserialize_seq(ClaimVisitor)
    }
}
