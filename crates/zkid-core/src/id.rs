//! # Self-certified identifiers
//!
//! A genesis [`Id`] is 31 bytes: a 2-byte type tag, 27 bytes taken from
//! the identity's genesis state, and a 2-byte checksum. Its string form is
//! base58. A [`Did`] wraps an `Id` in the W3C DID syntax, with the method
//! and network segments derived from the type tag.
//!
//! The derivation is deliberately byte-for-byte compatible with the
//! on-chain registry: the genesis slice is bytes `5..32` of the state's
//! 32-byte little-endian encoding, and the checksum is the little-endian
//! byte sum of the tag and genesis bytes.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::codec::{bytes_to_field_int, field_int_to_bytes, ByteOrder};
use crate::error::CoreError;

/// Total width of an encoded identifier.
const ID_WIDTH: usize = 31;

/// Width of the genesis slice inside an identifier.
const GENESIS_WIDTH: usize = 27;

/// Type-tag byte marking the `iden3` DID method.
const METHOD_BYTE_IDEN3: u8 = 0x01;

/// Network flag for read-only (chainless) identifiers.
const NETWORK_FLAG_READONLY: u8 = 0x00;

/// The 2-byte identifier type tag: method byte plus blockchain/network
/// flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdType(pub [u8; 2]);

impl IdType {
    /// Read-only `iden3` identifiers, not anchored to any network.
    pub const READONLY: IdType = IdType([METHOD_BYTE_IDEN3, NETWORK_FLAG_READONLY]);

    /// The DID-method byte.
    pub fn method_byte(&self) -> u8 {
        self.0[0]
    }

    /// The blockchain/network flag byte.
    pub fn network_byte(&self) -> u8 {
        self.0[1]
    }
}

/// A 31-byte genesis identifier: `type(2) || genesis(27) || checksum(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id([u8; ID_WIDTH]);

impl Id {
    /// Assemble an identifier from a type tag and genesis bytes, computing
    /// the checksum.
    pub fn new(typ: IdType, genesis: [u8; GENESIS_WIDTH]) -> Self {
        let checksum = Self::checksum(typ, &genesis);
        let mut bytes = [0u8; ID_WIDTH];
        bytes[..2].copy_from_slice(&typ.0);
        bytes[2..2 + GENESIS_WIDTH].copy_from_slice(&genesis);
        bytes[2 + GENESIS_WIDTH..].copy_from_slice(&checksum);
        Id(bytes)
    }

    /// Derive the genesis identifier for an identity state.
    ///
    /// The genesis slice is bytes `5..32` of the state's 32-byte
    /// little-endian encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLength`] if the state does not fit in
    /// 32 bytes.
    pub fn from_genesis_state(typ: IdType, state: &BigInt) -> Result<Self, CoreError> {
        let le = field_int_to_bytes(state, ByteOrder::LittleEndian, 32)?;
        let mut genesis = [0u8; GENESIS_WIDTH];
        genesis.copy_from_slice(&le[32 - GENESIS_WIDTH..]);
        Ok(Self::new(typ, genesis))
    }

    /// Parse a base58 identifier string, validating width and checksum.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidId`] on bad base58, wrong width, or a
    /// checksum mismatch.
    pub fn from_base58(s: &str) -> Result<Self, CoreError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| CoreError::InvalidId(format!("base58: {e}")))?;
        let bytes: [u8; ID_WIDTH] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| CoreError::InvalidId(format!("expected 31 bytes, got {}", v.len())))?;

        let typ = IdType([bytes[0], bytes[1]]);
        let mut genesis = [0u8; GENESIS_WIDTH];
        genesis.copy_from_slice(&bytes[2..2 + GENESIS_WIDTH]);
        let expected = Self::checksum(typ, &genesis);
        if bytes[2 + GENESIS_WIDTH..] != expected {
            return Err(CoreError::InvalidId(format!("checksum mismatch in \"{s}\"")));
        }

        Ok(Id(bytes))
    }

    /// Little-endian byte sum over the type tag and genesis bytes.
    fn checksum(typ: IdType, genesis: &[u8; GENESIS_WIDTH]) -> [u8; 2] {
        let sum: u16 = typ
            .0
            .iter()
            .chain(genesis.iter())
            .map(|b| u16::from(*b))
            .fold(0u16, u16::wrapping_add);
        sum.to_le_bytes()
    }

    /// The identifier's type tag.
    pub fn id_type(&self) -> IdType {
        IdType([self.0[0], self.0[1]])
    }

    /// The raw 31 bytes.
    pub fn as_bytes(&self) -> &[u8; ID_WIDTH] {
        &self.0
    }

    /// The identifier as a little-endian field integer, the form the
    /// state contract and the circuits key on.
    pub fn big_int(&self) -> BigInt {
        bytes_to_field_int(&self.0, ByteOrder::LittleEndian)
    }

    /// The base58 string form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

/// A W3C DID wrapping a genesis [`Id`].
///
/// Only the `iden3` method with the read-only network flag is mapped;
/// identifiers carrying other tags are rejected rather than rendered with
/// a wrong network segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Did {
    id: Id,
}

impl Did {
    /// Wrap an identifier, validating that its type tag maps to a known
    /// method and network.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDid`] for unmapped type tags.
    pub fn from_id(id: Id) -> Result<Self, CoreError> {
        let typ = id.id_type();
        if typ.method_byte() != METHOD_BYTE_IDEN3 || typ.network_byte() != NETWORK_FLAG_READONLY {
            return Err(CoreError::InvalidDid {
                value: id.to_base58(),
                reason: format!(
                    "unmapped id type {:#04x}{:02x}",
                    typ.method_byte(),
                    typ.network_byte()
                ),
            });
        }
        Ok(Did { id })
    }

    /// Parse a DID string of the form `did:iden3:readonly:<base58>`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDid`] when the syntax, method, network
    /// segment, or embedded identifier is invalid.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidDid {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 || parts[0] != "did" {
            return Err(invalid("expected did:iden3:readonly:<id>"));
        }
        if parts[1] != "iden3" {
            return Err(invalid("unknown method"));
        }
        if parts[2] != "readonly" {
            return Err(invalid("unknown network"));
        }

        let id = Id::from_base58(parts[3]).map_err(|e| CoreError::InvalidDid {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Did::from_id(id).map_err(|_| invalid("id type does not match network segment"))
    }

    /// The DID method name.
    pub fn method(&self) -> &'static str {
        "iden3"
    }

    /// The network segment.
    pub fn network(&self) -> &'static str {
        "readonly"
    }

    /// The embedded genesis identifier.
    pub fn id(&self) -> &Id {
        &self.id
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "did:{}:{}:{}", self.method(), self.network(), self.id)
    }
}
