//! # Baby Jubjub keys and Poseidon-flavoured signing
//!
//! Wraps `babyjubjub-rs` (circomlib-compatible EdDSA) behind zeroizing key
//! material and big-integer coordinates. Challenge signing is
//! deterministic: the nonce derives from the key and message, so the same
//! key and challenge always produce the same signature — the property the
//! exact-input regression tests rely on.

use num_bigint::BigInt;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::poseidon::{fr_from_bigint, fr_to_bigint};

/// A Baby Jubjub private key. 32 bytes, zeroized on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A public key as affine curve coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// X coordinate.
    pub x: BigInt,
    /// Y coordinate.
    pub y: BigInt,
}

/// An EdDSA signature in the three-scalar form the circuits consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseidonSignature {
    /// X coordinate of the nonce point R8.
    pub r8_x: BigInt,
    /// Y coordinate of the nonce point R8.
    pub r8_y: BigInt,
    /// The scalar S.
    pub s: BigInt,
}

impl PrivateKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        PrivateKey { bytes }
    }

    /// Import a key from 64 hex digits.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedHex`] on bad hex or wrong width.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let decoded = hex::decode(s).map_err(|e| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| CryptoError::MalformedHex {
            value: s.to_string(),
            reason: format!("expected 32 bytes, got {}", v.len()),
        })?;
        Ok(PrivateKey { bytes })
    }

    fn inner(&self) -> Result<babyjubjub_rs::PrivateKey, CryptoError> {
        babyjubjub_rs::PrivateKey::import(self.bytes.to_vec()).map_err(CryptoError::Key)
    }

    /// Derive the public key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Key`] if the key bytes cannot be imported.
    pub fn public(&self) -> Result<PublicKey, CryptoError> {
        let point = self.inner()?.public();
        Ok(PublicKey {
            x: fr_to_bigint(&point.x),
            y: fr_to_bigint(&point.y),
        })
    }

    /// Sign a field integer with Poseidon-flavoured EdDSA.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Key`] if signing fails.
    pub fn sign_poseidon(&self, message: &BigInt) -> Result<PoseidonSignature, CryptoError> {
        let signature = self.inner()?.sign(message.clone()).map_err(CryptoError::Key)?;
        Ok(PoseidonSignature {
            r8_x: fr_to_bigint(&signature.r_b8.x),
            r8_y: fr_to_bigint(&signature.r_b8.y),
            s: signature.s,
        })
    }
}

/// Verify a signature against a public key and message.
///
/// # Errors
///
/// Returns [`CryptoError::FieldOverflow`] if the coordinates are outside
/// the field.
pub fn verify(
    public_key: &PublicKey,
    signature: &PoseidonSignature,
    message: &BigInt,
) -> Result<bool, CryptoError> {
    let pk = babyjubjub_rs::Point {
        x: fr_from_bigint(&public_key.x)?,
        y: fr_from_bigint(&public_key.y)?,
    };
    let sig = babyjubjub_rs::Signature {
        r_b8: babyjubjub_rs::Point {
            x: fr_from_bigint(&signature.r8_x)?,
            y: fr_from_bigint(&signature.r8_y)?,
        },
        s: signature.s.clone(),
    };
    Ok(babyjubjub_rs::verify(pk, sig, message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SK_HEX: &str = "0001020304050607080900010203040506070809000102030405060708090001";

    /// circomlib / reference-implementation key-derivation vector.
    #[test]
    fn public_key_matches_reference_vector() {
        let sk = PrivateKey::from_hex(SK_HEX).unwrap();
        let pk = sk.public().unwrap();
        assert_eq!(
            pk.x.to_string(),
            "13277427435165878497778222415993513565335242147425444199013288855685581939618"
        );
        assert_eq!(
            pk.y.to_string(),
            "13622229784656158136036771217484571176836296686641868549125388198837476602820"
        );
    }

    #[test]
    fn signing_is_deterministic_and_verifies() {
        let sk = PrivateKey::from_hex(SK_HEX).unwrap();
        let msg = BigInt::from(123_456_789_u64);
        let a = sk.sign_poseidon(&msg).unwrap();
        let b = sk.sign_poseidon(&msg).unwrap();
        assert_eq!(a, b);

        let pk = sk.public().unwrap();
        assert!(verify(&pk, &a, &msg).unwrap());
        assert!(!verify(&pk, &a, &BigInt::from(987_654_321_u64)).unwrap());
    }

    #[test]
    fn generated_keys_differ() {
        let a = PrivateKey::generate().public().unwrap();
        let b = PrivateKey::generate().public().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(PrivateKey::from_hex("zz").is_err());
        assert!(PrivateKey::from_hex("abcd").is_err());
    }

    #[test]
    fn debug_redacts_key_material() {
        let sk = PrivateKey::from_hex(SK_HEX).unwrap();
        let printed = format!("{sk:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("0001020304"));
    }
}
