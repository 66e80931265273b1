//! # Poseidon hashing over field integers
//!
//! Thin wrapper around `poseidon-rs` (the circomlib-compatible parameter
//! set) with conversions between `num-bigint` integers and the `ff` field
//! representation. Everything downstream — claim tree keys, Merkle node
//! hashes, the aggregate identity state — goes through
//! [`hash_elems`].

use std::sync::OnceLock;

use ff::PrimeField;
use num_bigint::{BigInt, Sign};
use poseidon_rs::{Fr, Poseidon};

use crate::error::CryptoError;
use crate::hash::{field_modulus, FieldHash};

/// Maximum input arity of the parameter set.
const MAX_INPUTS: usize = 6;

fn poseidon() -> &'static Poseidon {
    static POSEIDON: OnceLock<Poseidon> = OnceLock::new();
    POSEIDON.get_or_init(Poseidon::new)
}

/// Convert a field integer to an `Fr` element.
///
/// # Errors
///
/// Returns [`CryptoError::FieldOverflow`] for values outside the field.
pub fn fr_from_bigint(value: &BigInt) -> Result<Fr, CryptoError> {
    if value.sign() == Sign::Minus || value >= field_modulus() {
        return Err(CryptoError::FieldOverflow(value.to_string()));
    }
    Fr::from_str(&value.to_string())
        .ok_or_else(|| CryptoError::FieldOverflow(value.to_string()))
}

/// Convert an `Fr` element back to a field integer.
pub fn fr_to_bigint(value: &Fr) -> BigInt {
    let repr = value.into_repr();
    let limbs: &[u64] = repr.as_ref();
    let mut bytes = Vec::with_capacity(limbs.len() * 8);
    for limb in limbs {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    BigInt::from_bytes_le(Sign::Plus, &bytes)
}

/// Poseidon-hash up to six field integers into a field hash.
///
/// # Errors
///
/// Returns [`CryptoError::Hash`] for empty or oversized input and
/// [`CryptoError::FieldOverflow`] for elements outside the field.
pub fn hash_elems(elems: &[BigInt]) -> Result<FieldHash, CryptoError> {
    if elems.is_empty() || elems.len() > MAX_INPUTS {
        return Err(CryptoError::Hash(format!(
            "poseidon arity must be 1..={MAX_INPUTS}, got {}",
            elems.len()
        )));
    }
    let inputs = elems
        .iter()
        .map(fr_from_bigint)
        .collect::<Result<Vec<_>, _>>()?;
    let out = poseidon().hash(inputs).map_err(CryptoError::Hash)?;
    FieldHash::from_big_int(&fr_to_bigint(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fr_round_trip() {
        let value = BigInt::from(987_654_321_u64);
        let fr = fr_from_bigint(&value).unwrap();
        assert_eq!(fr_to_bigint(&fr), value);
    }

    #[test]
    fn fr_rejects_out_of_field() {
        assert!(fr_from_bigint(field_modulus()).is_err());
        assert!(fr_from_bigint(&BigInt::from(-5)).is_err());
    }

    /// circomlib reference vectors for the shared parameter set.
    #[test]
    fn matches_circomlib_vectors() {
        let one = hash_elems(&[BigInt::from(1)]).unwrap();
        assert_eq!(
            one.big_int().to_string(),
            "18586133768512220936620570745912940619677854269274689475585506675881198879027"
        );

        let two = hash_elems(&[BigInt::from(1), BigInt::from(2)]).unwrap();
        assert_eq!(
            two.big_int().to_string(),
            "7853200120776062878684798364095072458815029376092732009249414926327459813530"
        );
    }

    #[test]
    fn is_deterministic_and_input_sensitive() {
        let a = hash_elems(&[BigInt::from(7), BigInt::from(8)]).unwrap();
        let b = hash_elems(&[BigInt::from(7), BigInt::from(8)]).unwrap();
        let c = hash_elems(&[BigInt::from(8), BigInt::from(7)]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_bad_arity() {
        assert!(matches!(hash_elems(&[]), Err(CryptoError::Hash(_))));
        let seven: Vec<BigInt> = (0..7).map(BigInt::from).collect();
        assert!(matches!(hash_elems(&seven), Err(CryptoError::Hash(_))));
    }
}
