//! # Aggregate tree state
//!
//! The snapshot of an identity's three Merkle roots and the state hash
//! binding them: `state = H(claims_root, revocation_root, root_of_roots)`.
//! The state field is always recomputed from the roots — there is no
//! constructor that accepts it independently.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::hash::FieldHash;
use crate::poseidon::hash_elems;

/// An immutable snapshot of the three identity tree roots and their
/// aggregate state hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeState {
    /// `H(claims_root, revocation_root, root_of_roots)`.
    pub state: FieldHash,
    /// Root of the claims tree.
    pub claims_root: FieldHash,
    /// Root of the revocations tree.
    pub revocation_root: FieldHash,
    /// Root of the roots tree.
    pub root_of_roots: FieldHash,
}

impl TreeState {
    /// Compute the snapshot for three roots.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Hash`] if hashing fails.
    pub fn derive(
        claims_root: FieldHash,
        revocation_root: FieldHash,
        root_of_roots: FieldHash,
    ) -> Result<Self, CryptoError> {
        let state = hash_elems(&[
            claims_root.big_int(),
            revocation_root.big_int(),
            root_of_roots.big_int(),
        ])?;
        Ok(TreeState {
            state,
            claims_root,
            revocation_root,
            root_of_roots,
        })
    }

    /// Rebuild a snapshot from roots a peer declared alongside a state
    /// hash, verifying that the declared state matches the recomputation.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::StateMismatch`] when the declared hash does
    /// not equal `H(claims, revocations, roots)`.
    pub fn verify_declared(
        declared_state: FieldHash,
        claims_root: FieldHash,
        revocation_root: FieldHash,
        root_of_roots: FieldHash,
    ) -> Result<Self, CryptoError> {
        let rebuilt = Self::derive(claims_root, revocation_root, root_of_roots)?;
        if rebuilt.state != declared_state {
            return Err(CryptoError::StateMismatch {
                declared: declared_state.to_string(),
                recomputed: rebuilt.state.to_string(),
            });
        }
        Ok(rebuilt)
    }
}
