//! # Proof normalization
//!
//! Converts raw Merkle point proofs into the fixed shapes circuits
//! consume: siblings padded to a circuit-specific depth, and the
//! tri-state non-membership descriptor.
//!
//! The descriptor's three cases are the authoritative contract:
//!
//! | existence | neighbor | key/value     | noAux |
//! |-----------|----------|---------------|-------|
//! | true      | —        | zero / zero   | "0"   |
//! | false     | present  | neighbor pair | "0"   |
//! | false     | absent   | zero / zero   | "1"   |
//!
//! Collapsing any two of these breaks circuit correctness.

use serde::Serialize;
use zkid_chain::RawGistProof;
use zkid_crypto::{FieldHash, MtProof, NodeAux};

use crate::error::ZkpError;

/// Pad a sibling array with zero hashes to exactly `target_depth`.
///
/// # Errors
///
/// Returns [`ZkpError::ProofTooDeep`] if the input already exceeds the
/// target depth — a configuration mismatch between identity and circuit,
/// always fatal.
pub fn pad_siblings(siblings: &[FieldHash], target_depth: usize) -> Result<Vec<FieldHash>, ZkpError> {
    if siblings.len() > target_depth {
        return Err(ZkpError::ProofTooDeep {
            got: siblings.len(),
            max: target_depth,
        });
    }
    let mut padded = siblings.to_vec();
    padded.resize(target_depth, FieldHash::ZERO);
    Ok(padded)
}

/// The tri-state non-membership descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeAuxValue {
    /// Neighbor leaf key, or zero.
    pub key: FieldHash,
    /// Neighbor leaf value, or zero.
    pub value: FieldHash,
    /// `"1"` only for non-membership with no neighbor in the tree.
    pub no_aux: String,
}

/// Derive the descriptor for a point proof.
pub fn node_aux_value(proof: &MtProof) -> NodeAuxValue {
    match (proof.existence, proof.node_aux) {
        (true, _) => NodeAuxValue {
            key: FieldHash::ZERO,
            value: FieldHash::ZERO,
            no_aux: "0".to_string(),
        },
        (false, Some(NodeAux { key, value })) => NodeAuxValue {
            key,
            value,
            no_aux: "0".to_string(),
        },
        (false, None) => NodeAuxValue {
            key: FieldHash::ZERO,
            value: FieldHash::ZERO,
            no_aux: "1".to_string(),
        },
    }
}

/// A GIST proof in circuit form: the anchored root plus a normalized
/// point proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistProof {
    /// The global tree root the proof is anchored to.
    pub root: FieldHash,
    /// The point proof.
    pub proof: MtProof,
}

/// Convert a raw contract proof into circuit form: field conversion for
/// the root and siblings, and the neighbor mapped per the descriptor
/// contract (a neighbor is only meaningful for non-inclusion).
///
/// # Errors
///
/// Returns [`ZkpError::Crypto`] when any component is outside the field.
pub fn to_circuit_gist(raw: &RawGistProof) -> Result<GistProof, ZkpError> {
    let root = FieldHash::from_big_int(&raw.root)?;
    let siblings = raw
        .siblings
        .iter()
        .map(FieldHash::from_big_int)
        .collect::<Result<Vec<_>, _>>()?;

    let node_aux = if !raw.existence && raw.aux_existence {
        Some(NodeAux {
            key: FieldHash::from_big_int(&raw.aux_index)?,
            value: FieldHash::from_big_int(&raw.aux_value)?,
        })
    } else {
        None
    };

    Ok(GistProof {
        root,
        proof: MtProof {
            existence: raw.existence,
            siblings,
            node_aux,
        },
    })
}
