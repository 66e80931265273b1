//! # Merkle proof wire form
//!
//! The JSON shape Merkle point proofs travel in, shared by credential
//! issuance proofs and revocation-status responses: decimal-string
//! siblings and an optional `node_aux` neighbor.

use serde::{Deserialize, Serialize};
use zkid_crypto::{FieldHash, MtProof, NodeAux};

/// The occupied-neighbor pair of a non-inclusion proof, as transported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAuxDto {
    /// The neighbor leaf's key.
    pub key: FieldHash,
    /// The neighbor leaf's value.
    pub value: FieldHash,
}

/// A Merkle point proof as transported in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtProofDto {
    /// Whether the queried key is present.
    pub existence: bool,
    /// Sibling hashes, root side first.
    #[serde(default)]
    pub siblings: Vec<FieldHash>,
    /// Occupied neighbor for non-inclusion against a foreign leaf.
    #[serde(rename = "node_aux", default, skip_serializing_if = "Option::is_none")]
    pub node_aux: Option<NodeAuxDto>,
}

impl MtProofDto {
    /// Convert into the in-memory proof form.
    pub fn to_proof(&self) -> MtProof {
        MtProof {
            existence: self.existence,
            siblings: self.siblings.clone(),
            node_aux: self.node_aux.as_ref().map(|aux| NodeAux {
                key: aux.key,
                value: aux.value,
            }),
        }
    }

    /// Build the wire form from an in-memory proof.
    pub fn from_proof(proof: &MtProof) -> Self {
        MtProofDto {
            existence: proof.existence,
            siblings: proof.siblings.clone(),
            node_aux: proof.node_aux.map(|aux| NodeAuxDto {
                key: aux.key,
                value: aux.value,
            }),
        }
    }
}
