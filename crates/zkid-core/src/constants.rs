//! # Circuit Constants
//!
//! Fixed Merkle depths and the closed query-operator enumeration. The
//! depths are circuit parameters: an identity tree proof and an on-chain
//! global-state proof are padded to different fixed lengths, and a
//! document-merklization proof to a third.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Depth of identity-tree proofs (claims / revocations / roots).
pub const DEFAULT_MT_LEVELS: usize = 40;

/// Width of the comparison-value array in query circuits.
pub const DEFAULT_VALUE_ARRAY_SIZE: usize = 64;

/// Depth of global identity-state (GIST) proofs.
pub const DEFAULT_MT_LEVELS_ON_CHAIN: usize = 64;

/// Depth of credential-document merklization proofs.
pub const DEFAULT_MT_LEVELS_CLAIMS_MERKLIZATION: usize = 32;

/// Comparison operators understood by the query circuits.
///
/// The numeric codes are part of the circuit wire contract and must not
/// be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Operator {
    /// No comparison; the query proves possession only.
    Noop,
    /// Equality.
    Eq,
    /// Strictly less than.
    Lt,
    /// Strictly greater than.
    Gt,
    /// Membership in the value set.
    In,
    /// Non-membership in the value set.
    Nin,
    /// Inequality.
    Ne,
}

impl Operator {
    /// The operator's numeric wire code.
    pub fn code(self) -> i32 {
        match self {
            Operator::Noop => 0,
            Operator::Eq => 1,
            Operator::Lt => 2,
            Operator::Gt => 3,
            Operator::In => 4,
            Operator::Nin => 5,
            Operator::Ne => 6,
        }
    }

    /// The operator's request-syntax name (`$eq`, `$lt`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Operator::Noop => "$noop",
            Operator::Eq => "$eq",
            Operator::Lt => "$lt",
            Operator::Gt => "$gt",
            Operator::In => "$in",
            Operator::Nin => "$nin",
            Operator::Ne => "$ne",
        }
    }

    /// Look up an operator by numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedOperator`] for codes outside the
    /// closed enumeration.
    pub fn from_code(code: i32) -> Result<Self, CoreError> {
        match code {
            0 => Ok(Operator::Noop),
            1 => Ok(Operator::Eq),
            2 => Ok(Operator::Lt),
            3 => Ok(Operator::Gt),
            4 => Ok(Operator::In),
            5 => Ok(Operator::Nin),
            6 => Ok(Operator::Ne),
            other => Err(CoreError::UnsupportedOperator(other.to_string())),
        }
    }

    /// Look up an operator by request-syntax name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedOperator`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "$noop" => Ok(Operator::Noop),
            "$eq" => Ok(Operator::Eq),
            "$lt" => Ok(Operator::Lt),
            "$gt" => Ok(Operator::Gt),
            "$in" => Ok(Operator::In),
            "$nin" => Ok(Operator::Nin),
            "$ne" => Ok(Operator::Ne),
            other => Err(CoreError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl From<Operator> for i32 {
    fn from(op: Operator) -> i32 {
        op.code()
    }
}

impl TryFrom<i32> for Operator {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Operator::from_code(code)
    }
}

/// Kinds of issuance proof a credential can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    /// Baby Jubjub signature over the core claim.
    #[serde(rename = "BJJSignature2021")]
    BjjSignature,
    /// Sparse-Merkle-tree inclusion proof against the issuer's claims tree.
    #[serde(rename = "Iden3SparseMerkleTreeProof")]
    Iden3SparseMerkleTree,
}

impl ProofType {
    /// The proof type's wire name as it appears in credential `proof.type`
    /// fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ProofType::BjjSignature => "BJJSignature2021",
            ProofType::Iden3SparseMerkleTree => "Iden3SparseMerkleTreeProof",
        }
    }
}
