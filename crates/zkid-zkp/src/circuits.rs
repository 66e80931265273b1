//! # Circuit identifiers and input records
//!
//! The closed set of supported circuits, the static circuit-id →
//! issuance-proof-type table, and the two input records in their exact
//! wire shape. Hashes and claim slots serialize as decimal strings; the
//! comparison-value array is always 64 entries.

use serde::{Deserialize, Serialize};
use zkid_core::constants::DEFAULT_VALUE_ARRAY_SIZE;
use zkid_core::ProofType;
use zkid_crypto::{Claim, FieldHash};

use crate::error::ZkpError;

/// The circuits this core prepares inputs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitId {
    /// Self-authentication.
    #[serde(rename = "authV2")]
    AuthV2,
    /// Selective disclosure, Merkle-proof-backed issuance, off-chain
    /// verification.
    #[serde(rename = "credentialAtomicQueryMTPV2")]
    AtomicQueryMtpV2,
    /// Selective disclosure, Merkle-proof-backed issuance, on-chain
    /// verification.
    #[serde(rename = "credentialAtomicQueryMTPV2OnChain")]
    AtomicQueryMtpV2OnChain,
    /// Selective disclosure, signature-backed issuance, off-chain
    /// verification.
    #[serde(rename = "credentialAtomicQuerySigV2")]
    AtomicQuerySigV2,
    /// Selective disclosure, signature-backed issuance, on-chain
    /// verification.
    #[serde(rename = "credentialAtomicQuerySigV2OnChain")]
    AtomicQuerySigV2OnChain,
}

impl CircuitId {
    /// The circuit's wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            CircuitId::AuthV2 => "authV2",
            CircuitId::AtomicQueryMtpV2 => "credentialAtomicQueryMTPV2",
            CircuitId::AtomicQueryMtpV2OnChain => "credentialAtomicQueryMTPV2OnChain",
            CircuitId::AtomicQuerySigV2 => "credentialAtomicQuerySigV2",
            CircuitId::AtomicQuerySigV2OnChain => "credentialAtomicQuerySigV2OnChain",
        }
    }

    /// The issuance-proof type a query circuit expects. This is the
    /// static dispatch table: MTP circuits consume Merkle-proof-backed
    /// issuance, Sig circuits signature-backed issuance.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::UnsupportedProofType`] for circuits that do
    /// not consume an issuance proof.
    pub fn proof_type(self) -> Result<ProofType, ZkpError> {
        match self {
            CircuitId::AtomicQueryMtpV2 | CircuitId::AtomicQueryMtpV2OnChain => {
                Ok(ProofType::Iden3SparseMerkleTree)
            }
            CircuitId::AtomicQuerySigV2 | CircuitId::AtomicQuerySigV2OnChain => {
                Ok(ProofType::BjjSignature)
            }
            CircuitId::AuthV2 => Err(ZkpError::UnsupportedProofType(self.as_str().to_string())),
        }
    }
}

impl std::fmt::Display for CircuitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pad a comparison-value list to the fixed 64-entry wire width.
pub(crate) fn pad_values(values: &[num_bigint::BigInt]) -> Vec<String> {
    let mut padded: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    padded.resize(DEFAULT_VALUE_ARRAY_SIZE, "0".to_string());
    padded
}

/// Inputs for the self-authentication circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCircuitInputs {
    /// The holder's genesis id as a decimal string.
    #[serde(rename = "genesisID")]
    pub genesis_id: String,
    /// Profile nonce; always zero here (multi-profile identities are out
    /// of scope).
    pub profile_nonce: String,

    /// The authentication claim.
    pub auth_claim: Claim,
    /// Inclusion proof siblings, padded to the identity-tree depth.
    pub auth_claim_inc_mtp: Vec<FieldHash>,
    /// Non-revocation proof siblings, padded to the identity-tree depth.
    pub auth_claim_non_rev_mtp: Vec<FieldHash>,
    /// Non-revocation neighbor key.
    pub auth_claim_non_rev_mtp_aux_hi: FieldHash,
    /// Non-revocation neighbor value.
    pub auth_claim_non_rev_mtp_aux_hv: FieldHash,
    /// Non-revocation neighbor marker.
    pub auth_claim_non_rev_mtp_no_aux: String,

    /// The signed challenge as a decimal string.
    pub challenge: String,
    /// Challenge signature, R8 x coordinate.
    pub challenge_signature_r8x: String,
    /// Challenge signature, R8 y coordinate.
    pub challenge_signature_r8y: String,
    /// Challenge signature, scalar S.
    pub challenge_signature_s: String,

    /// Claims-tree root.
    pub claims_tree_root: FieldHash,
    /// Revocation-tree root.
    pub rev_tree_root: FieldHash,
    /// Roots-tree root.
    pub roots_tree_root: FieldHash,
    /// Aggregate identity state.
    pub state: FieldHash,

    /// The GIST root the proof is anchored to.
    pub gist_root: FieldHash,
    /// GIST proof siblings, padded to the on-chain depth.
    pub gist_mtp: Vec<FieldHash>,
    /// GIST neighbor key.
    pub gist_mtp_aux_hi: FieldHash,
    /// GIST neighbor value.
    pub gist_mtp_aux_hv: FieldHash,
    /// GIST neighbor marker.
    pub gist_mtp_no_aux: String,
}

impl AuthCircuitInputs {
    /// Serialize the record for the external prover.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::Serialization`] if encoding fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ZkpError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Inputs for the selective-disclosure on-chain circuit
/// (Merkle-proof-backed issuance).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicQueryMtpV2OnChainInputs {
    /// Caller-supplied request id.
    #[serde(rename = "requestID")]
    pub request_id: String,

    /// The holder's genesis id as a decimal string.
    #[serde(rename = "userGenesisID")]
    pub user_genesis_id: String,
    /// Holder profile nonce; always zero here.
    pub profile_nonce: String,
    /// Subject profile nonce; always zero here.
    pub claim_subject_profile_nonce: String,

    /// The issuer's numeric id.
    #[serde(rename = "issuerID")]
    pub issuer_id: String,
    /// The credential's core claim.
    pub issuer_claim: Claim,
    /// Issuer inclusion proof siblings, padded.
    pub issuer_claim_mtp: Vec<FieldHash>,
    /// Issuer claims-tree root at issuance.
    pub issuer_claim_claims_tree_root: FieldHash,
    /// Issuer revocation-tree root at issuance.
    pub issuer_claim_rev_tree_root: FieldHash,
    /// Issuer roots-tree root at issuance.
    pub issuer_claim_roots_tree_root: FieldHash,
    /// Issuer aggregate state at issuance.
    pub issuer_claim_iden_state: FieldHash,

    /// Issuer claims-tree root at the non-revocation check.
    pub issuer_claim_non_rev_claims_tree_root: FieldHash,
    /// Issuer revocation-tree root at the non-revocation check.
    pub issuer_claim_non_rev_rev_tree_root: FieldHash,
    /// Issuer roots-tree root at the non-revocation check.
    pub issuer_claim_non_rev_roots_tree_root: FieldHash,
    /// Issuer aggregate state at the non-revocation check.
    pub issuer_claim_non_rev_state: FieldHash,
    /// Non-revocation proof siblings, padded.
    pub issuer_claim_non_rev_mtp: Vec<FieldHash>,
    /// Non-revocation neighbor key.
    pub issuer_claim_non_rev_mtp_aux_hi: FieldHash,
    /// Non-revocation neighbor value.
    pub issuer_claim_non_rev_mtp_aux_hv: FieldHash,
    /// Non-revocation neighbor marker.
    pub issuer_claim_non_rev_mtp_no_aux: String,

    /// The claim schema as a decimal string.
    pub claim_schema: String,

    /// 1 when the document path proof is a non-inclusion proof.
    pub claim_path_not_exists: u8,
    /// Document path proof siblings, padded to the merklization depth.
    pub claim_path_mtp: Vec<FieldHash>,
    /// Document path neighbor marker.
    pub claim_path_mtp_no_aux: String,
    /// Document path neighbor key.
    pub claim_path_mtp_aux_hi: FieldHash,
    /// Document path neighbor value.
    pub claim_path_mtp_aux_hv: FieldHash,
    /// The merklized field path key.
    pub claim_path_key: String,
    /// The merklized field value entry.
    pub claim_path_value: String,

    /// The comparison operator code.
    pub operator: i32,
    /// Claim slot index for non-merklized queries.
    pub slot_index: usize,
    /// Assembly wall-clock timestamp (UTC epoch seconds).
    pub timestamp: i64,
    /// Comparison values, padded to 64 entries.
    pub value: Vec<String>,

    /// Always 1: revocation is checked in this pipeline.
    pub is_revocation_checked: u8,

    /// The signed challenge as a decimal string.
    pub challenge: String,
    /// Challenge signature, R8 x coordinate.
    pub challenge_signature_r8x: String,
    /// Challenge signature, R8 y coordinate.
    pub challenge_signature_r8y: String,
    /// Challenge signature, scalar S.
    pub challenge_signature_s: String,

    /// The pinned GIST root.
    pub gist_root: FieldHash,
    /// GIST proof siblings, padded to the on-chain depth.
    pub gist_mtp: Vec<FieldHash>,
    /// GIST neighbor key.
    pub gist_mtp_aux_hi: FieldHash,
    /// GIST neighbor value.
    pub gist_mtp_aux_hv: FieldHash,
    /// GIST neighbor marker.
    pub gist_mtp_no_aux: String,

    /// The holder's authentication claim.
    pub auth_claim: Claim,
    /// Holder auth inclusion proof siblings, padded.
    pub auth_claim_inc_mtp: Vec<FieldHash>,
    /// Holder auth non-revocation proof siblings, padded.
    pub auth_claim_non_rev_mtp: Vec<FieldHash>,
    /// Holder non-revocation neighbor key.
    pub auth_claim_non_rev_mtp_aux_hi: FieldHash,
    /// Holder non-revocation neighbor value.
    pub auth_claim_non_rev_mtp_aux_hv: FieldHash,
    /// Holder non-revocation neighbor marker.
    pub auth_claim_non_rev_mtp_no_aux: String,

    /// Holder claims-tree root.
    pub user_claims_tree_root: FieldHash,
    /// Holder revocation-tree root.
    pub user_rev_tree_root: FieldHash,
    /// Holder roots-tree root.
    pub user_roots_tree_root: FieldHash,
    /// Holder aggregate state.
    pub user_state: FieldHash,
}

impl AtomicQueryMtpV2OnChainInputs {
    /// Serialize the record for the external prover.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::Serialization`] if encoding fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ZkpError> {
        Ok(serde_json::to_vec(self)?)
    }
}
