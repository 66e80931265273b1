//! # Selective-disclosure query building
//!
//! Converts a high-level predicate request into the circuit's query
//! representation. Two disjoint strategies:
//!
//! - **non-merklized** — the value lives directly in a claim slot; the
//!   query carries the operator, the literal, and the slot index;
//! - **merklized** — the subject is addressed through its JSON-LD
//!   merklization; the query carries a value proof for the field's
//!   `(path, value)` pair.
//!
//! The merklized path performs the workspace's only document fetch (the
//!   JSON-LD context); callers own retry and caching policy for it.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use zkid_core::codec::{bytes_to_field_int, ByteOrder};
use zkid_core::Operator;
use zkid_crypto::MtProof;
use zkid_vc::{DocumentLoader, W3CCredential};

use crate::circuits::CircuitId;
use crate::error::ZkpError;
use crate::merklize::{
    path_entry, resolve_field_iri, value_entry, DocumentMerklizer, CREDENTIAL_SUBJECT_IRI,
};

/// The caller's predicate over one credential field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofQuery {
    /// The subject field to prove over.
    pub subject_field_name: String,
    /// The comparison value, as a decimal string.
    pub subject_field_value: String,
    /// The comparison operator.
    pub operator: Operator,
    /// Claim slot holding the value, for non-merklized credentials.
    /// Absent means the credential subject is merklized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<usize>,
}

/// A request to produce one proof. Transient and request-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProofRequest {
    /// Caller-supplied monotonic request id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    /// The target circuit.
    pub circuit_id: CircuitId,
    /// Explicit challenge, hex-encoded without prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    /// Account address whose low-order bytes stand in for a missing
    /// challenge, `0x`-prefixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_address: Option<String>,
    /// The predicate.
    pub query: ProofQuery,
}

/// A merklization value proof: the field's path key, its value entry,
/// and the inclusion proof binding them to the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueProof {
    /// The path key.
    pub path: BigInt,
    /// The value entry.
    pub value: BigInt,
    /// The document-tree point proof.
    pub mtp: MtProof,
}

/// The circuit-side query representation.
#[derive(Debug, Clone)]
pub struct CircuitQuery {
    /// The comparison operator.
    pub operator: Operator,
    /// The comparison values.
    pub values: Vec<BigInt>,
    /// Claim slot index (non-merklized queries; zero otherwise).
    pub slot_index: usize,
    /// The merklization value proof (merklized queries only).
    pub value_proof: Option<ValueProof>,
}

/// Decode the request's challenge: the explicit hex challenge when
/// given, otherwise the account address's bytes. Either way the bytes
/// are interpreted little-endian, matching the signing convention of the
/// on-chain verifier.
///
/// # Errors
///
/// Returns [`ZkpError::InputInvalid`] when neither field is present or
/// the hex does not decode.
pub fn decode_challenge(request: &CreateProofRequest) -> Result<BigInt, ZkpError> {
    let hex_payload = match (&request.challenge, &request.account_address) {
        (Some(challenge), _) => challenge.clone(),
        (None, Some(address)) => address
            .strip_prefix("0x")
            .ok_or_else(|| {
                ZkpError::InputInvalid(format!("account address without 0x prefix: {address}"))
            })?
            .to_string(),
        (None, None) => {
            return Err(ZkpError::InputInvalid(
                "request carries neither challenge nor account address".to_string(),
            ))
        }
    };

    let bytes = hex::decode(&hex_payload)
        .map_err(|e| ZkpError::InputInvalid(format!("challenge hex: {e}")))?;
    Ok(bytes_to_field_int(&bytes, ByteOrder::LittleEndian))
}

/// Build the circuit query for a credential and request.
///
/// Non-merklized queries never touch the network; merklized queries load
/// the credential's subject-schema context (the third `@context` entry)
/// through `loader` and prove the field inside the document tree.
///
/// # Errors
///
/// Unknown operators and malformed values fail before any network call;
/// the merklized path adds [`ZkpError::DocumentLoad`] and
/// [`ZkpError::InputInvalid`] for unresolvable fields.
pub async fn build_query(
    credential: &W3CCredential,
    request: &CreateProofRequest,
    loader: &DocumentLoader,
) -> Result<CircuitQuery, ZkpError> {
    let value = BigInt::parse_bytes(request.query.subject_field_value.as_bytes(), 10)
        .ok_or_else(|| {
            ZkpError::InputInvalid(format!(
                "subject field value is not a decimal integer: {}",
                request.query.subject_field_value
            ))
        })?;
    let operator = request.query.operator;

    if let Some(slot_index) = request.query.slot_index {
        return Ok(CircuitQuery {
            operator,
            values: vec![value],
            slot_index,
            value_proof: None,
        });
    }

    let context_url = credential.context.get(2).ok_or_else(|| {
        ZkpError::InputInvalid("credential carries no subject-schema context".to_string())
    })?;
    let type_name = credential.credential_type.get(1).ok_or_else(|| {
        ZkpError::InputInvalid("credential carries no subject type".to_string())
    })?;

    let context_doc = loader
        .load(context_url)
        .await
        .map_err(ZkpError::DocumentLoad)?;

    let field = &request.query.subject_field_name;
    let field_iri = resolve_field_iri(&context_doc, type_name, field).ok_or_else(|| {
        ZkpError::InputInvalid(format!(
            "field \"{field}\" is not defined for type \"{type_name}\""
        ))
    })?;

    let merklizer =
        DocumentMerklizer::build(&credential.credential_subject, type_name, &context_doc)?;
    let path = path_entry(&[CREDENTIAL_SUBJECT_IRI, &field_iri])?;
    let mtp = merklizer.prove(&path)?;

    let field_value = credential
        .credential_subject
        .get(field)
        .ok_or_else(|| ZkpError::InputInvalid(format!("subject has no field \"{field}\"")))?;
    let entry = value_entry(field_value)?;

    Ok(CircuitQuery {
        operator,
        values: vec![value],
        slot_index: 0,
        value_proof: Some(ValueProof {
            path,
            value: entry,
            mtp,
        }),
    })
}
