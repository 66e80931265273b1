//! # W3C credential model
//!
//! The credential envelope with an extensible subject, and the tagged
//! union over issuance-proof kinds. A credential's `proof` field arrives
//! as either a single object or an array; each element is dispatched on
//! its `type` tag. Unknown proof kinds are preserved with their raw
//! payload rather than rejected, so a credential issued with a newer
//! proof suite still parses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use zkid_core::ProofType;
use zkid_crypto::Claim;

use crate::error::CredentialError;
use crate::proof::MtProofDto;

/// A W3C Verifiable Credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct W3CCredential {
    /// The JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The credential identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The credential type(s). The second entry names the subject schema
    /// type used for field-path resolution.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    /// The DID of the issuer.
    pub issuer: String,
    /// When the credential was issued (UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<DateTime<Utc>>,
    /// Optional expiration date (UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// The credential subject — intentionally extensible.
    pub credential_subject: serde_json::Value,
    /// Where and how to check revocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
    /// Issuance proofs attached to this credential.
    #[serde(default)]
    pub proof: CredentialProofs,
}

/// The credential's revocation-status pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    /// The status endpoint URL.
    pub id: String,
    /// The status mechanism type.
    #[serde(rename = "type")]
    pub status_type: String,
    /// The claim's revocation nonce, when the issuer publishes it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_nonce: Option<u64>,
}

/// The issuance proofs of a credential. Deserializes from a single proof
/// object or an array of them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CredentialProofs(pub Vec<CredentialProof>);

impl<'de> Deserialize<'de> for CredentialProofs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        let proofs = items
            .into_iter()
            .map(|item| CredentialProof::from_value(item).map_err(serde::de::Error::custom))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CredentialProofs(proofs))
    }
}

/// One issuance proof, dispatched on its `type` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CredentialProof {
    /// Baby Jubjub signature over the core claim.
    BjjSignature(BjjSignatureProof),
    /// Sparse-Merkle-tree inclusion in the issuer's claims tree.
    Iden3SparseMerkleTree(SmtInclusionProof),
    /// A proof suite this build does not know. The payload is preserved
    /// verbatim so it can be re-serialized or inspected.
    Unknown(serde_json::Value),
}

impl CredentialProof {
    /// Dispatch a raw proof object on its `type` tag.
    ///
    /// Known kinds must parse fully; unknown kinds are preserved raw.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CredentialError> {
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_owned)
            .ok_or_else(|| CredentialError::Malformed("proof without a type tag".into()))?;

        match tag.as_str() {
            "BJJSignature2021" => {
                let proof: BjjSignatureProof = serde_json::from_value(value)
                    .map_err(|e| CredentialError::Malformed(format!("BJJSignature2021: {e}")))?;
                Ok(CredentialProof::BjjSignature(proof))
            }
            "Iden3SparseMerkleTreeProof" => {
                let proof: SmtInclusionProof = serde_json::from_value(value).map_err(|e| {
                    CredentialError::Malformed(format!("Iden3SparseMerkleTreeProof: {e}"))
                })?;
                Ok(CredentialProof::Iden3SparseMerkleTree(proof))
            }
            _ => Ok(CredentialProof::Unknown(value)),
        }
    }

    /// The proof kind, when known.
    pub fn proof_type(&self) -> Option<ProofType> {
        match self {
            CredentialProof::BjjSignature(_) => Some(ProofType::BjjSignature),
            CredentialProof::Iden3SparseMerkleTree(_) => Some(ProofType::Iden3SparseMerkleTree),
            CredentialProof::Unknown(_) => None,
        }
    }
}

/// Issuer-side data embedded in an issuance proof: who issued, and the
/// issuer's tree state at issuance time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerData {
    /// The issuer DID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The issuer's declared tree state.
    pub state: IssuerState,
    /// The issuer's authentication core claim (signature proofs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_core_claim: Option<String>,
    /// Inclusion proof of the issuer's auth claim (signature proofs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtp: Option<MtProofDto>,
}

/// The issuer's declared state quadruple, hex-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerState {
    /// The aggregate state hash.
    pub value: String,
    /// Claims-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims_tree_root: Option<String>,
    /// Revocation-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_tree_root: Option<String>,
    /// Roots-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_of_roots: Option<String>,
    /// Anchoring transaction id, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

impl IssuerState {
    /// Rebuild and validate the issuer tree state. Roots the issuer
    /// omitted (genesis states) count as zero; the declared aggregate must
    /// still recompute.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Malformed`] for bad hex and
    /// [`CredentialError::Crypto`] when the declared state does not match.
    pub fn tree_state(&self) -> Result<zkid_crypto::TreeState, CredentialError> {
        let parse = |field: &str, value: Option<&String>| match value {
            None => Ok(zkid_crypto::FieldHash::ZERO),
            Some(s) => zkid_crypto::FieldHash::from_hex(s)
                .map_err(|e| CredentialError::Malformed(format!("issuer {field}: {e}"))),
        };
        let declared = zkid_crypto::FieldHash::from_hex(&self.value)
            .map_err(|e| CredentialError::Malformed(format!("issuer state: {e}")))?;
        let claims = parse("claimsTreeRoot", self.claims_tree_root.as_ref())?;
        let revocations = parse("revocationTreeRoot", self.revocation_tree_root.as_ref())?;
        let roots = parse("rootOfRoots", self.root_of_roots.as_ref())?;
        Ok(zkid_crypto::TreeState::verify_declared(
            declared,
            claims,
            revocations,
            roots,
        )?)
    }
}

/// A sparse-Merkle-tree issuance proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtInclusionProof {
    /// Always `Iden3SparseMerkleTreeProof`.
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Proof identifier, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issuer data at issuance time.
    pub issuer_data: IssuerData,
    /// The embedded core claim, hex-encoded.
    pub core_claim: String,
    /// Inclusion proof of the core claim in the issuer's claims tree.
    pub mtp: MtProofDto,
}

impl SmtInclusionProof {
    /// Decode the embedded core claim.
    pub fn core_claim(&self) -> Result<Claim, CredentialError> {
        Ok(Claim::from_hex(&self.core_claim)?)
    }
}

/// A Baby Jubjub signature issuance proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BjjSignatureProof {
    /// Always `BJJSignature2021`.
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Issuer data at issuance time.
    pub issuer_data: IssuerData,
    /// The embedded core claim, hex-encoded.
    pub core_claim: String,
    /// The signature over the core claim, hex-encoded.
    pub signature: String,
}

impl BjjSignatureProof {
    /// Decode the embedded core claim.
    pub fn core_claim(&self) -> Result<Claim, CredentialError> {
        Ok(Claim::from_hex(&self.core_claim)?)
    }
}

impl W3CCredential {
    /// The first proof of the requested kind.
    pub fn proof_of_type(&self, wanted: ProofType) -> Option<&CredentialProof> {
        self.proof
            .0
            .iter()
            .find(|p| p.proof_type() == Some(wanted))
    }

    /// Extract the embedded core claim for the requested proof kind,
    /// together with the typed proof it came from.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingProof`] when the credential does
    /// not carry the requested kind.
    pub fn core_claim_for(&self, wanted: ProofType) -> Result<Claim, CredentialError> {
        match self.proof_of_type(wanted) {
            Some(CredentialProof::Iden3SparseMerkleTree(p)) => p.core_claim(),
            Some(CredentialProof::BjjSignature(p)) => p.core_claim(),
            _ => Err(CredentialError::MissingProof(wanted.as_str().to_string())),
        }
    }

    /// The revocation-status endpoint, when the credential names one.
    pub fn status_url(&self) -> Option<&str> {
        self.credential_status.as_ref().map(|s| s.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_claim_hex() -> String {
        "0".repeat(512)
    }

    fn smt_proof_json() -> serde_json::Value {
        serde_json::json!({
            "type": "Iden3SparseMerkleTreeProof",
            "id": "https://issuer.example/mtp/1",
            "issuerData": {
                "id": "did:iden3:readonly:abc",
                "state": { "value": "00".repeat(32) }
            },
            "coreClaim": zero_claim_hex(),
            "mtp": { "existence": true, "siblings": [] }
        })
    }

    fn credential_json(proof: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "@context": [
                "https://www.w3.org/2018/credentials/v1",
                "https://schema.iden3.io/core/jsonld/iden3proofs.jsonld",
                "https://issuer.example/schema.jsonld"
            ],
            "id": "urn:uuid:0c7f2a3e",
            "type": ["VerifiableCredential", "IdentityProviders"],
            "issuer": "did:iden3:readonly:abc",
            "credentialSubject": { "id": "did:iden3:readonly:def", "isNatural": 1 },
            "credentialStatus": {
                "id": "https://issuer.example/status/5",
                "type": "SparseMerkleTreeProof",
                "revocationNonce": 5
            },
            "proof": proof
        })
    }

    #[test]
    fn parses_single_proof_object() {
        let vc: W3CCredential =
            serde_json::from_value(credential_json(smt_proof_json())).unwrap();
        assert_eq!(vc.proof.0.len(), 1);
        assert!(matches!(
            vc.proof.0[0],
            CredentialProof::Iden3SparseMerkleTree(_)
        ));
    }

    #[test]
    fn parses_proof_array_and_preserves_unknown_kinds() {
        let unknown = serde_json::json!({
            "type": "FancyProof2030",
            "payload": { "opaque": true }
        });
        let vc: W3CCredential = serde_json::from_value(credential_json(serde_json::json!([
            smt_proof_json(),
            unknown.clone()
        ])))
        .unwrap();
        assert_eq!(vc.proof.0.len(), 2);
        match &vc.proof.0[1] {
            CredentialProof::Unknown(raw) => assert_eq!(*raw, unknown),
            other => panic!("expected Unknown, got {other:?}"),
        }
        // Re-serialization keeps the unknown payload intact.
        let round = serde_json::to_value(&vc.proof).unwrap();
        assert_eq!(round.as_array().unwrap()[1], unknown);
    }

    #[test]
    fn rejects_proof_without_type_tag() {
        let result: Result<W3CCredential, _> =
            serde_json::from_value(credential_json(serde_json::json!({ "payload": 1 })));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_known_proof() {
        // A known tag with a missing mandatory field must fail, not fall
        // back to Unknown.
        let broken = serde_json::json!({ "type": "Iden3SparseMerkleTreeProof" });
        let result: Result<W3CCredential, _> =
            serde_json::from_value(credential_json(broken));
        assert!(result.is_err());
    }

    #[test]
    fn core_claim_extraction_by_proof_type() {
        let vc: W3CCredential =
            serde_json::from_value(credential_json(smt_proof_json())).unwrap();
        let claim = vc
            .core_claim_for(ProofType::Iden3SparseMerkleTree)
            .unwrap();
        assert_eq!(claim.revocation_nonce(), 0);

        let err = vc.core_claim_for(ProofType::BjjSignature).unwrap_err();
        assert!(matches!(err, CredentialError::MissingProof(_)));
    }

    #[test]
    fn status_url_comes_from_credential_status() {
        let vc: W3CCredential =
            serde_json::from_value(credential_json(smt_proof_json())).unwrap();
        assert_eq!(vc.status_url(), Some("https://issuer.example/status/5"));
    }

    #[test]
    fn issuer_state_with_omitted_roots_is_genesis() {
        // All-zero roots hash to a known non-zero aggregate; a declared
        // state of that value must verify with the roots omitted.
        let ts = zkid_crypto::TreeState::derive(
            zkid_crypto::FieldHash::ZERO,
            zkid_crypto::FieldHash::ZERO,
            zkid_crypto::FieldHash::ZERO,
        )
        .unwrap();
        let state = IssuerState {
            value: ts.state.to_hex(),
            claims_tree_root: None,
            revocation_tree_root: None,
            root_of_roots: None,
            tx_id: None,
        };
        let rebuilt = state.tree_state().unwrap();
        assert_eq!(rebuilt, ts);
    }

    #[test]
    fn issuer_state_mismatch_is_rejected() {
        let state = IssuerState {
            value: "00".repeat(32),
            claims_tree_root: None,
            revocation_tree_root: None,
            root_of_roots: None,
            tx_id: None,
        };
        assert!(state.tree_state().is_err());
    }
}
