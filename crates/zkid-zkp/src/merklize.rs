//! # Document merklization
//!
//! Builds a content-addressed Merkle tree over a credential subject so
//! individual fields can be proven without revealing the document. Each
//! field becomes one tree entry:
//!
//! - key — the Poseidon path hash of
//!   (`credentialSubject` IRI, the field's IRI resolved from the
//!   credential's JSON-LD context);
//! - value — the Poseidon entry of the field's literal.
//!
//! String literals are packed into 31-byte little-endian limbs and folded
//! through Poseidon; numbers and booleans map to their integer value.
//! Prover and verifier must share this scheme, which is why the same
//! functions compute both the tree entries and the query's path key.

use num_bigint::{BigInt, Sign};
use zkid_core::constants::DEFAULT_MT_LEVELS_CLAIMS_MERKLIZATION;
use zkid_crypto::poseidon::hash_elems;
use zkid_crypto::{MtProof, SparseMerkleTree};

use crate::error::ZkpError;

/// IRI of the `credentialSubject` relation; every field path is rooted
/// here.
pub const CREDENTIAL_SUBJECT_IRI: &str = "https://www.w3.org/2018/credentials#credentialSubject";

/// Byte width of one string limb; 31 bytes always fit in the field.
const LIMB_WIDTH: usize = 31;

/// Hash a string literal into a field entry: pack UTF-8 bytes into
/// 31-byte little-endian limbs, then fold the limbs through Poseidon.
///
/// # Errors
///
/// Returns [`ZkpError::Crypto`] if hashing fails.
pub fn string_entry(s: &str) -> Result<BigInt, ZkpError> {
    let bytes = s.as_bytes();
    let limbs: Vec<BigInt> = if bytes.is_empty() {
        vec![BigInt::from(0)]
    } else {
        bytes
            .chunks(LIMB_WIDTH)
            .map(|chunk| BigInt::from_bytes_le(Sign::Plus, chunk))
            .collect()
    };

    let mut acc = hash_elems(&[limbs[0].clone()])?.big_int();
    for limb in &limbs[1..] {
        acc = hash_elems(&[acc, limb.clone()])?.big_int();
    }
    Ok(acc)
}

/// Map a JSON literal to its field entry.
///
/// # Errors
///
/// Returns [`ZkpError::InputInvalid`] for literals with no defined entry
/// (objects, arrays, null, non-integer numbers).
pub fn value_entry(value: &serde_json::Value) -> Result<BigInt, ZkpError> {
    match value {
        serde_json::Value::String(s) => string_entry(s),
        serde_json::Value::Bool(b) => Ok(BigInt::from(u8::from(*b))),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(BigInt::from(u))
            } else if let Some(i) = n.as_i64() {
                Ok(BigInt::from(i))
            } else {
                Err(ZkpError::InputInvalid(format!(
                    "non-integer literal cannot be merklized: {n}"
                )))
            }
        }
        other => Err(ZkpError::InputInvalid(format!(
            "literal cannot be merklized: {other}"
        ))),
    }
}

/// Hash a field path (IRI segments, root first) into its tree key.
///
/// # Errors
///
/// Returns [`ZkpError::Crypto`] if hashing fails.
pub fn path_entry(segments: &[&str]) -> Result<BigInt, ZkpError> {
    let hashes = segments
        .iter()
        .map(|s| string_entry(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hash_elems(&hashes)?.big_int())
}

/// Resolve a subject field's IRI from a JSON-LD context document.
///
/// Walks `@context` (object or array of objects) for the credential
/// type's term definition, then looks the field up in the type's scoped
/// `@context`. A term definition may be a bare IRI string or an object
/// with `@id`.
pub fn resolve_field_iri(
    context_doc: &serde_json::Value,
    type_name: &str,
    field: &str,
) -> Option<String> {
    let contexts = match context_doc.get("@context")? {
        serde_json::Value::Array(items) => items.clone(),
        single => vec![single.clone()],
    };

    for ctx in &contexts {
        let type_def = match ctx.get(type_name) {
            Some(def) => def,
            None => continue,
        };
        let scoped = type_def.get("@context")?;
        let term = scoped.get(field)?;
        let iri = match term {
            serde_json::Value::String(s) => s.clone(),
            obj => obj.get("@id")?.as_str()?.to_string(),
        };
        return Some(iri);
    }
    None
}

/// A merklized credential subject.
#[derive(Debug, Clone)]
pub struct DocumentMerklizer {
    tree: SparseMerkleTree,
}

impl DocumentMerklizer {
    /// Merklize a credential subject against its context document.
    ///
    /// Fields without a term definition in the context (and the `id` /
    /// `type` envelope fields) are not merklized.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::InputInvalid`] for subjects that are not
    /// objects or carry unmerklizable literals.
    pub fn build(
        subject: &serde_json::Value,
        type_name: &str,
        context_doc: &serde_json::Value,
    ) -> Result<Self, ZkpError> {
        let fields = subject.as_object().ok_or_else(|| {
            ZkpError::InputInvalid("credential subject is not an object".to_string())
        })?;

        let mut tree = SparseMerkleTree::new(DEFAULT_MT_LEVELS_CLAIMS_MERKLIZATION);
        for (field, value) in fields {
            if field == "id" || field == "type" {
                continue;
            }
            let iri = match resolve_field_iri(context_doc, type_name, field) {
                Some(iri) => iri,
                None => continue,
            };
            let key = path_entry(&[CREDENTIAL_SUBJECT_IRI, &iri])?;
            let entry = value_entry(value)?;
            tree.add(&key, &entry)?;
        }
        Ok(DocumentMerklizer { tree })
    }

    /// Inclusion/non-inclusion proof for a path key.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::Crypto`] on traversal failure.
    pub fn prove(&self, path_key: &BigInt) -> Result<MtProof, ZkpError> {
        Ok(self.tree.prove(path_key)?)
    }

    /// The merklization root.
    pub fn root(&self) -> &zkid_crypto::FieldHash {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_doc() -> serde_json::Value {
        serde_json::json!({
            "@context": [{
                "IdentityProviders": {
                    "@id": "https://schema.example/IdentityProviders",
                    "@context": {
                        "isNatural": {
                            "@id": "https://schema.example/IdentityProviders#isNatural"
                        },
                        "provider": "https://schema.example/IdentityProviders#provider"
                    }
                }
            }]
        })
    }

    #[test]
    fn string_entries_are_deterministic_and_distinct() {
        let a = string_entry("isNatural").unwrap();
        let b = string_entry("isNatural").unwrap();
        let c = string_entry("provider").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn long_strings_fold_across_limbs() {
        let short = string_entry("x").unwrap();
        let long = string_entry(&"x".repeat(100)).unwrap();
        assert_ne!(short, long);
    }

    #[test]
    fn value_entries_cover_literals() {
        assert_eq!(
            value_entry(&serde_json::json!(42)).unwrap(),
            BigInt::from(42)
        );
        assert_eq!(
            value_entry(&serde_json::json!(true)).unwrap(),
            BigInt::from(1)
        );
        assert_eq!(
            value_entry(&serde_json::json!(false)).unwrap(),
            BigInt::from(0)
        );
        assert!(value_entry(&serde_json::json!("text")).is_ok());
        assert!(value_entry(&serde_json::json!({"nested": 1})).is_err());
        assert!(value_entry(&serde_json::json!(1.5)).is_err());
    }

    #[test]
    fn resolves_field_iri_from_scoped_context() {
        let doc = context_doc();
        assert_eq!(
            resolve_field_iri(&doc, "IdentityProviders", "isNatural").unwrap(),
            "https://schema.example/IdentityProviders#isNatural"
        );
        // Bare-string term definitions resolve too.
        assert_eq!(
            resolve_field_iri(&doc, "IdentityProviders", "provider").unwrap(),
            "https://schema.example/IdentityProviders#provider"
        );
        assert!(resolve_field_iri(&doc, "IdentityProviders", "unknown").is_none());
        assert!(resolve_field_iri(&doc, "OtherType", "isNatural").is_none());
    }

    #[test]
    fn merklized_field_proves_inclusion() {
        let subject = serde_json::json!({
            "id": "did:iden3:readonly:holder",
            "isNatural": 1,
            "provider": "nadra"
        });
        let merklizer =
            DocumentMerklizer::build(&subject, "IdentityProviders", &context_doc()).unwrap();

        let key = path_entry(&[
            CREDENTIAL_SUBJECT_IRI,
            "https://schema.example/IdentityProviders#isNatural",
        ])
        .unwrap();
        let proof = merklizer.prove(&key).unwrap();
        assert!(proof.existence);

        let missing = path_entry(&[CREDENTIAL_SUBJECT_IRI, "https://schema.example/other"]).unwrap();
        let proof = merklizer.prove(&missing).unwrap();
        assert!(!proof.existence);
    }

    #[test]
    fn unresolvable_fields_are_skipped_not_fatal() {
        let subject = serde_json::json!({
            "isNatural": 1,
            "unmapped": "value"
        });
        let merklizer =
            DocumentMerklizer::build(&subject, "IdentityProviders", &context_doc()).unwrap();
        assert!(!merklizer.root().is_zero());
    }

    #[test]
    fn non_object_subject_is_rejected() {
        let err =
            DocumentMerklizer::build(&serde_json::json!("scalar"), "T", &context_doc()).unwrap_err();
        assert!(matches!(err, ZkpError::InputInvalid(_)));
    }
}
