//! # Revocation-status resolution
//!
//! Fetches an issuer's revocation Merkle proof for a credential and
//! rebuilds the issuer's tree state from the response. The declared
//! aggregate state must recompute from the declared roots; a response
//! that fails this check is refused outright — a tampered or inconsistent
//! status must never reach circuit assembly.

use serde::{Deserialize, Serialize};
use zkid_crypto::{FieldHash, MtProof, TreeState};

use crate::error::CredentialError;
use crate::proof::MtProofDto;

/// The issuer's root quadruple as served by the status endpoint,
/// hex-encoded. Roots an issuer omits (genesis states) count as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerRoots {
    /// The aggregate state hash.
    pub state: String,
    /// Claims-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims_tree_root: Option<String>,
    /// Revocation-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_tree_root: Option<String>,
    /// Roots-tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_of_roots: Option<String>,
}

/// A revocation-status response: the revocation-tree point proof and the
/// issuer's declared roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationStatus {
    /// Point proof for the credential's revocation nonce.
    pub mtp: MtProofDto,
    /// The issuer's declared roots.
    pub issuer: IssuerRoots,
}

impl RevocationStatus {
    /// Validate the response: rebuild the issuer tree state and check the
    /// declared aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::RevocationStatusInvalid`] on bad hex or
    /// a declared state that does not recompute.
    pub fn validate(&self) -> Result<(MtProof, TreeState), CredentialError> {
        let parse = |field: &str, value: Option<&String>| match value {
            None => Ok(FieldHash::ZERO),
            Some(s) => FieldHash::from_hex(s).map_err(|e| {
                CredentialError::RevocationStatusInvalid(format!("issuer {field}: {e}"))
            }),
        };

        let declared = FieldHash::from_hex(&self.issuer.state).map_err(|e| {
            CredentialError::RevocationStatusInvalid(format!("issuer state: {e}"))
        })?;
        let claims = parse("claimsTreeRoot", self.issuer.claims_tree_root.as_ref())?;
        let revocations = parse(
            "revocationTreeRoot",
            self.issuer.revocation_tree_root.as_ref(),
        )?;
        let roots = parse("rootOfRoots", self.issuer.root_of_roots.as_ref())?;

        let tree_state = TreeState::verify_declared(declared, claims, revocations, roots)
            .map_err(|e| CredentialError::RevocationStatusInvalid(e.to_string()))?;

        Ok((self.mtp.to_proof(), tree_state))
    }
}

/// Resolves credential revocation status against an issuer's status
/// endpoint.
///
/// The HTTP client and the optional pinned state hash are constructor
/// parameters; there is no process-wide resolver registry.
#[derive(Debug, Clone)]
pub struct CredentialStatusResolver {
    http: reqwest::Client,
    /// Re-encoded core state hash to pin the query to, when proving
    /// against a historical state.
    pinned_state_hash: Option<String>,
}

impl CredentialStatusResolver {
    /// Create a resolver over an HTTP client, optionally pinned to a
    /// re-encoded state hash.
    pub fn new(http: reqwest::Client, pinned_state_hash: Option<String>) -> Self {
        CredentialStatusResolver {
            http,
            pinned_state_hash,
        }
    }

    /// Fetch and validate the revocation status at `status_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::RevocationStatusFetch`] for transport
    /// failures (retryable) and
    /// [`CredentialError::RevocationStatusInvalid`] for anything wrong
    /// with the response itself (fatal).
    pub async fn resolve(
        &self,
        status_url: &str,
    ) -> Result<(MtProof, TreeState), CredentialError> {
        let url = match &self.pinned_state_hash {
            Some(state) => format!("{status_url}?state={state}"),
            None => status_url.to_string(),
        };

        tracing::debug!(endpoint = %url, "fetching revocation status");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CredentialError::RevocationStatusFetch {
                endpoint: url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(endpoint = %url, status, "revocation status endpoint refused");
            return Err(CredentialError::RevocationStatusInvalid(format!(
                "{url} answered HTTP {status}"
            )));
        }

        let body: RevocationStatus = response.json().await.map_err(|e| {
            CredentialError::RevocationStatusInvalid(format!("malformed response from {url}: {e}"))
        })?;

        body.validate()
    }
}
