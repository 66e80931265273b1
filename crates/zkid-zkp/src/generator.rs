//! # Selective-disclosure input assembly
//!
//! Builds the on-chain atomic-query input record from a resolved
//! credential, a proof request, and a caller-supplied historical GIST
//! root. Unlike self-authentication, the GIST proof here is pinned:
//! correctness requires proving against the exact root the on-chain
//! verifier will check, not the current one.
//!
//! The revocation-status fetch, the pinned GIST fetch, and the query
//! build (which may load a context document) have no data dependency on
//! each other, so they are issued concurrently and joined before
//! assembly. Nothing is retried here and no error is downgraded — the
//! first failure aborts the request with its stage.

use std::sync::Arc;

use zkid_chain::StateContractClient;
use zkid_core::codec::reformat_state_hash;
use zkid_core::constants::{DEFAULT_MT_LEVELS, DEFAULT_MT_LEVELS_CLAIMS_MERKLIZATION, DEFAULT_MT_LEVELS_ON_CHAIN};
use zkid_core::{Did, ProofType};
use zkid_crypto::FieldHash;
use zkid_vc::{CredentialProof, CredentialStatusResolver, DocumentLoader, W3CCredential};

use crate::circuits::{pad_values, AtomicQueryMtpV2OnChainInputs, CircuitId};
use crate::error::ZkpError;
use crate::identity::Identity;
use crate::proofs::{node_aux_value, pad_siblings, to_circuit_gist};
use crate::query::{build_query, decode_challenge, CreateProofRequest};

/// Assembles circuit input records for an identity.
pub struct ProofInputGenerator {
    identity: Arc<Identity>,
    state_client: StateContractClient,
    http: reqwest::Client,
    loader: DocumentLoader,
}

impl ProofInputGenerator {
    /// Create a generator over an identity and its chain client. The
    /// HTTP client is shared by the status resolver and the document
    /// loader.
    pub fn new(
        identity: Arc<Identity>,
        state_client: StateContractClient,
        http: reqwest::Client,
    ) -> Self {
        let loader = DocumentLoader::new(http.clone());
        ProofInputGenerator {
            identity,
            state_client,
            http,
            loader,
        }
    }

    /// Assemble on-chain selective-disclosure inputs.
    ///
    /// `core_state_hash` is the issuer's anchored state hash in on-chain
    /// byte order (re-encoded here to pin the revocation-status query);
    /// `operation_gist_root` is the historical GIST root recorded in the
    /// on-chain operation log.
    ///
    /// # Errors
    ///
    /// Each pipeline stage surfaces its own [`ZkpError`] variant; a
    /// revoked credential aborts with [`ZkpError::CredentialRevoked`].
    pub async fn atomic_query_inputs(
        &self,
        core_state_hash: &str,
        operation_gist_root: &str,
        credential: &W3CCredential,
        request: &CreateProofRequest,
    ) -> Result<AtomicQueryMtpV2OnChainInputs, ZkpError> {
        let proof_type = request.circuit_id.proof_type()?;
        if request.circuit_id != CircuitId::AtomicQueryMtpV2OnChain {
            return Err(ZkpError::UnsupportedCircuit(
                request.circuit_id.as_str().to_string(),
            ));
        }

        let status_url = credential.status_url().ok_or_else(|| {
            ZkpError::InputInvalid("credential names no revocation-status endpoint".to_string())
        })?;

        let pinned_state = reformat_state_hash(core_state_hash)?;
        let resolver =
            CredentialStatusResolver::new(self.http.clone(), Some(pinned_state));

        let pinned_root = FieldHash::from_hex(operation_gist_root)?.big_int();
        let user_id = self.identity.id_big_int()?;

        tracing::debug!(
            circuit = %request.circuit_id,
            status_endpoint = %status_url,
            "assembling atomic query inputs"
        );

        // Three independent reads, joined before assembly.
        let (status, gist, query) = tokio::join!(
            resolver.resolve(status_url),
            self.state_client.gist_proof(&user_id, Some(&pinned_root)),
            build_query(credential, request, &self.loader),
        );

        let (non_rev_proof, issuer_non_rev_state) = status.map_err(ZkpError::StatusResolve)?;
        if non_rev_proof.existence {
            tracing::warn!("credential is revoked; aborting assembly");
            return Err(ZkpError::CredentialRevoked);
        }
        let gist = to_circuit_gist(&gist?)?;
        let query = query?;

        let core_claim = credential
            .core_claim_for(proof_type)
            .map_err(ZkpError::Credential)?;

        let smt_proof = match credential.proof_of_type(ProofType::Iden3SparseMerkleTree) {
            Some(CredentialProof::Iden3SparseMerkleTree(p)) => p,
            _ => {
                return Err(ZkpError::Credential(zkid_vc::CredentialError::MissingProof(
                    ProofType::Iden3SparseMerkleTree.as_str().to_string(),
                )))
            }
        };
        let issuer_state = smt_proof
            .issuer_data
            .state
            .tree_state()
            .map_err(ZkpError::Credential)?;
        let issuer_inc_proof = smt_proof.mtp.to_proof();

        let issuer_id = Did::parse(&credential.issuer)?.id().big_int();

        let challenge = decode_challenge(request)?;
        let signature = self.identity.sign_challenge(&challenge)?;

        let non_rev_aux = node_aux_value(&non_rev_proof);
        let auth_aux = node_aux_value(self.identity.auth_non_revocation_proof());
        let gist_aux = node_aux_value(&gist.proof);

        let (path_proof, path_key, path_value) = match &query.value_proof {
            Some(vp) => (vp.mtp.clone(), vp.path.clone(), vp.value.clone()),
            None => (
                zkid_crypto::MtProof {
                    existence: false,
                    siblings: vec![],
                    node_aux: None,
                },
                num_bigint::BigInt::from(0),
                num_bigint::BigInt::from(0),
            ),
        };
        let path_aux = node_aux_value(&path_proof);

        let user_state = self.identity.tree_state();

        Ok(AtomicQueryMtpV2OnChainInputs {
            request_id: request.request_id.unwrap_or(0).to_string(),

            user_genesis_id: user_id.to_string(),
            profile_nonce: "0".to_string(),
            claim_subject_profile_nonce: "0".to_string(),

            issuer_id: issuer_id.to_string(),
            issuer_claim: core_claim.clone(),
            issuer_claim_mtp: pad_siblings(&issuer_inc_proof.siblings, DEFAULT_MT_LEVELS)?,
            issuer_claim_claims_tree_root: issuer_state.claims_root,
            issuer_claim_rev_tree_root: issuer_state.revocation_root,
            issuer_claim_roots_tree_root: issuer_state.root_of_roots,
            issuer_claim_iden_state: issuer_state.state,

            issuer_claim_non_rev_claims_tree_root: issuer_non_rev_state.claims_root,
            issuer_claim_non_rev_rev_tree_root: issuer_non_rev_state.revocation_root,
            issuer_claim_non_rev_roots_tree_root: issuer_non_rev_state.root_of_roots,
            issuer_claim_non_rev_state: issuer_non_rev_state.state,
            issuer_claim_non_rev_mtp: pad_siblings(&non_rev_proof.siblings, DEFAULT_MT_LEVELS)?,
            issuer_claim_non_rev_mtp_aux_hi: non_rev_aux.key,
            issuer_claim_non_rev_mtp_aux_hv: non_rev_aux.value,
            issuer_claim_non_rev_mtp_no_aux: non_rev_aux.no_aux,

            claim_schema: core_claim.schema_hash().big_int().to_string(),

            claim_path_not_exists: u8::from(!path_proof.existence),
            claim_path_mtp: pad_siblings(
                &path_proof.siblings,
                DEFAULT_MT_LEVELS_CLAIMS_MERKLIZATION,
            )?,
            claim_path_mtp_no_aux: path_aux.no_aux,
            claim_path_mtp_aux_hi: path_aux.key,
            claim_path_mtp_aux_hv: path_aux.value,
            claim_path_key: path_key.to_string(),
            claim_path_value: path_value.to_string(),

            operator: query.operator.code(),
            slot_index: query.slot_index,
            timestamp: chrono::Utc::now().timestamp(),
            value: pad_values(&query.values),

            is_revocation_checked: 1,

            challenge: challenge.to_string(),
            challenge_signature_r8x: signature.r8_x.to_string(),
            challenge_signature_r8y: signature.r8_y.to_string(),
            challenge_signature_s: signature.s.to_string(),

            gist_root: gist.root,
            gist_mtp: pad_siblings(&gist.proof.siblings, DEFAULT_MT_LEVELS_ON_CHAIN)?,
            gist_mtp_aux_hi: gist_aux.key,
            gist_mtp_aux_hv: gist_aux.value,
            gist_mtp_no_aux: gist_aux.no_aux,

            auth_claim: self.identity.auth_claim().clone(),
            auth_claim_inc_mtp: self.identity.auth_inclusion_siblings().to_vec(),
            auth_claim_non_rev_mtp: pad_siblings(
                &self.identity.auth_non_revocation_proof().siblings,
                DEFAULT_MT_LEVELS,
            )?,
            auth_claim_non_rev_mtp_aux_hi: auth_aux.key,
            auth_claim_non_rev_mtp_aux_hv: auth_aux.value,
            auth_claim_non_rev_mtp_no_aux: auth_aux.no_aux,

            user_claims_tree_root: user_state.claims_root,
            user_rev_tree_root: user_state.revocation_root,
            user_roots_tree_root: user_state.root_of_roots,
            user_state: user_state.state,
        })
    }
}
