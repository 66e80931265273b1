//! # Identity state builder
//!
//! Builds an identity's local Merkle state once and derives its DID. The
//! construction is a single forward path — key, authentication claim,
//! trees, aggregate state, DID, proofs — and any failure aborts the whole
//! thing; there is no partial identity.
//!
//! After construction the identity is read-only (no claim insertion or
//! revocation flow exists here), so it is safe to share across concurrent
//! proof requests.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use zkid_chain::{ChainConfig, StateContractClient};
use zkid_core::codec::{bytes_to_field_int, ByteOrder};
use zkid_core::constants::{DEFAULT_MT_LEVELS, DEFAULT_MT_LEVELS_ON_CHAIN};
use zkid_core::{Did, Id, IdType};
use zkid_crypto::{
    Claim, FieldHash, MtProof, PoseidonSignature, PrivateKey, SchemaHash, SparseMerkleTree,
    TreeState,
};

use crate::circuits::AuthCircuitInputs;
use crate::error::ZkpError;
use crate::proofs::{node_aux_value, pad_siblings, to_circuit_gist};

/// Depth of the three per-identity trees.
const IDENTITY_TREE_DEPTH: usize = 32;

/// Configuration for identity construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityConfig {
    /// The 2-byte identifier type tag.
    pub id_type: IdType,
    /// Schema hash of the authentication claim, 32 hex digits.
    pub schema_hash_hex: String,
    /// Chain endpoints for proof requests.
    pub chain: ChainConfig,
}

/// A self-certified identity: private key, DID, authentication claim,
/// and the identity's own proofs against its genesis tree state.
pub struct Identity {
    config: IdentityConfig,
    private_key: PrivateKey,
    did: Did,
    auth_claim: Claim,
    auth_inc_proof: MtProof,
    auth_inc_siblings: Vec<FieldHash>,
    auth_non_rev_proof: MtProof,
    tree_state: TreeState,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("did", &self.did.to_string())
            .field("state", &self.tree_state.state)
            .finish()
    }
}

impl Identity {
    /// Construct an identity from configuration and an optional private
    /// key (absent means generate a fresh one).
    ///
    /// The revocation nonce of the authentication claim is the big-endian
    /// value of an empty 64-byte buffer — always zero by construction.
    /// Callers must not assume it is unique across identities built this
    /// way.
    ///
    /// # Errors
    ///
    /// Any failing step aborts construction; no partial identity is ever
    /// returned.
    pub fn new(config: IdentityConfig, private_key_hex: Option<&str>) -> Result<Self, ZkpError> {
        let private_key = match private_key_hex {
            Some(hex) => PrivateKey::from_hex(hex)?,
            None => PrivateKey::generate(),
        };

        let schema = SchemaHash::from_hex(&config.schema_hash_hex)?;
        let public_key = private_key.public()?;
        let revocation_nonce: u64 = bytes_to_field_int(&[0u8; 64], ByteOrder::BigEndian)
            .try_into()
            .map_err(|_| {
                ZkpError::InputInvalid("revocation nonce does not fit in u64".to_string())
            })?;
        let auth_claim = Claim::new_auth(schema, &public_key.x, &public_key.y, revocation_nonce)?;
        let (hi, hv) = auth_claim.hi_hv()?;

        let mut claims_tree = SparseMerkleTree::new(IDENTITY_TREE_DEPTH);
        let revocations_tree = SparseMerkleTree::new(IDENTITY_TREE_DEPTH);
        let roots_tree = SparseMerkleTree::new(IDENTITY_TREE_DEPTH);
        claims_tree.add(&hi, &hv)?;

        let tree_state = TreeState::derive(
            *claims_tree.root(),
            *revocations_tree.root(),
            *roots_tree.root(),
        )?;

        let id = Id::from_genesis_state(config.id_type, &tree_state.state.big_int())?;
        let did = Did::from_id(id)?;

        let auth_inc_proof = claims_tree.prove(&hi)?;
        let auth_inc_siblings = pad_siblings(&auth_inc_proof.siblings, DEFAULT_MT_LEVELS)?;
        let auth_non_rev_proof =
            revocations_tree.prove(&BigInt::from(auth_claim.revocation_nonce()))?;

        Ok(Identity {
            config,
            private_key,
            did,
            auth_claim,
            auth_inc_proof,
            auth_inc_siblings,
            auth_non_rev_proof,
            tree_state,
        })
    }

    /// The identity's DID. Stable for the object's lifetime.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The identity's genesis id.
    pub fn id(&self) -> &Id {
        self.did.id()
    }

    /// The identity's numeric id, recovered through a DID-parsing round
    /// trip.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::Core`] if the identity's own DID string fails
    /// to parse — which would indicate memory corruption, not bad input.
    pub fn id_big_int(&self) -> Result<BigInt, ZkpError> {
        let parsed = Did::parse(&self.did.to_string())?;
        Ok(parsed.id().big_int())
    }

    /// The identity's construction configuration.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// The authentication claim.
    pub fn auth_claim(&self) -> &Claim {
        &self.auth_claim
    }

    /// The genesis tree state.
    pub fn tree_state(&self) -> &TreeState {
        &self.tree_state
    }

    /// The authentication claim's inclusion proof.
    pub fn auth_inclusion_proof(&self) -> &MtProof {
        &self.auth_inc_proof
    }

    /// Inclusion siblings padded to the identity-tree circuit depth.
    pub fn auth_inclusion_siblings(&self) -> &[FieldHash] {
        &self.auth_inc_siblings
    }

    /// The authentication claim's non-revocation proof.
    pub fn auth_non_revocation_proof(&self) -> &MtProof {
        &self.auth_non_rev_proof
    }

    /// Sign a decoded challenge with the identity key.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError::Crypto`] if signing fails.
    pub fn sign_challenge(&self, challenge: &BigInt) -> Result<PoseidonSignature, ZkpError> {
        Ok(self.private_key.sign_poseidon(challenge)?)
    }

    /// Assemble self-authentication circuit inputs for a challenge hash.
    ///
    /// Decodes the challenge big-endian, signs it, fetches the identity's
    /// own GIST proof (always against the latest root), normalizes it,
    /// and emits the flat input record.
    ///
    /// # Errors
    ///
    /// Network failures surface as [`ZkpError::GistFetch`]; everything
    /// else aborts with the stage that failed.
    pub async fn prepare_auth_inputs(
        &self,
        state_client: &StateContractClient,
        challenge_hash: &[u8],
    ) -> Result<AuthCircuitInputs, ZkpError> {
        let challenge = bytes_to_field_int(challenge_hash, ByteOrder::BigEndian);
        let signature = self.sign_challenge(&challenge)?;

        let user_id = self.id_big_int()?;
        let raw_gist = state_client.gist_proof(&user_id, None).await?;
        let gist = to_circuit_gist(&raw_gist)?;
        let gist_siblings = pad_siblings(&gist.proof.siblings, DEFAULT_MT_LEVELS_ON_CHAIN)?;
        let gist_aux = node_aux_value(&gist.proof);
        let auth_aux = node_aux_value(&self.auth_non_rev_proof);
        let non_rev_siblings =
            pad_siblings(&self.auth_non_rev_proof.siblings, DEFAULT_MT_LEVELS)?;

        Ok(AuthCircuitInputs {
            genesis_id: user_id.to_string(),
            profile_nonce: "0".to_string(),

            auth_claim: self.auth_claim.clone(),
            auth_claim_inc_mtp: self.auth_inc_siblings.clone(),
            auth_claim_non_rev_mtp: non_rev_siblings,
            auth_claim_non_rev_mtp_aux_hi: auth_aux.key,
            auth_claim_non_rev_mtp_aux_hv: auth_aux.value,
            auth_claim_non_rev_mtp_no_aux: auth_aux.no_aux,

            challenge: challenge.to_string(),
            challenge_signature_r8x: signature.r8_x.to_string(),
            challenge_signature_r8y: signature.r8_y.to_string(),
            challenge_signature_s: signature.s.to_string(),

            claims_tree_root: self.tree_state.claims_root,
            rev_tree_root: self.tree_state.revocation_root,
            roots_tree_root: self.tree_state.root_of_roots,
            state: self.tree_state.state,

            gist_root: gist.root,
            gist_mtp: gist_siblings,
            gist_mtp_aux_hi: gist_aux.key,
            gist_mtp_aux_hv: gist_aux.value,
            gist_mtp_no_aux: gist_aux.no_aux,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkid_crypto::poseidon::hash_elems;

    const PK_HEX: &str = "9a5305fa4c55cbf517c99693a7ec6766203c88feab50c944c00feec051d5dab7";
    const SCHEMA_HEX: &str = "cca3371a6cb1b715004407e325bd993c";
    const REFERENCE_DID: &str = "did:iden3:readonly:tSpQ56dBXo3Druez8wAbTTqd9yV1K2q4TwFu2taQj";

    fn config() -> IdentityConfig {
        IdentityConfig {
            id_type: IdType::READONLY,
            schema_hash_hex: SCHEMA_HEX.to_string(),
            chain: ChainConfig {
                evm_rpc_url: "http://127.0.0.1:8545".into(),
                state_contract_address: "0x134b1be34911e39a8397ec6289782989729807a4".into(),
                core_api_url: None,
                timeout_secs: 5,
            },
        }
    }

    #[test]
    fn known_key_derives_reference_did() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();
        assert_eq!(identity.did().to_string(), REFERENCE_DID);
    }

    #[test]
    fn construction_is_deterministic() {
        let a = Identity::new(config(), Some(PK_HEX)).unwrap();
        let b = Identity::new(config(), Some(PK_HEX)).unwrap();
        assert_eq!(a.did(), b.did());
        assert_eq!(a.tree_state(), b.tree_state());
        assert_eq!(a.auth_claim(), b.auth_claim());
    }

    #[test]
    fn fresh_keys_derive_distinct_dids() {
        let a = Identity::new(config(), None).unwrap();
        let b = Identity::new(config(), None).unwrap();
        assert_ne!(a.did(), b.did());
    }

    #[test]
    fn state_recomputes_from_roots() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();
        let ts = identity.tree_state();
        let recomputed = hash_elems(&[
            ts.claims_root.big_int(),
            ts.revocation_root.big_int(),
            ts.root_of_roots.big_int(),
        ])
        .unwrap();
        assert_eq!(ts.state, recomputed);
        // Only the claims tree is populated at genesis.
        assert!(!ts.claims_root.is_zero());
        assert!(ts.revocation_root.is_zero());
        assert!(ts.root_of_roots.is_zero());
    }

    #[test]
    fn auth_claim_embeds_key_and_zero_nonce() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();
        let claim = identity.auth_claim();
        assert_eq!(claim.schema_hash().to_hex(), SCHEMA_HEX);
        assert_eq!(claim.revocation_nonce(), 0);

        let public = PrivateKey::from_hex(PK_HEX).unwrap().public().unwrap();
        assert_eq!(claim.index_slot(2), public.x);
        assert_eq!(claim.index_slot(3), public.y);
    }

    #[test]
    fn genesis_proofs_have_the_expected_shape() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();

        let inc = identity.auth_inclusion_proof();
        assert!(inc.existence);
        assert!(inc.siblings.is_empty());
        assert_eq!(identity.auth_inclusion_siblings().len(), DEFAULT_MT_LEVELS);

        let non_rev = identity.auth_non_revocation_proof();
        assert!(!non_rev.existence);
        assert!(non_rev.node_aux.is_none());
    }

    #[test]
    fn id_big_int_round_trips_through_the_did_string() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();
        let via_string = identity.id_big_int().unwrap();
        assert_eq!(via_string, identity.id().big_int());
    }

    #[test]
    fn bad_key_hex_aborts_construction() {
        assert!(Identity::new(config(), Some("zz")).is_err());
    }

    #[test]
    fn bad_schema_hex_aborts_construction() {
        let mut cfg = config();
        cfg.schema_hash_hex = "too-short".into();
        assert!(Identity::new(cfg, Some(PK_HEX)).is_err());
    }

    #[test]
    fn challenge_signing_is_deterministic() {
        let identity = Identity::new(config(), Some(PK_HEX)).unwrap();
        let a = identity.sign_challenge(&BigInt::from(42)).unwrap();
        let b = identity.sign_challenge(&BigInt::from(42)).unwrap();
        assert_eq!(a, b);
    }
}
