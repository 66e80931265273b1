//! Self-authentication input assembly against a simulated RPC node.
//!
//! With a fixed GIST reply and a fixed challenge the whole record is
//! deterministic (the challenge signature included), which is what makes
//! exact-input regression testing possible.

use num_bigint::BigInt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zkid_chain::{ChainConfig, StateContractClient};
use zkid_core::IdType;
use zkid_crypto::FieldHash;
use zkid_zkp::{Identity, IdentityConfig, ZkpError};

const PK_HEX: &str = "9a5305fa4c55cbf517c99693a7ec6766203c88feab50c944c00feec051d5dab7";
const AUTH_SCHEMA_HEX: &str = "cca3371a6cb1b715004407e325bd993c";

fn identity(server_uri: &str) -> Identity {
    Identity::new(
        IdentityConfig {
            id_type: IdType::READONLY,
            schema_hash_hex: AUTH_SCHEMA_HEX.to_string(),
            chain: ChainConfig {
                evm_rpc_url: server_uri.to_string(),
                state_contract_address: "0x134b1be34911e39a8397ec6289782989729807a4".into(),
                core_api_url: None,
                timeout_secs: 5,
            },
        },
        Some(PK_HEX),
    )
    .unwrap()
}

/// A non-inclusion GIST reply with no neighbor: fresh identities are not
/// yet anchored in the global tree.
fn encoded_gist_reply(root: u64) -> String {
    let mut words: Vec<String> = Vec::with_capacity(71);
    words.push(format!("{root:064x}"));
    words.push("0".repeat(64)); // existence = false
    for _ in 0..64 {
        words.push("0".repeat(64));
    }
    words.push("0".repeat(64)); // index
    words.push("0".repeat(64)); // value
    words.push("0".repeat(64)); // auxExistence = false
    words.push("0".repeat(64)); // auxIndex
    words.push("0".repeat(64)); // auxValue
    format!("0x{}", words.concat())
}

async fn mount_rpc(server: &MockServer, root: u64) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("eth_call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": encoded_gist_reply(root)
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn assembles_auth_inputs_with_latest_gist() {
    let server = MockServer::start().await;
    mount_rpc(&server, 777).await;

    // Kept below the field modulus; the signer rejects oversized scalars.
    let identity = identity(&server.uri());
    let client = StateContractClient::new(&identity.config().chain).unwrap();
    let challenge = [0x02; 32];

    let inputs = identity
        .prepare_auth_inputs(&client, &challenge)
        .await
        .unwrap();

    assert_eq!(inputs.genesis_id, identity.id().big_int().to_string());
    assert_eq!(inputs.profile_nonce, "0");

    // Both identity proofs padded to depth 40, the GIST proof to 64.
    assert_eq!(inputs.auth_claim_inc_mtp.len(), 40);
    assert_eq!(inputs.auth_claim_non_rev_mtp.len(), 40);
    assert_eq!(inputs.gist_mtp.len(), 64);

    // Empty revocation tree: non-membership with no neighbor.
    assert_eq!(inputs.auth_claim_non_rev_mtp_no_aux, "1");
    assert_eq!(inputs.auth_claim_non_rev_mtp_aux_hi, FieldHash::ZERO);

    // Unanchored identity: GIST non-membership with no neighbor.
    assert_eq!(inputs.gist_mtp_no_aux, "1");
    assert_eq!(inputs.gist_root.big_int(), BigInt::from(777));

    // Big-endian challenge decode.
    let expected = zkid_core::codec::bytes_to_field_int(
        &challenge,
        zkid_core::codec::ByteOrder::BigEndian,
    );
    assert_eq!(inputs.challenge, expected.to_string());

    // Tree state fields come from the genesis snapshot.
    assert_eq!(inputs.state, identity.tree_state().state);
    assert_eq!(inputs.claims_tree_root, identity.tree_state().claims_root);

    let bytes = inputs.to_json_bytes().unwrap();
    assert!(!bytes.is_empty());
}

#[tokio::test]
async fn assembly_is_deterministic_for_fixed_gist_and_challenge() {
    let server = MockServer::start().await;
    mount_rpc(&server, 777).await;

    let identity = identity(&server.uri());
    let client = StateContractClient::new(&identity.config().chain).unwrap();
    let challenge = [0x01; 32];

    let a = identity
        .prepare_auth_inputs(&client, &challenge)
        .await
        .unwrap()
        .to_json_bytes()
        .unwrap();
    let b = identity
        .prepare_auth_inputs(&client, &challenge)
        .await
        .unwrap()
        .to_json_bytes()
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn unreachable_node_surfaces_as_retryable_gist_error() {
    let identity = identity("http://127.0.0.1:1");
    let client = StateContractClient::new(&identity.config().chain).unwrap();

    let err = identity
        .prepare_auth_inputs(&client, &[0x01; 32])
        .await
        .unwrap_err();
    match err {
        ZkpError::GistFetch(chain_err) => assert!(chain_err.is_retryable()),
        other => panic!("expected GistFetch, got {other:?}"),
    }
}
