//! # State-contract (GIST) client
//!
//! Read-only `eth_call` client for the identity state contract. The two
//! calls, `getGISTProof(uint256)` and `getGISTProofByRoot(uint256,uint256)`,
//! both return the same static struct:
//!
//! ```text
//! (root, existence, siblings[64], index, value,
//!  auxExistence, auxIndex, auxValue)
//! ```
//!
//! which ABI-encodes to exactly 71 32-byte words, so the reply is decoded
//! by word offset without an ABI library. Selectors are Keccak-256 over
//! the Solidity signatures.

use num_bigint::BigInt;
use serde::Deserialize;
use sha3::{Digest, Keccak256};
use zkid_core::codec::{bytes_to_field_int, field_int_to_bytes, ByteOrder};

use crate::config::ChainConfig;
use crate::error::ChainError;

/// Word count of the ABI-encoded proof struct.
const PROOF_WORDS: usize = 71;

/// Fixed sibling count of a GIST proof.
const GIST_SIBLINGS: usize = 64;

/// A GIST proof exactly as the contract returns it, before any circuit
/// normalization. Ephemeral — fetched fresh per proof request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGistProof {
    /// The global tree root the proof is anchored to.
    pub root: BigInt,
    /// Whether the queried identity is in the tree.
    pub existence: bool,
    /// The 64 sibling hashes.
    pub siblings: Vec<BigInt>,
    /// The leaf index the proof terminates at.
    pub index: BigInt,
    /// The leaf value the proof terminates at.
    pub value: BigInt,
    /// Whether a foreign neighbor leaf exists (non-inclusion only).
    pub aux_existence: bool,
    /// The neighbor leaf's index.
    pub aux_index: BigInt,
    /// The neighbor leaf's value.
    pub aux_value: BigInt,
}

#[derive(Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Read-only client for the identity state contract.
#[derive(Debug, Clone)]
pub struct StateContractClient {
    http: reqwest::Client,
    rpc_url: String,
    contract: String,
}

impl StateContractClient {
    /// Build a client from chain configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Malformed`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChainError::Malformed {
                endpoint: config.evm_rpc_url.clone(),
                reason: format!("client init: {e}"),
            })?;
        Ok(StateContractClient {
            http,
            rpc_url: config.evm_rpc_url.clone(),
            contract: config.state_contract_address.clone(),
        })
    }

    /// Fetch the GIST proof for an identity, either against the latest
    /// root or pinned to a historical one.
    ///
    /// # Errors
    ///
    /// Transport failures surface as [`ChainError::Unavailable`] /
    /// [`ChainError::Aborted`] (retryable); RPC errors and undecodable
    /// replies are fatal.
    pub async fn gist_proof(
        &self,
        user_id: &BigInt,
        pinned_root: Option<&BigInt>,
    ) -> Result<RawGistProof, ChainError> {
        let calldata = match pinned_root {
            None => encode_call("getGISTProof(uint256)", &[user_id])?,
            Some(root) => encode_call("getGISTProofByRoot(uint256,uint256)", &[user_id, root])?,
        };

        tracing::debug!(
            endpoint = %self.rpc_url,
            contract = %self.contract,
            pinned = pinned_root.is_some(),
            "fetching GIST proof"
        );

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": self.contract, "data": calldata },
                "latest"
            ]
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::from_transport(&self.rpc_url, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Api {
                endpoint: self.rpc_url.clone(),
                status,
                body,
            });
        }

        let reply: RpcReply = response.json().await.map_err(|e| ChainError::Malformed {
            endpoint: self.rpc_url.clone(),
            reason: e.to_string(),
        })?;

        if let Some(err) = reply.error {
            return Err(ChainError::Rpc {
                endpoint: self.rpc_url.clone(),
                code: err.code,
                message: err.message,
            });
        }

        let result = reply.result.ok_or_else(|| ChainError::Malformed {
            endpoint: self.rpc_url.clone(),
            reason: "reply carries neither result nor error".to_string(),
        })?;

        decode_gist_proof(&result).map_err(|reason| ChainError::Malformed {
            endpoint: self.rpc_url.clone(),
            reason,
        })
    }
}

/// Four-byte selector of a Solidity function signature.
fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// ABI-encode a call with static `uint256` arguments.
fn encode_call(signature: &str, args: &[&BigInt]) -> Result<String, ChainError> {
    let mut data = Vec::with_capacity(4 + args.len() * 32);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        let word =
            field_int_to_bytes(arg, ByteOrder::BigEndian, 32).map_err(|e| ChainError::Malformed {
                endpoint: signature.to_string(),
                reason: e.to_string(),
            })?;
        data.extend_from_slice(&word);
    }
    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode the 71-word proof struct from an `eth_call` result.
fn decode_gist_proof(result: &str) -> Result<RawGistProof, String> {
    let payload = result.strip_prefix("0x").unwrap_or(result);
    let bytes = hex::decode(payload).map_err(|e| format!("bad result hex: {e}"))?;
    if bytes.len() < PROOF_WORDS * 32 {
        return Err(format!(
            "expected {} words, got {} bytes",
            PROOF_WORDS,
            bytes.len()
        ));
    }

    let word = |i: usize| -> BigInt {
        bytes_to_field_int(&bytes[i * 32..(i + 1) * 32], ByteOrder::BigEndian)
    };
    let flag = |i: usize| -> bool { bytes[(i + 1) * 32 - 1] != 0 };

    let siblings = (2..2 + GIST_SIBLINGS).map(word).collect();

    Ok(RawGistProof {
        root: word(0),
        existence: flag(1),
        siblings,
        index: word(66),
        value: word(67),
        aux_existence: flag(68),
        aux_index: word(69),
        aux_value: word(70),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> ChainConfig {
        ChainConfig {
            evm_rpc_url: uri.to_string(),
            state_contract_address: "0x134b1be34911e39a8397ec6289782989729807a4".into(),
            core_api_url: None,
            timeout_secs: 5,
        }
    }

    /// Build a syntactically valid 71-word reply.
    fn encoded_proof(root: u64, existence: bool, aux_existence: bool) -> String {
        let mut words: Vec<String> = Vec::with_capacity(PROOF_WORDS);
        words.push(format!("{root:064x}"));
        words.push(format!("{:064x}", u64::from(existence)));
        for i in 0..GIST_SIBLINGS {
            words.push(format!("{i:064x}"));
        }
        words.push(format!("{:064x}", 5u64)); // index
        words.push(format!("{:064x}", 6u64)); // value
        words.push(format!("{:064x}", u64::from(aux_existence)));
        words.push(format!("{:064x}", 7u64)); // auxIndex
        words.push(format!("{:064x}", 8u64)); // auxValue
        format!("0x{}", words.concat())
    }

    #[test]
    fn selector_is_four_bytes_and_stable() {
        let a = selector("getGISTProof(uint256)");
        let b = selector("getGISTProof(uint256)");
        let c = selector("getGISTProofByRoot(uint256,uint256)");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn encode_call_lays_out_selector_and_words() {
        let user = BigInt::from(0xabcdu32);
        let data = encode_call("getGISTProof(uint256)", &[&user]).unwrap();
        // 0x + 4 selector bytes + one 32-byte word.
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.ends_with(&format!("{:064x}", 0xabcdu32)));
    }

    #[test]
    fn decode_reads_all_fields() {
        let proof = decode_gist_proof(&encoded_proof(99, true, false)).unwrap();
        assert_eq!(proof.root, BigInt::from(99));
        assert!(proof.existence);
        assert_eq!(proof.siblings.len(), GIST_SIBLINGS);
        assert_eq!(proof.siblings[3], BigInt::from(3));
        assert_eq!(proof.index, BigInt::from(5));
        assert_eq!(proof.value, BigInt::from(6));
        assert!(!proof.aux_existence);
        assert_eq!(proof.aux_index, BigInt::from(7));
        assert_eq!(proof.aux_value, BigInt::from(8));
    }

    #[test]
    fn decode_rejects_short_replies() {
        assert!(decode_gist_proof("0x1234").is_err());
    }

    #[tokio::test]
    async fn fetches_latest_proof() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains("eth_call"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": encoded_proof(42, false, true)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StateContractClient::new(&config(&server.uri())).unwrap();
        let proof = client.gist_proof(&BigInt::from(1234), None).await.unwrap();
        assert_eq!(proof.root, BigInt::from(42));
        assert!(!proof.existence);
        assert!(proof.aux_existence);
    }

    #[tokio::test]
    async fn pinned_fetch_sends_both_words() {
        let server = MockServer::start().await;
        let user = BigInt::from(0x1111u32);
        let root = BigInt::from(0x2222u32);
        Mock::given(method("POST"))
            .and(body_string_contains(format!("{:064x}", 0x1111u32)))
            .and(body_string_contains(format!("{:064x}", 0x2222u32)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": encoded_proof(1, true, false)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StateContractClient::new(&config(&server.uri())).unwrap();
        client.gist_proof(&user, Some(&root)).await.unwrap();
    }

    #[tokio::test]
    async fn rpc_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "execution reverted" }
            })))
            .mount(&server)
            .await;

        let client = StateContractClient::new(&config(&server.uri())).unwrap();
        let err = client.gist_proof(&BigInt::from(1), None).await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc { code: -32000, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn unreachable_node_is_retryable() {
        let client = StateContractClient::new(&config("http://127.0.0.1:1")).unwrap();
        let err = client.gist_proof(&BigInt::from(1), None).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
