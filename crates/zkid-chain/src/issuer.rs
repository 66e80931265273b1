//! # Issuer client
//!
//! Retrieves credential offers and fetches issued credentials from an
//! issuer's agent endpoint. The proof token posted to the agent is built
//! by the caller (it requires the external prover); this client only owns
//! the transport.

use serde::Deserialize;
use zkid_vc::{ClaimOffer, W3CCredential};

use crate::error::ChainError;

#[derive(Deserialize)]
struct AgentResponse {
    body: AgentResponseBody,
}

#[derive(Deserialize)]
struct AgentResponseBody {
    credential: W3CCredential,
}

/// Client for an issuer's offer and agent endpoints.
#[derive(Debug, Clone)]
pub struct IssuerClient {
    http: reqwest::Client,
}

impl IssuerClient {
    /// Create a client over an HTTP client.
    pub fn new(http: reqwest::Client) -> Self {
        IssuerClient { http }
    }

    /// Retrieve the credential offer for a holder.
    ///
    /// Calls `GET {issuer_api}/v1/credentials/{did}/{claim_type}`.
    ///
    /// # Errors
    ///
    /// Transport failures are retryable ([`ChainError::Unavailable`] /
    /// [`ChainError::Aborted`]); bad statuses and undecodable bodies are
    /// fatal.
    pub async fn get_offer(
        &self,
        issuer_api: &str,
        holder_did: &str,
        claim_type: &str,
    ) -> Result<ClaimOffer, ChainError> {
        let url = format!("{issuer_api}/v1/credentials/{holder_did}/{claim_type}");
        tracing::debug!(endpoint = %url, "retrieving claim offer");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::from_transport(&url, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Api {
                endpoint: url,
                status,
                body,
            });
        }

        response.json().await.map_err(|e| ChainError::Malformed {
            endpoint: url,
            reason: e.to_string(),
        })
    }

    /// Post a serialized proof token to the offer's agent URL and parse
    /// the issued credential out of the agent-response envelope.
    ///
    /// # Errors
    ///
    /// Same classification as [`IssuerClient::get_offer`].
    pub async fn fetch_credential(
        &self,
        agent_url: &str,
        proof_token: &str,
    ) -> Result<W3CCredential, ChainError> {
        tracing::debug!(endpoint = %agent_url, "fetching credential");

        let response = self
            .http
            .post(agent_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(proof_token.to_string())
            .send()
            .await
            .map_err(|e| ChainError::from_transport(agent_url, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Api {
                endpoint: agent_url.to_string(),
                status,
                body,
            });
        }

        let envelope: AgentResponse =
            response.json().await.map_err(|e| ChainError::Malformed {
                endpoint: agent_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(envelope.body.credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offer_body() -> serde_json::Value {
        serde_json::json!({
            "body": {
                "Credentials": [
                    { "description": "natural person", "id": "urn:uuid:6dff4518" }
                ],
                "url": "https://issuer.example/v1/agent"
            },
            "from": "did:iden3:readonly:issuer",
            "id": "offer-1",
            "threadID": "thread-1",
            "to": "did:iden3:readonly:holder",
            "typ": "application/iden3comm-plain-json",
            "type": "https://iden3-communication.io/credentials/1.0/offer"
        })
    }

    #[tokio::test]
    async fn get_offer_hits_credentials_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/v1/credentials/did:iden3:readonly:holder/urn:uuid:6dff4518",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(offer_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = IssuerClient::new(reqwest::Client::new());
        let offer = client
            .get_offer(
                &server.uri(),
                "did:iden3:readonly:holder",
                "urn:uuid:6dff4518",
            )
            .await
            .unwrap();
        assert_eq!(offer.body.credentials[0].id, "urn:uuid:6dff4518");
        assert_eq!(offer.from, "did:iden3:readonly:issuer");
    }

    #[tokio::test]
    async fn get_offer_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such holder"))
            .mount(&server)
            .await;

        let client = IssuerClient::new(reqwest::Client::new());
        let err = client
            .get_offer(&server.uri(), "did:iden3:readonly:holder", "urn:x")
            .await
            .unwrap_err();
        match err {
            ChainError::Api { status, body, .. } => {
                assert_eq!(status, 404);
                assert!(body.contains("no such holder"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_credential_posts_token_and_unwraps_envelope() {
        let server = MockServer::start().await;
        let credential = serde_json::json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": "did:iden3:readonly:issuer",
            "credentialSubject": { "isNatural": 1 }
        });
        Mock::given(method("POST"))
            .and(path("/v1/agent"))
            .and(body_string("jwz.token.payload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "body": { "credential": credential }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IssuerClient::new(reqwest::Client::new());
        let vc = client
            .fetch_credential(&format!("{}/v1/agent", server.uri()), "jwz.token.payload")
            .await
            .unwrap();
        assert_eq!(vc.issuer, "did:iden3:readonly:issuer");
        assert!(vc.proof.0.is_empty());
    }
}
