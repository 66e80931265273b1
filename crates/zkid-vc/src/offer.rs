//! # Claim offers and the issuance handshake message
//!
//! An issuer advertises a credential with a [`ClaimOffer`]; the holder
//! answers with a [`ClaimDetails`] fetch-request message. The offer's
//! optional fields (`typ`, `threadID`) are modeled as `Option` and every
//! fallback is applied in one explicit, tested place —
//! [`ClaimDetails::from_offer`] — rather than scattered nil-coalescing.

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

/// Media type used when the offer does not specify one.
const FALLBACK_TYP: &str = "application/iden3-zkp-json";

/// The fetch-request message type.
const FETCH_REQUEST_TYPE: &str = "https://iden3-communication.io/credentials/1.0/fetch-request";

/// One credential advertised inside an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedCredential {
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// The credential identifier to request.
    pub id: String,
}

/// The offer body: advertised credentials and the agent callback URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferBody {
    /// The advertised credentials.
    #[serde(rename = "Credentials", alias = "credentials")]
    pub credentials: Vec<OfferedCredential>,
    /// Where to send the fetch-request message.
    pub url: String,
}

/// A credential offer as served by an issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOffer {
    /// The offer body.
    pub body: OfferBody,
    /// The issuer DID.
    pub from: String,
    /// Offer message id.
    #[serde(default)]
    pub id: String,
    /// Conversation thread id, when the issuer started one.
    #[serde(rename = "threadID", default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// The holder DID.
    pub to: String,
    /// Message media type, when specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Offer message type.
    #[serde(rename = "type")]
    pub offer_type: String,
}

/// Body of the fetch-request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDetailsBody {
    /// The credential identifier being requested.
    pub id: String,
}

/// The fetch-request message a holder sends back for an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDetails {
    /// Message id.
    pub id: String,
    /// Message media type.
    pub typ: String,
    /// Always the fetch-request message type.
    #[serde(rename = "type")]
    pub details_type: String,
    /// Conversation thread id.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The requested credential.
    pub body: ClaimDetailsBody,
    /// Sender: the holder (the offer's `to`).
    pub from: String,
    /// Recipient: the issuer (the offer's `from`).
    pub to: String,
}

impl ClaimDetails {
    /// Build the fetch-request for an offer, applying the documented
    /// fallbacks: a fresh uuid for a missing message or thread id, the
    /// standard media type for a missing `typ`. The `from`/`to` pair is
    /// swapped relative to the offer because the holder answers the
    /// issuer.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Malformed`] when the offer advertises no
    /// credentials or omits either DID.
    pub fn from_offer(offer: &ClaimOffer) -> Result<Self, CredentialError> {
        let fallback_guid = uuid::Uuid::new_v4().to_string();

        let credential = offer
            .body
            .credentials
            .first()
            .filter(|c| !c.id.is_empty())
            .ok_or_else(|| CredentialError::Malformed("offer advertises no credentials".into()))?;

        if offer.to.is_empty() {
            return Err(CredentialError::Malformed("offer is missing \"to\"".into()));
        }
        if offer.from.is_empty() {
            return Err(CredentialError::Malformed("offer is missing \"from\"".into()));
        }

        let id = if offer.id.is_empty() {
            fallback_guid.clone()
        } else {
            offer.id.clone()
        };
        let thread_id = match &offer.thread_id {
            Some(t) if !t.is_empty() => t.clone(),
            _ => fallback_guid,
        };
        let typ = match &offer.typ {
            Some(t) if !t.is_empty() => t.clone(),
            _ => FALLBACK_TYP.to_string(),
        };

        Ok(ClaimDetails {
            id,
            typ,
            details_type: FETCH_REQUEST_TYPE.to_string(),
            thread_id,
            body: ClaimDetailsBody {
                id: credential.id.clone(),
            },
            from: offer.to.clone(),
            to: offer.from.clone(),
        })
    }
}
