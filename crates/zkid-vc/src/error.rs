//! Structured error types for the credential layer.

use thiserror::Error;
use zkid_crypto::CryptoError;

/// Errors raised while parsing credentials, resolving revocation status,
/// or loading JSON-LD documents.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The credential envelope or one of its typed proofs is malformed.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// The credential carries no proof of the requested kind.
    #[error("credential carries no {0} proof")]
    MissingProof(String),

    /// The revocation-status service could not be reached. Retryable.
    #[error("revocation status fetch failed for {endpoint}: {source}")]
    RevocationStatusFetch {
        /// The status endpoint that was queried.
        endpoint: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The revocation-status response is unusable: malformed body, bad
    /// HTTP status, or a declared issuer state that does not recompute
    /// from the declared roots. Not retryable.
    #[error("revocation status invalid: {0}")]
    RevocationStatusInvalid(String),

    /// A JSON-LD context document could not be loaded. Retryable.
    #[error("document load failed for {endpoint}: {reason}")]
    DocumentLoad {
        /// The context URL that was requested.
        endpoint: String,
        /// What went wrong.
        reason: String,
    },

    /// A cryptographic conversion failed while decoding proof material.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
