//! Structured error types for the proving core.
//!
//! Every pipeline stage surfaces its own variant, so an aborted request
//! names the stage that failed. Nothing is swallowed or downgraded: the
//! assemblers abort the whole request on the first error. The only
//! variants a caller should retry are the network-origin ones —
//! [`ZkpError::GistFetch`] when its source is retryable, and a
//! [`ZkpError::StatusResolve`] carrying a fetch failure.

use thiserror::Error;
use zkid_chain::ChainError;
use zkid_core::CoreError;
use zkid_crypto::CryptoError;
use zkid_vc::CredentialError;

/// Errors raised while building identities, queries, and circuit inputs.
#[derive(Error, Debug)]
pub enum ZkpError {
    /// A caller-supplied value is malformed or missing.
    #[error("input invalid: {0}")]
    InputInvalid(String),

    /// A raw proof is deeper than the fixed circuit depth. Indicates a
    /// configuration mismatch between identity and circuit; never retried.
    #[error("proof deeper than circuit depth: {got} > {max}")]
    ProofTooDeep {
        /// Sibling count of the raw proof.
        got: usize,
        /// The circuit's fixed depth.
        max: usize,
    },

    /// The circuit id has no issuance-proof type in the static table.
    #[error("no proof type registered for circuit {0}")]
    UnsupportedProofType(String),

    /// The assembler does not build inputs for this circuit.
    #[error("unsupported circuit for this assembler: {0}")]
    UnsupportedCircuit(String),

    /// The resolved revocation status shows the credential as revoked.
    #[error("credential is revoked")]
    CredentialRevoked,

    /// GIST proof retrieval failed.
    #[error("gist fetch stage failed: {0}")]
    GistFetch(#[from] ChainError),

    /// Revocation-status resolution failed.
    #[error("revocation status stage failed: {0}")]
    StatusResolve(#[source] CredentialError),

    /// Credential parsing or core-claim extraction failed.
    #[error("credential stage failed: {0}")]
    Credential(#[source] CredentialError),

    /// JSON-LD context retrieval failed during query building.
    #[error("document load stage failed: {0}")]
    DocumentLoad(#[source] CredentialError),

    /// Cryptographic computation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Codec or identifier error.
    #[error("codec error: {0}")]
    Core(#[from] CoreError),

    /// Input-record serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
