//! # zkid-vc — Verifiable credentials for the zkid stack
//!
//! The credential-side data model and its two network collaborators:
//!
//! - **[`W3CCredential`]** — the W3C credential envelope with an
//!   extensible subject and a tagged union over the known issuance-proof
//!   kinds (unknown kinds are preserved, not dropped).
//! - **[`ClaimOffer`] / [`ClaimDetails`]** — the issuance handshake
//!   messages, with every optional field's fallback made explicit.
//! - **[`CredentialStatusResolver`]** — fetches an issuer's revocation
//!   proof and rebuilds the issuer tree state, refusing any response whose
//!   declared state does not recompute from its roots.
//! - **[`DocumentLoader`]** — the JSON-LD context loader consumed by the
//!   merklized query path.

pub mod credential;
pub mod document;
pub mod error;
pub mod offer;
pub mod proof;
pub mod status;

// Re-export primary types.
pub use credential::{CredentialProof, CredentialProofs, CredentialStatus, W3CCredential};
pub use document::DocumentLoader;
pub use error::CredentialError;
pub use offer::{ClaimDetails, ClaimOffer};
pub use proof::{MtProofDto, NodeAuxDto};
pub use status::{CredentialStatusResolver, RevocationStatus};
