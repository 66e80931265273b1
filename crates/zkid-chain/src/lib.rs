//! # zkid-chain — Network collaborators for the zkid stack
//!
//! Two read-only HTTP clients:
//!
//! - **[`StateContractClient`]** — fetches global identity-state (GIST)
//!   inclusion/non-inclusion proofs from the on-chain state contract via
//!   `eth_call`, latest or pinned to a historical root.
//! - **[`IssuerClient`]** — retrieves credential offers and fetches issued
//!   credentials from an issuer's agent endpoint.
//!
//! Both clients are plain request/response: no retries, no caching. A
//! GIST proof in particular is fetched fresh per proof request — a stale
//! root silently produces an unprovable witness.

pub mod config;
pub mod error;
pub mod issuer;
pub mod state_contract;

// Re-export primary types.
pub use config::ChainConfig;
pub use error::ChainError;
pub use issuer::IssuerClient;
pub use state_contract::{RawGistProof, StateContractClient};
