//! # zkid-zkp — Circuit-input assembly
//!
//! The proving core: everything between a private key and the serialized
//! input vector handed to the external zk-SNARK prover.
//!
//! - **[`Identity`]** — builds the per-identity Merkle state once, derives
//!   the DID, and prepares self-authentication circuit inputs.
//! - **Proof normalization** ([`proofs`]) — fixed-depth sibling padding
//!   and the tri-state non-membership descriptor.
//! - **[`ProofInputGenerator`]** — assembles selective-disclosure on-chain
//!   inputs from a credential, a proof request, and a pinned operation
//!   root.
//! - **[`circuits`]** — the circuit identifiers, the circuit-id →
//!   proof-type table, and the two wire-exact input records.
//! - **[`prover`]** — the external prover boundary and a deterministic
//!   mock for tests.
//!
//! Per proof request the pipeline performs up to three network reads
//! (GIST proof, revocation status, JSON-LD context). Independent reads
//! are issued concurrently and joined before assembly; no retries happen
//! inside the pipeline, and no error is ever downgraded to a default
//! value.

pub mod circuits;
pub mod error;
pub mod generator;
pub mod identity;
pub mod merklize;
pub mod proofs;
pub mod prover;
pub mod query;

// Re-export primary types.
pub use circuits::{AtomicQueryMtpV2OnChainInputs, AuthCircuitInputs, CircuitId};
pub use error::ZkpError;
pub use generator::ProofInputGenerator;
pub use identity::{Identity, IdentityConfig};
pub use proofs::{node_aux_value, pad_siblings, to_circuit_gist, GistProof, NodeAuxValue};
pub use prover::{CircuitArtifacts, MockProver, Prover, ZkProof};
pub use query::{CircuitQuery, CreateProofRequest, ProofQuery, ValueProof};
