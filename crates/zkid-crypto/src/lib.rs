//! # zkid-crypto — Cryptographic primitives for the zkid stack
//!
//! This crate provides the building blocks the identity and proof layers
//! consume:
//!
//! - **[`FieldHash`]** — a BN254 field element in the 32-byte little-endian
//!   form shared by the Merkle trees and the circuits.
//! - **Poseidon hashing** over field integers ([`poseidon::hash_elems`]).
//! - **Baby Jubjub EdDSA** with Poseidon-flavoured challenge signing
//!   ([`keys::PrivateKey`]), circomlib-compatible.
//! - **[`Claim`]** — the fixed-width eight-slot claim record and its two
//!   derived tree keys.
//! - **[`SparseMerkleTree`]** — the in-memory sparse Merkle tree backing
//!   the per-identity claims, revocations, and roots trees.
//! - **[`TreeState`]** — the aggregate state snapshot
//!   `state = H(claims, revocations, roots)`, always recomputed and never
//!   stored independently.

pub mod claim;
pub mod error;
pub mod hash;
pub mod keys;
pub mod poseidon;
pub mod smt;
pub mod state;

// Re-export primary types.
pub use claim::{Claim, SchemaHash};
pub use error::CryptoError;
pub use hash::FieldHash;
pub use keys::{PoseidonSignature, PrivateKey, PublicKey};
pub use smt::{MtProof, NodeAux, SparseMerkleTree};
pub use state::TreeState;
