//! # zkid-core — Foundational types for the zkid stack
//!
//! This crate provides the pieces every other crate in the workspace
//! builds on:
//!
//! - **Numeric codec** — byte-order conversions between on-chain
//!   little/big-endian encodings and the field-element big-integer
//!   representation circuits consume, plus state-hash hex reformatting.
//! - **Self-certified identifiers** — the 31-byte genesis [`Id`] and its
//!   [`Did`] string form, derived from an identity's genesis state.
//! - **Circuit constants** — fixed Merkle depths and the closed
//!   [`Operator`] enumeration for selective-disclosure queries.
//! - **Error hierarchy** — structured `thiserror` types; no
//!   `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod codec;
pub mod constants;
pub mod error;
pub mod id;

// Re-export primary types.
pub use codec::{bytes_to_field_int, field_int_to_bytes, reformat_state_hash, ByteOrder};
pub use constants::{Operator, ProofType};
pub use error::CoreError;
pub use id::{Did, Id, IdType};
