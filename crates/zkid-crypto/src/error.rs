//! Structured error types for the cryptographic primitives.

use thiserror::Error;

/// Errors raised by field conversions, hashing, signing, and the sparse
/// Merkle tree.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A value does not fit in the BN254 scalar field.
    #[error("value outside the field: {0}")]
    FieldOverflow(String),

    /// Poseidon hashing failed (bad arity or backend failure).
    #[error("hash error: {0}")]
    Hash(String),

    /// Key import, derivation, or signing failed.
    #[error("key error: {0}")]
    Key(String),

    /// A hex-encoded value could not be decoded or has the wrong width.
    #[error("malformed hex: \"{value}\" ({reason})")]
    MalformedHex {
        /// The string that failed to decode.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An entry with this tree key already exists.
    #[error("entry already exists for key {0}")]
    KeyExists(String),

    /// Tree insertion or traversal ran past the configured depth.
    #[error("reached max level {0}")]
    ReachedMaxLevel(usize),

    /// A stored node referenced a child that is not in the node store.
    #[error("dangling node reference {0}")]
    DanglingNode(String),

    /// A declared aggregate state does not match the recomputed one.
    #[error("tree state mismatch: declared {declared}, recomputed {recomputed}")]
    StateMismatch {
        /// The state hash the peer declared.
        declared: String,
        /// The state hash recomputed from the three roots.
        recomputed: String,
    },
}
