//! # External prover boundary
//!
//! The assemblers in this crate end at a serialized input record; actual
//! witness computation and proof generation happen in an external prover
//! given two binary circuit artifacts. [`Prover`] is that boundary, and
//! [`MockProver`] is a deterministic stand-in for tests — transparent,
//! with no zero-knowledge guarantees.

use serde::{Deserialize, Serialize};

use crate::error::ZkpError;
use crate::merklize::string_entry;

/// The binary artifacts a circuit ships with: the witness calculator and
/// the proving key.
#[derive(Clone)]
pub struct CircuitArtifacts {
    /// The wasm witness calculator.
    pub wasm: Vec<u8>,
    /// The proving key.
    pub proving_key: Vec<u8>,
}

impl std::fmt::Debug for CircuitArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitArtifacts")
            .field("wasm_bytes", &self.wasm.len())
            .field("proving_key_bytes", &self.proving_key.len())
            .finish()
    }
}

/// An opaque proof object as returned by a prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    /// The proof points, prover-specific.
    pub proof: serde_json::Value,
    /// The public signals.
    pub pub_signals: Vec<String>,
}

/// The external prover boundary. Implementations receive a fully
/// validated, immutable input record — never a partially filled one.
pub trait Prover: Send + Sync {
    /// Produce a proof for serialized circuit inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ZkpError`] when the inputs or artifacts are unusable.
    fn prove(&self, inputs_json: &[u8], artifacts: &CircuitArtifacts) -> Result<ZkProof, ZkpError>;
}

/// Deterministic mock prover for tests: the "proof" is a field hash of
/// the input bytes, so identical inputs yield identical proofs and any
/// input change is visible.
#[derive(Debug, Clone, Default)]
pub struct MockProver;

impl Prover for MockProver {
    fn prove(&self, inputs_json: &[u8], _artifacts: &CircuitArtifacts) -> Result<ZkProof, ZkpError> {
        if inputs_json.is_empty() {
            return Err(ZkpError::InputInvalid("empty input record".to_string()));
        }
        let text = std::str::from_utf8(inputs_json)
            .map_err(|e| ZkpError::InputInvalid(format!("input record is not UTF-8: {e}")))?;
        let digest = string_entry(text)?;
        Ok(ZkProof {
            proof: serde_json::json!({ "mock": digest.to_string() }),
            pub_signals: vec![digest.to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts() -> CircuitArtifacts {
        CircuitArtifacts {
            wasm: vec![0x00, 0x61, 0x73, 0x6d],
            proving_key: vec![1, 2, 3],
        }
    }

    #[test]
    fn mock_prover_is_deterministic() {
        let prover = MockProver;
        let a = prover.prove(b"{\"x\":1}", &artifacts()).unwrap();
        let b = prover.prove(b"{\"x\":1}", &artifacts()).unwrap();
        let c = prover.prove(b"{\"x\":2}", &artifacts()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.pub_signals.len(), 1);
    }

    #[test]
    fn mock_prover_rejects_empty_input() {
        let prover = MockProver;
        assert!(matches!(
            prover.prove(b"", &artifacts()),
            Err(ZkpError::InputInvalid(_))
        ));
    }

    #[test]
    fn artifacts_debug_prints_sizes_not_bytes() {
        let printed = format!("{:?}", artifacts());
        assert!(printed.contains("wasm_bytes"));
        assert!(printed.contains('4'));
    }
}
