//! Structured error types for the network collaborators.

use thiserror::Error;

/// Errors raised by the state-contract and issuer clients.
///
/// Only [`ChainError::Unavailable`] and [`ChainError::Aborted`] are
/// retryable; everything else indicates a data or configuration problem
/// and must not be retried blindly.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The endpoint could not be reached. Retryable.
    #[error("chain unavailable at {endpoint}: {source}")]
    Unavailable {
        /// The endpoint that was queried.
        endpoint: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The call was cancelled or timed out. Retryable.
    #[error("call to {endpoint} aborted: {reason}")]
    Aborted {
        /// The endpoint that was queried.
        endpoint: String,
        /// What interrupted the call.
        reason: String,
    },

    /// The RPC node answered with an error object.
    #[error("rpc error {code} from {endpoint}: {message}")]
    Rpc {
        /// The endpoint that answered.
        endpoint: String,
        /// The JSON-RPC error code.
        code: i64,
        /// The JSON-RPC error message.
        message: String,
    },

    /// An HTTP endpoint answered with a non-success status.
    #[error("{endpoint} answered HTTP {status}: {body}")]
    Api {
        /// The endpoint that answered.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// A response body could not be decoded.
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed {
        /// The endpoint that answered.
        endpoint: String,
        /// Why decoding failed.
        reason: String,
    },
}

impl ChainError {
    /// Classify a transport error from `reqwest` into aborted (timeout)
    /// or unavailable.
    pub(crate) fn from_transport(endpoint: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ChainError::Aborted {
                endpoint: endpoint.to_string(),
                reason: "timed out".to_string(),
            }
        } else {
            ChainError::Unavailable {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }

    /// Whether a caller may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChainError::Unavailable { .. } | ChainError::Aborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_classification() {
        let aborted = ChainError::Aborted {
            endpoint: "http://rpc".into(),
            reason: "timed out".into(),
        };
        assert!(aborted.is_retryable());

        let rpc = ChainError::Rpc {
            endpoint: "http://rpc".into(),
            code: -32000,
            message: "execution reverted".into(),
        };
        assert!(!rpc.is_retryable());

        let malformed = ChainError::Malformed {
            endpoint: "http://rpc".into(),
            reason: "short word".into(),
        };
        assert!(!malformed.is_retryable());
    }

    #[test]
    fn displays_carry_endpoint() {
        let err = ChainError::Api {
            endpoint: "http://issuer/v1/credentials".into(),
            status: 404,
            body: "not found".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("http://issuer/v1/credentials"));
        assert!(msg.contains("404"));
    }
}
