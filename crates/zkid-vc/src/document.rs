//! # JSON-LD document loader
//!
//! Fetches remote JSON-LD context documents for the merklized query path.
//! This is the only document fetch in the workspace; callers own retry and
//! caching policy.

use crate::error::CredentialError;

/// Loads JSON-LD documents over HTTP.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    http: reqwest::Client,
}

impl DocumentLoader {
    /// Create a loader over an HTTP client.
    pub fn new(http: reqwest::Client) -> Self {
        DocumentLoader { http }
    }

    /// Fetch the document at `url` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::DocumentLoad`] for transport failures,
    /// non-success statuses, and non-JSON bodies.
    pub async fn load(&self, url: &str) -> Result<serde_json::Value, CredentialError> {
        tracing::debug!(endpoint = %url, "loading JSON-LD document");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CredentialError::DocumentLoad {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CredentialError::DocumentLoad {
                endpoint: url.to_string(),
                reason: format!("HTTP {}", response.status().as_u16()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| CredentialError::DocumentLoad {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })
    }
}
