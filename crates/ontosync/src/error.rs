//! Error types for the sync pipeline
//!
//! Fetch-side failures abort a sync run; per-device create failures are
//! collected into the run report instead of propagating (except in batch
//! mode, where the batch call is the unit of failure).

use thiserror::Error;

/// Errors produced by the API clients and the sync orchestrator
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// A base URL or path join was invalid
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP client itself could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token source could not produce a usable access token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// No datasource with the requested name exists in the target building.
    /// Datasources are assumed pre-provisioned; the pipeline never creates one.
    #[error("datasource '{name}' not found in building {building_id}")]
    DatasourceNotFound { name: String, building_id: String },
}

impl Error {
    /// Wrap a reqwest error that occurred while calling `url`
    pub fn transport(url: &url::Url, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// Build a status error from a non-2xx response, capturing the body
    pub async fn from_response(url: &url::Url, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::Status {
            url: url.to_string(),
            status,
            body,
        }
    }
}
