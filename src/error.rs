//! Error taxonomy for a report run.
//!
//! Every fallible operation in the crate returns [`ReportError`]. The pipeline
//! decides which variants end a run (client initialization, analytics and
//! batched content queries) and which are only logged (a single per-slug
//! lookup, a single storage write).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Credentials could not be loaded or exchanged for a token.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered, but with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The GraphQL endpoint reported errors in its response envelope.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
