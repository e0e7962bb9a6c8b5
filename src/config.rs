//! Run configuration.
//!
//! [`ReportConfig`] is built once at startup and passed to every client
//! constructor; nothing below `main` reads the process environment.
//!
//! # Precedence
//!
//! 1. Command-line flags and environment variables ([`Cli`])
//! 2. The optional YAML file named by `--config` / `REPORT_CONFIG`
//! 3. Built-in defaults
//!
//! # YAML File
//!
//! ```yaml
//! gql_endpoint: https://cms.example.com/api/graphql
//! gql_username: reporter@example.com
//! gql_password: secret
//! bucket: web-assets
//! gcs_path: json/
//! ga_resource_id: "311149968"
//! resolve_strategy: batched
//! ```

use crate::cli::Cli;
use crate::content::ResolveStrategy;
use crate::error::{ReportError, Result};
use crate::graphql::Credentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const DEFAULT_GA_RESOURCE_ID: &str = "311149968";

/// Settings read from the YAML file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub gql_endpoint: Option<String>,
    pub gql_username: Option<String>,
    pub gql_password: Option<String>,
    pub bucket: Option<String>,
    pub gcs_path: Option<String>,
    pub ga_resource_id: Option<String>,
    pub google_credentials: Option<PathBuf>,
    pub resolve_strategy: Option<ResolveStrategy>,
}

impl FileSettings {
    #[instrument(level = "info")]
    pub async fn from_path(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let settings = serde_yaml::from_str(&raw)?;
        info!("Loaded config file");
        Ok(settings)
    }
}

/// Everything one report run needs.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub gql_endpoint: String,
    /// `None` unless both username and password are set.
    pub gql_credentials: Option<Credentials>,
    pub bucket: String,
    /// Prefix prepended verbatim to the document filenames.
    pub gcs_path: String,
    pub ga_resource_id: String,
    pub google_credentials: Option<PathBuf>,
    pub resolve_strategy: ResolveStrategy,
}

impl ReportConfig {
    /// Load the YAML file named on the command line, if any, and merge.
    pub async fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileSettings::from_path(path).await?,
            None => FileSettings::default(),
        };
        Self::merge(cli, file)
    }

    /// Merge command-line values over file values over defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] when no GraphQL endpoint is configured.
    pub fn merge(cli: &Cli, file: FileSettings) -> Result<Self> {
        let gql_endpoint = cli
            .gql_endpoint
            .clone()
            .or(file.gql_endpoint)
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                ReportError::Config("GQL_ENDPOINT environment variable is required".into())
            })?;

        let username = cli.gql_username.clone().or(file.gql_username);
        let password = cli.gql_password.clone().or(file.gql_password);
        let gql_credentials = match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials { username, password })
            }
            (None, None) => None,
            _ => {
                warn!("Only one of GQL_USERNAME / GQL_PASSWORD is set; ignoring credentials");
                None
            }
        };

        let bucket = cli.bucket.clone().or(file.bucket).unwrap_or_default();
        if bucket.is_empty() {
            warn!("BUCKET is not set; uploads will fail");
        }

        Ok(Self {
            gql_endpoint,
            gql_credentials,
            bucket,
            gcs_path: cli.gcs_path.clone().or(file.gcs_path).unwrap_or_default(),
            ga_resource_id: cli
                .ga_resource_id
                .clone()
                .or(file.ga_resource_id)
                .unwrap_or_else(|| DEFAULT_GA_RESOURCE_ID.to_string()),
            google_credentials: cli.google_credentials.clone().or(file.google_credentials),
            resolve_strategy: cli
                .resolve_strategy
                .or(file.resolve_strategy)
                .unwrap_or_default(),
        })
    }
}
