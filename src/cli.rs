//! Command-line interface definitions for the popular report service.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be provided through the environment variable named
//! next to it, which is how the service is configured when deployed.

use crate::content::ResolveStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the popular report service.
///
/// # Examples
///
/// ```sh
/// # Serve the trigger endpoint on 0.0.0.0:8000
/// GQL_ENDPOINT=https://cms.example.com/api/graphql BUCKET=web-assets ga_popular_report
///
/// # Generate and publish once, e.g. from cron
/// ga_popular_report --config report.yaml run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file; flags and env vars override it
    #[arg(short, long, env = "REPORT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint of the content service
    #[arg(long, env = "GQL_ENDPOINT", global = true)]
    pub gql_endpoint: Option<String>,

    /// Content service username (enables session authentication with a password)
    #[arg(long, env = "GQL_USERNAME", global = true)]
    pub gql_username: Option<String>,

    /// Content service password
    #[arg(long, env = "GQL_PASSWORD", hide_env_values = true, global = true)]
    pub gql_password: Option<String>,

    /// Destination bucket for the published documents
    #[arg(long, env = "BUCKET", global = true)]
    pub bucket: Option<String>,

    /// Object path prefix inside the bucket (include the trailing `/`)
    #[arg(long, env = "GCS_PATH", global = true)]
    pub gcs_path: Option<String>,

    /// GA4 property id
    #[arg(long, env = "GA_RESOURCE_ID", global = true)]
    pub ga_resource_id: Option<String>,

    /// Service-account key file; the metadata server is used when absent
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", global = true)]
    pub google_credentials: Option<PathBuf>,

    /// How candidate slugs are looked up in the content service
    #[arg(long, env = "RESOLVE_STRATEGY", value_enum, global = true)]
    pub resolve_strategy: Option<ResolveStrategy>,

    /// Address the trigger endpoint binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    pub host: String,

    /// Port the trigger endpoint listens on
    #[arg(long, env = "PORT", default_value_t = 8000, global = true)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP trigger endpoint (default)
    Serve,
    /// Generate and publish the report once, then exit
    Run,
}

impl Cli {
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::parse_from(["ga_popular_report"]);
        assert_eq!(cli.selected_command(), Command::Serve);
    }

    #[test]
    fn test_cli_run_with_options() {
        let cli = Cli::parse_from([
            "ga_popular_report",
            "run",
            "--gql-endpoint",
            "https://cms.example.com/api/graphql",
            "--bucket",
            "web-assets",
            "--gcs-path",
            "json/",
            "--resolve-strategy",
            "per-slug",
        ]);

        assert_eq!(cli.selected_command(), Command::Run);
        assert_eq!(
            cli.gql_endpoint.as_deref(),
            Some("https://cms.example.com/api/graphql")
        );
        assert_eq!(cli.bucket.as_deref(), Some("web-assets"));
        assert_eq!(cli.gcs_path.as_deref(), Some("json/"));
        assert_eq!(cli.resolve_strategy, Some(ResolveStrategy::PerSlug));
    }

    #[test]
    fn test_cli_port_flag() {
        let cli = Cli::parse_from(["ga_popular_report", "serve", "--port", "9090"]);
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.selected_command(), Command::Serve);
    }

    #[test]
    fn test_cli_short_config_flag() {
        let cli = Cli::parse_from(["ga_popular_report", "-c", "/etc/report.yaml", "run"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/report.yaml")));
    }
}
