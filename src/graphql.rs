//! GraphQL transport for the content service.
//!
//! Requests are plain `POST {query, variables}` JSON bodies. When both a
//! username and a password are configured the client first runs the
//! `authenticateUserWithPassword` mutation and sends the returned session
//! token as a bearer token on every later request.

use crate::error::{ReportError, Result};
use crate::utils::{ensure_success, truncate_for_log};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const AUTHENTICATE_MUTATION: &str = r#"
    mutation Authenticate($email: String!, $password: String!) {
        authenticateUserWithPassword(email: $email, password: $password) {
            ... on UserAuthenticationWithPasswordSuccess {
                sessionToken
            }
            ... on UserAuthenticationWithPasswordFailure {
                message
            }
        }
    }
"#;

/// Username and password for session authentication.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateData {
    authenticate_user_with_password: Option<AuthenticateResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateResult {
    session_token: Option<String>,
    message: Option<String>,
}

/// Decode a response envelope, turning reported errors into [`ReportError::GraphQl`].
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: GraphQlEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.errors.is_empty() {
        let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(ReportError::GraphQl(messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| ReportError::GraphQl("response carried no data".into()))
}

/// A GraphQL client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    session_token: Option<String>,
}

impl GraphQlClient {
    /// Build an unauthenticated client.
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ReportError::Config("GraphQL endpoint is required".into()));
        }
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| ReportError::Config(format!("invalid GraphQL endpoint {endpoint:?}: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            session_token: None,
        })
    }

    /// Build a client, authenticating first when credentials are available.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Auth`] when the mutation reports a failure or no
    /// session token.
    #[instrument(level = "info", skip(http, credentials))]
    pub async fn connect(
        http: reqwest::Client,
        endpoint: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Self> {
        let mut client = Self::new(http, endpoint)?;
        let Some(credentials) = credentials else {
            info!("Credentials not found, using an unauthenticated GraphQL client");
            return Ok(client);
        };

        client.session_token = Some(client.authenticate(credentials).await?);
        info!(username = %credentials.username, "Created authenticated GraphQL client");
        Ok(client)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.is_some()
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let variables = json!({
            "email": credentials.username,
            "password": credentials.password,
        });
        let data: AuthenticateData = self
            .execute(AUTHENTICATE_MUTATION, variables)
            .await
            .map_err(|e| ReportError::Auth(e.to_string()))?;

        match data.authenticate_user_with_password {
            Some(AuthenticateResult {
                session_token: Some(token),
                ..
            }) => Ok(token),
            Some(AuthenticateResult { message, .. }) => {
                let message = message.unwrap_or_else(|| "Unknown error".to_string());
                warn!(%message, "Authentication rejected");
                Err(ReportError::Auth(message))
            }
            None => Err(ReportError::Auth("No response".into())),
        }
    }

    /// Run `query` with `variables` and decode `data` into `T`.
    #[instrument(level = "debug", skip_all, fields(endpoint = %self.endpoint))]
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.session_token {
            request = request.bearer_auth(token);
        }

        let response = ensure_success("graphql endpoint", request.send().await?).await?;
        let body = response.text().await?;
        debug!(body = %truncate_for_log(&body, 300), "GraphQL response");
        decode_envelope(&body)
    }
}
