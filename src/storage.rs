//! Object storage for the published documents.
//!
//! [`GcsStore`] writes through the Cloud Storage JSON API in two steps: a
//! media upload carrying the content type, then a metadata patch setting
//! `contentLanguage` and `cacheControl`. A failure in either step fails the
//! write.

use crate::error::{ReportError, Result};
use crate::google_auth::{GoogleAuth, STORAGE_READ_WRITE_SCOPE};
use crate::utils::ensure_success;
use serde::Serialize;
use tracing::{info, instrument};

const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";
const API_BASE: &str = "https://storage.googleapis.com/storage/v1";

/// Metadata attached to every written object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    #[serde(skip)]
    pub content_type: &'static str,
    pub content_language: &'static str,
    pub cache_control: &'static str,
}

impl ObjectMetadata {
    /// JSON for the front end: Chinese content, publicly cached for five minutes.
    pub const fn public_json() -> Self {
        Self {
            content_type: "application/json",
            content_language: "zh",
            cache_control: "max-age=300,public",
        }
    }
}

/// A destination for published documents.
pub trait ObjectStore {
    /// Write `body` to the object `name`, replacing any previous version.
    async fn put_object(&self, name: &str, body: Vec<u8>, metadata: &ObjectMetadata)
    -> Result<()>;
}

/// Cloud Storage bucket writer.
#[derive(Debug, Clone)]
pub struct GcsStore {
    http: reqwest::Client,
    auth: GoogleAuth,
    bucket: String,
}

impl GcsStore {
    pub fn new(http: reqwest::Client, auth: GoogleAuth, bucket: impl Into<String>) -> Self {
        Self {
            http,
            auth,
            bucket: bucket.into(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{UPLOAD_BASE}/b/{}/o", urlencoding::encode(&self.bucket))
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{API_BASE}/b/{}/o/{}",
            urlencoding::encode(&self.bucket),
            urlencoding::encode(name)
        )
    }
}

impl ObjectStore for GcsStore {
    #[instrument(level = "info", skip(self, body, metadata), fields(bucket = %self.bucket, bytes = body.len()))]
    async fn put_object(
        &self,
        name: &str,
        body: Vec<u8>,
        metadata: &ObjectMetadata,
    ) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(ReportError::Config("destination bucket is not configured".into()));
        }
        // Fetched per write so a credentials problem only fails this object.
        let token = self.auth.access_token(&self.http, STORAGE_READ_WRITE_SCOPE).await?;

        let response = self
            .http
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", name)])
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, metadata.content_type)
            .body(body)
            .send()
            .await?;
        ensure_success("cloud storage upload", response).await?;

        let response = self
            .http
            .patch(self.object_url(name))
            .bearer_auth(&token)
            .json(metadata)
            .send()
            .await?;
        ensure_success("cloud storage metadata patch", response).await?;

        info!(%name, "Uploaded object");
        Ok(())
    }
}
