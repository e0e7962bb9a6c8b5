//! One report run: analytics → candidates → content → lists → storage.
//!
//! [`popular_report`] is the run itself, generic over its three upstreams so
//! it can be exercised with in-memory implementations. [`run_once`] builds the
//! real clients from [`ReportConfig`] and reduces the outcome to a
//! [`RunStatus`] for the trigger surface.
//!
//! # Failure handling
//!
//! | Stage | On failure |
//! |-------|------------|
//! | client construction | run fails |
//! | analytics report | run fails |
//! | batched content lookup | logged, empty lists are published, run succeeds |
//! | a single per-slug lookup | slug skipped |
//! | a single document write | logged, the other document is still written, run succeeds |

use crate::analytics::{AnalyticsSource, GaClient};
use crate::config::ReportConfig;
use crate::content::{ContentSource, ResolveStrategy, resolve};
use crate::error::Result;
use crate::google_auth::GoogleAuth;
use crate::graphql::GraphQlClient;
use crate::models::PopularList;
use crate::outputs::json::{ARTICLES_FILENAME, VIDEOS_FILENAME, object_path, popular_list, to_bytes};
use crate::report::assemble;
use crate::slugs::extract_candidate_slugs;
use crate::storage::{GcsStore, ObjectMetadata, ObjectStore};
use crate::utils::{DateWindow, report_now};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// The status string reported to the trigger caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Ok => f.write_str("Ok"),
            RunStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Per-run knobs independent of the upstream clients.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Prefix for both object names.
    pub gcs_path: String,
    pub resolve_strategy: ResolveStrategy,
}

/// Outcome of one document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub path: String,
    pub written: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub window: DateWindow,
    pub candidates: usize,
    pub articles: usize,
    pub videos: usize,
    /// The batched content lookup failed and the lists were published empty.
    pub content_failed: bool,
    pub uploads: Vec<UploadOutcome>,
}

impl RunSummary {
    pub fn all_written(&self) -> bool {
        self.uploads.iter().all(|u| u.written)
    }
}

/// Generate both lists and write them.
///
/// # Arguments
///
/// * `analytics` - Page-view source
/// * `content` - Content service
/// * `store` - Destination for the two documents
/// * `options` - Object prefix and resolution strategy
/// * `now` - Run time in the report time zone
///
/// # Errors
///
/// Returns the error of the analytics report. A failed batched content lookup
/// is reported through [`RunSummary::content_failed`] and document write
/// failures through [`RunSummary::uploads`].
#[instrument(level = "info", skip_all, fields(strategy = ?options.resolve_strategy))]
pub async fn popular_report<A, C, S>(
    analytics: &A,
    content: &C,
    store: &S,
    options: &PipelineOptions,
    now: DateTime<FixedOffset>,
) -> Result<RunSummary>
where
    A: AnalyticsSource,
    C: ContentSource,
    S: ObjectStore,
{
    let window = DateWindow::ending_at(now);

    let rows = analytics.run_report(&window).await?;
    if let Some(top) = rows.first() {
        info!(title = %top.page_title, path = %top.page_path, views = top.views, "Most viewed page");
    }
    let candidates = extract_candidate_slugs(&rows);
    info!(rows = rows.len(), candidates = candidates.len(), "Extracted candidates");

    let (posts, content_failed) =
        match resolve(content, &candidates, options.resolve_strategy).await {
            Ok(posts) => (posts, false),
            Err(e) => {
                error!(error = %e, "Content lookup failed; degrading to an empty report");
                (HashMap::new(), true)
            }
        };
    let report = assemble(&candidates, &posts);
    if report.is_empty() {
        warn!("No resolved posts; publishing empty lists");
    }
    info!(
        articles = report.articles.len(),
        videos = report.videos.len(),
        "Assembled report"
    );

    let summary_counts = (report.articles.len(), report.videos.len());
    let documents = [
        (ARTICLES_FILENAME, popular_list(report.articles, &window)),
        (VIDEOS_FILENAME, popular_list(report.videos, &window)),
    ];

    let metadata = ObjectMetadata::public_json();
    let mut uploads = Vec::with_capacity(documents.len());
    for (filename, document) in &documents {
        let path = object_path(&options.gcs_path, filename);
        let written = match write_document(store, &path, document, &metadata).await {
            Ok(()) => {
                info!(%path, "Successfully uploaded");
                true
            }
            Err(e) => {
                error!(%path, error = %e, "Failed to upload document");
                false
            }
        };
        uploads.push(UploadOutcome { path, written });
    }

    Ok(RunSummary {
        window,
        candidates: candidates.len(),
        articles: summary_counts.0,
        videos: summary_counts.1,
        content_failed,
        uploads,
    })
}

async fn write_document<S: ObjectStore>(
    store: &S,
    path: &str,
    document: &PopularList,
    metadata: &ObjectMetadata,
) -> Result<()> {
    let body = to_bytes(document)?;
    store.put_object(path, body, metadata).await
}

/// Build the real clients and run once.
///
/// Never fails: every error is logged and reported as [`RunStatus::Failed`].
#[instrument(level = "info", skip_all, fields(property = %config.ga_resource_id))]
pub async fn run_once(config: &ReportConfig) -> RunStatus {
    let t0 = Instant::now();
    let now = report_now();
    let http = reqwest::Client::new();

    let auth = match GoogleAuth::load(config.google_credentials.as_deref()).await {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "Failed to load Google credentials");
            return RunStatus::Failed;
        }
    };

    let analytics = match GaClient::connect(http.clone(), &auth, &config.ga_resource_id).await {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to initialize GA client");
            return RunStatus::Failed;
        }
    };

    let content = match GraphQlClient::connect(
        http.clone(),
        &config.gql_endpoint,
        config.gql_credentials.as_ref(),
    )
    .await
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to initialize GraphQL client");
            return RunStatus::Failed;
        }
    };
    info!(authenticated = content.is_authenticated(), "Content client ready");

    let store = GcsStore::new(http, auth, config.bucket.clone());
    let options = PipelineOptions {
        gcs_path: config.gcs_path.clone(),
        resolve_strategy: config.resolve_strategy,
    };

    match popular_report(&analytics, &content, &store, &options, now).await {
        Ok(summary) => {
            if summary.content_failed {
                warn!("Published empty lists after a content lookup failure");
            }
            if !summary.all_written() {
                for upload in summary.uploads.iter().filter(|u| !u.written) {
                    warn!(path = %upload.path, "Document was not written");
                }
            }
            info!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                candidates = summary.candidates,
                articles = summary.articles,
                videos = summary.videos,
                start_date = %summary.window.start_date,
                "Popular report complete"
            );
            RunStatus::Ok
        }
        Err(e) => {
            error!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                error = %e,
                "Popular report failed"
            );
            RunStatus::Failed
        }
    }
}
