//! Data models for analytics rows, content records and the published lists.
//!
//! This module defines the structures that flow through one report run:
//! - [`AnalyticsRow`]: one page-view row returned by the analytics backend
//! - [`ContentItem`]: a post as returned by the content service
//! - [`PopularItem`]: a post reshaped for the front end (no `exclusive` flag)
//! - [`PopularReport`]: the two assembled lists
//! - [`PopularList`]: the JSON document written to object storage
//!
//! Content-service and front-end field names are camelCase, so the structs
//! use `#[serde(rename_all = "camelCase")]` rather than non-snake-case fields.

use serde::{Deserialize, Serialize};

/// One row of the page-view report.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRow {
    /// The `pageTitle` dimension.
    pub page_title: String,
    /// The `pagePath` dimension, e.g. `/story/abc123`.
    pub page_path: String,
    /// The `screenPageViews` metric.
    pub views: u64,
}

/// A post as returned by the content service.
///
/// The `exclusive` flag is only used internally and is never written out;
/// see [`PopularItem`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
    /// The headline.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    pub slug: String,
    /// Origin of the post; `"yt"` marks video content.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub exclusive: Option<bool>,
}

/// Hero image as returned by the content service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeroImage {
    #[serde(default)]
    pub resized: Option<ResizedImage>,
}

/// The two resized variants requested for every hero image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResizedImage {
    #[serde(default)]
    pub w480: Option<String>,
    #[serde(default)]
    pub w800: Option<String>,
}

/// Hero image in the shape the front end expects.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularImage {
    pub url_tiny_sized: Option<String>,
    pub url_mobile_sized: Option<String>,
}

/// A post ready for publication.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub id: String,
    pub hero_image: Option<PopularImage>,
    pub name: Option<String>,
    pub publish_time: Option<String>,
    pub slug: String,
    pub source: Option<String>,
}

/// The two lists produced by one run, in analytics order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopularReport {
    pub articles: Vec<PopularItem>,
    pub videos: Vec<PopularItem>,
}

impl PopularReport {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.videos.is_empty()
    }
}

/// A published document: one list plus the shared window metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PopularList {
    pub report: Vec<PopularItem>,
    /// `YYYY-MM-DD`, two days before `end_date`.
    pub start_date: String,
    /// `YYYY-MM-DD`, the local date of the run.
    pub end_date: String,
    /// `YYYY-MM-DD HH:MM` in the report time zone.
    pub generate_time: String,
}
