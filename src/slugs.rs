//! Candidate slug extraction from analytics rows.
//!
//! Story pages live under `/story/<slug>`. Rows are scanned in report order,
//! so the resulting candidate list is ordered by popularity and the first
//! occurrence of a slug decides its position.

use crate::models::AnalyticsRow;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// Slugs starting with this prefix are machine-generated content.
pub const MACHINE_PREFIX: &str = "mm-";

/// Static site pages that also live under `/story/`.
pub const EXCLUDED_SLUGS: [&str; 10] = [
    "aboutus",
    "ad-sales",
    "adsales",
    "biography",
    "complaint",
    "faq",
    "press-self-regulation",
    "privacy",
    "standards",
    "webauthorization",
];

static STORY_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/story/([\w-]+)").unwrap());

/// Extract the slug from a story path, if the path is one.
pub fn story_slug(path: &str) -> Option<&str> {
    STORY_PATH
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether a slug may become a candidate.
pub fn is_candidate(slug: &str) -> bool {
    !slug.starts_with(MACHINE_PREFIX) && !EXCLUDED_SLUGS.contains(&slug)
}

/// Scan rows in order and return deduplicated candidate slugs.
///
/// Rows whose path is not a story path are skipped, as are machine-generated
/// and administrative slugs.
///
/// # Arguments
///
/// * `rows` - Analytics rows in report order
///
/// # Returns
///
/// Candidate slugs, first occurrence wins.
#[instrument(level = "info", skip_all, fields(rows = rows.len()))]
pub fn extract_candidate_slugs(rows: &[AnalyticsRow]) -> Vec<String> {
    let slugs: Vec<String> = rows
        .iter()
        .filter_map(|row| story_slug(&row.page_path))
        .filter(|slug| is_candidate(slug))
        .unique()
        .map(str::to_string)
        .collect();

    debug!(count = slugs.len(), "Extracted candidate slugs");
    slugs
}
