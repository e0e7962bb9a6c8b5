//! Content resolution: candidate slugs to content records.
//!
//! # Strategies
//!
//! | Strategy | Round trips | On failure |
//! |----------|-------------|------------|
//! | [`ResolveStrategy::Batched`] | one | the whole resolution fails |
//! | [`ResolveStrategy::PerSlug`] | one per slug, sequential | the slug is skipped |
//!
//! `Batched` is the default. `PerSlug` exists for content services that cap
//! the size of `in` filters.

use crate::error::Result;
use crate::graphql::GraphQlClient;
use crate::models::ContentItem;
use clap::ValueEnum;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

pub const POSTS_BY_SLUGS_QUERY: &str = r#"
    query GetPostsBySlugs($slugs: [String!]) {
        posts(where: { slug: { in: $slugs } }) {
            id
            heroImage {
                resized {
                    w480
                    w800
                }
            }
            name
            publishTime
            slug
            source
            exclusive
        }
    }
"#;

pub const POST_BY_SLUG_QUERY: &str = r#"
    query GetPostBySlug($slug: String!) {
        posts(where: { slug: { equals: $slug } }, take: 1) {
            id
            heroImage {
                resized {
                    w480
                    w800
                }
            }
            name
            publishTime
            slug
            source
            exclusive
        }
    }
"#;

/// How candidate slugs are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveStrategy {
    /// One query carrying every slug.
    #[default]
    Batched,
    /// One query per slug.
    PerSlug,
}

/// Lookup of posts by slug.
pub trait ContentSource {
    /// Fetch every post whose slug is in `slugs`, in any order.
    async fn posts_by_slugs(&self, slugs: &[String]) -> Result<Vec<ContentItem>>;

    /// Fetch the post with `slug`, if it exists.
    async fn post_by_slug(&self, slug: &str) -> Result<Option<ContentItem>>;
}

#[derive(Debug, Deserialize)]
struct PostsData {
    #[serde(default)]
    posts: Vec<ContentItem>,
}

impl ContentSource for GraphQlClient {
    #[instrument(level = "info", skip_all, fields(slugs = slugs.len()))]
    async fn posts_by_slugs(&self, slugs: &[String]) -> Result<Vec<ContentItem>> {
        let data: PostsData = self
            .execute(POSTS_BY_SLUGS_QUERY, json!({ "slugs": slugs }))
            .await?;
        info!(count = data.posts.len(), "Fetched posts by slug");
        Ok(data.posts)
    }

    #[instrument(level = "debug", skip(self))]
    async fn post_by_slug(&self, slug: &str) -> Result<Option<ContentItem>> {
        let data: PostsData = self
            .execute(POST_BY_SLUG_QUERY, json!({ "slug": slug }))
            .await?;
        Ok(data.posts.into_iter().next())
    }
}

/// Resolve candidate slugs to posts, keyed by slug.
///
/// # Arguments
///
/// * `source` - The content service
/// * `candidates` - Candidate slugs in popularity order
/// * `strategy` - Batched or per-slug lookup
///
/// # Returns
///
/// A slug-to-post map. Slugs unknown to the content service are absent.
///
/// # Errors
///
/// With [`ResolveStrategy::Batched`], any failure of the single query is
/// returned. [`ResolveStrategy::PerSlug`] never fails; failed lookups are
/// logged and skipped.
#[instrument(level = "info", skip(source, candidates), fields(candidates = candidates.len()))]
pub async fn resolve<C: ContentSource>(
    source: &C,
    candidates: &[String],
    strategy: ResolveStrategy,
) -> Result<HashMap<String, ContentItem>> {
    if candidates.is_empty() {
        debug!("No candidates; skipping content lookup");
        return Ok(HashMap::new());
    }

    let posts = match strategy {
        ResolveStrategy::Batched => source.posts_by_slugs(candidates).await?,
        ResolveStrategy::PerSlug => resolve_each(source, candidates).await,
    };

    let map: HashMap<String, ContentItem> = posts
        .into_iter()
        .map(|post| (post.slug.clone(), post))
        .collect();
    info!(resolved = map.len(), "Resolved candidate slugs");
    Ok(map)
}

/// One sequential lookup per slug; failures are skipped.
async fn resolve_each<C: ContentSource>(source: &C, candidates: &[String]) -> Vec<ContentItem> {
    stream::iter(candidates)
        .then(|slug| async move {
            match source.post_by_slug(slug).await {
                Ok(Some(post)) => Some(post),
                Ok(None) => {
                    debug!(%slug, "No post for slug");
                    None
                }
                Err(e) => {
                    warn!(%slug, error = %e, "Post lookup failed; skipping slug");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await
}
