//! Assembly of the popular articles and popular videos lists.
//!
//! Candidates are walked in popularity order. Every resolved post is a
//! candidate for both lists:
//! - the first [`ARTICLE_CAP`] resolved posts become articles
//! - posts whose source is [`VIDEO_SOURCE`] become videos, deduplicated by id,
//!   up to [`VIDEO_CAP`], scanning past the article cap if needed
//!
//! The walk stops as soon as both lists are full.

use crate::models::{ContentItem, PopularImage, PopularItem, PopularReport};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

pub const ARTICLE_CAP: usize = 30;
pub const VIDEO_CAP: usize = 11;

/// Source tag of video posts.
pub const VIDEO_SOURCE: &str = "yt";

/// Reshape a post for publication.
///
/// Drops `exclusive` and maps the hero image's `w480`/`w800` variants to
/// `urlTinySized`/`urlMobileSized`. A hero image without resized variants
/// becomes `null`.
pub fn format_item(post: &ContentItem) -> PopularItem {
    let hero_image = post
        .hero_image
        .as_ref()
        .and_then(|image| image.resized.as_ref())
        .map(|resized| PopularImage {
            url_tiny_sized: resized.w480.clone(),
            url_mobile_sized: resized.w800.clone(),
        });

    PopularItem {
        id: post.id.clone(),
        hero_image,
        name: post.name.clone(),
        publish_time: post.publish_time.clone(),
        slug: post.slug.clone(),
        source: post.source.clone(),
    }
}

fn is_video(post: &ContentItem) -> bool {
    post.source.as_deref() == Some(VIDEO_SOURCE)
}

/// Build both lists from candidates and their resolved posts.
///
/// # Arguments
///
/// * `candidates` - Candidate slugs in popularity order
/// * `posts` - Resolved posts keyed by slug; unresolved slugs are skipped
#[instrument(level = "info", skip_all, fields(candidates = candidates.len(), resolved = posts.len()))]
pub fn assemble(candidates: &[String], posts: &HashMap<String, ContentItem>) -> PopularReport {
    let mut report = PopularReport::default();
    let mut video_ids: HashSet<&str> = HashSet::new();

    for post in candidates.iter().filter_map(|slug| posts.get(slug)) {
        if report.articles.len() < ARTICLE_CAP {
            report.articles.push(format_item(post));
        }

        if is_video(post) && report.videos.len() < VIDEO_CAP && video_ids.insert(post.id.as_str()) {
            report.videos.push(format_item(post));
        }

        if report.articles.len() >= ARTICLE_CAP && report.videos.len() >= VIDEO_CAP {
            break;
        }
    }

    debug!(
        articles = report.articles.len(),
        videos = report.videos.len(),
        "Assembled popular report"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeroImage, ResizedImage};

    fn post(id: &str, slug: &str, source: Option<&str>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            hero_image: None,
            name: Some(format!("Post {id}")),
            publish_time: None,
            slug: slug.to_string(),
            source: source.map(str::to_string),
            exclusive: Some(true),
        }
    }

    fn index(posts: Vec<ContentItem>) -> (Vec<String>, HashMap<String, ContentItem>) {
        let slugs = posts.iter().map(|p| p.slug.clone()).collect();
        let map = posts.into_iter().map(|p| (p.slug.clone(), p)).collect();
        (slugs, map)
    }

    #[test]
    fn test_format_item_with_resized_image() {
        let mut item = post("1", "a", None);
        item.hero_image = Some(HeroImage {
            resized: Some(ResizedImage {
                w480: Some("https://img/480.jpg".to_string()),
                w800: Some("https://img/800.jpg".to_string()),
            }),
        });

        let formatted = format_item(&item);
        let value = serde_json::to_value(&formatted).unwrap();
        let image = value["heroImage"].as_object().unwrap();
        assert_eq!(image.len(), 2);
        assert_eq!(image["urlTinySized"], "https://img/480.jpg");
        assert_eq!(image["urlMobileSized"], "https://img/800.jpg");
    }

    #[test]
    fn test_format_item_image_without_resized_is_null() {
        let mut item = post("1", "a", None);
        item.hero_image = Some(HeroImage { resized: None });
        assert!(format_item(&item).hero_image.is_none());
    }

    #[test]
    fn test_format_item_without_image_is_null() {
        let value = serde_json::to_value(format_item(&post("1", "a", None))).unwrap();
        assert!(value["heroImage"].is_null());
    }

    #[test]
    fn test_exclusive_flag_is_stripped() {
        let value = serde_json::to_value(format_item(&post("1", "a", None))).unwrap();
        assert!(value.get("exclusive").is_none());
    }

    #[test]
    fn test_articles_capped_at_thirty() {
        let posts = (0..50).map(|i| post(&i.to_string(), &format!("s{i}"), None)).collect();
        let (slugs, map) = index(posts);

        let report = assemble(&slugs, &map);
        assert_eq!(report.articles.len(), ARTICLE_CAP);
        assert_eq!(report.articles[0].slug, "s0");
        assert_eq!(report.articles[29].slug, "s29");
        assert!(report.videos.is_empty());
    }

    #[test]
    fn test_videos_collected_beyond_article_cap() {
        // 35 plain posts first, then 15 videos: articles fill from the plain
        // posts, videos still scan past the article cap.
        let mut posts: Vec<ContentItem> =
            (0..35).map(|i| post(&i.to_string(), &format!("s{i}"), None)).collect();
        posts.extend((0..15).map(|i| post(&format!("v{i}"), &format!("v{i}"), Some("yt"))));
        let (slugs, map) = index(posts);

        let report = assemble(&slugs, &map);
        assert_eq!(report.articles.len(), ARTICLE_CAP);
        assert!(report.articles.iter().all(|a| a.source.is_none()));
        assert_eq!(report.videos.len(), VIDEO_CAP);
        assert_eq!(report.videos[0].id, "v0");
        assert_eq!(report.videos[10].id, "v10");
    }

    #[test]
    fn test_video_is_also_an_article() {
        let (slugs, map) = index(vec![post("1", "a", Some("yt")), post("2", "b", None)]);
        let report = assemble(&slugs, &map);
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.videos.len(), 1);
        assert_eq!(report.videos[0].slug, "a");
    }

    #[test]
    fn test_videos_deduplicated_by_id() {
        let (slugs, map) = index(vec![
            post("same", "first", Some("yt")),
            post("same", "second", Some("yt")),
        ]);
        let report = assemble(&slugs, &map);
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.videos.len(), 1);
        assert_eq!(report.videos[0].slug, "first");
    }

    #[test]
    fn test_unresolved_candidates_are_skipped() {
        let (_, map) = index(vec![post("1", "a", None), post("2", "c", None)]);
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let report = assemble(&candidates, &map);
        let slugs: Vec<&str> = report.articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn test_order_follows_candidates_not_map() {
        let (_, map) = index(vec![post("1", "a", None), post("2", "b", None)]);
        let candidates = vec!["b".to_string(), "a".to_string()];
        let report = assemble(&candidates, &map);
        assert_eq!(report.articles[0].slug, "b");
        assert_eq!(report.articles[1].slug, "a");
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble(&[], &HashMap::new()).is_empty());
    }
}
