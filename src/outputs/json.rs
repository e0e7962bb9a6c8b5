//! JSON documents for the front end.
//!
//! Both documents share the same envelope:
//!
//! ```json
//! {
//!   "report": [ ... ],
//!   "start_date": "2026-10-12",
//!   "end_date": "2026-10-14",
//!   "generate_time": "2026-10-14 09:05"
//! }
//! ```
//!
//! Text is written as raw UTF-8; non-ASCII characters are never `\u`-escaped.

use crate::error::Result;
use crate::models::{PopularItem, PopularList};
use crate::utils::DateWindow;

/// Object name of the popular articles document.
pub const ARTICLES_FILENAME: &str = "popularlist.json";
/// Object name of the popular videos document.
pub const VIDEOS_FILENAME: &str = "popular-videonews-list.json";

/// Wrap `items` in the shared document envelope.
pub fn popular_list(items: Vec<PopularItem>, window: &DateWindow) -> PopularList {
    PopularList {
        report: items,
        start_date: window.start_date.clone(),
        end_date: window.end_date.clone(),
        generate_time: window.generate_time.clone(),
    }
}

/// Serialize a document to UTF-8 JSON bytes.
pub fn to_bytes(list: &PopularList) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(list)?)
}

/// Object path for `filename` under the configured prefix.
///
/// The prefix is used verbatim, so it must carry its own trailing `/`.
pub fn object_path(prefix: &str, filename: &str) -> String {
    format!("{prefix}{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PopularImage;

    fn window() -> DateWindow {
        DateWindow {
            start_date: "2026-10-12".to_string(),
            end_date: "2026-10-14".to_string(),
            generate_time: "2026-10-14 09:05".to_string(),
        }
    }

    fn item(name: &str) -> PopularItem {
        PopularItem {
            id: "1".to_string(),
            hero_image: Some(PopularImage {
                url_tiny_sized: Some("https://img/480.jpg".to_string()),
                url_mobile_sized: None,
            }),
            name: Some(name.to_string()),
            publish_time: Some("2026-10-13T02:00:00.000Z".to_string()),
            slug: "abc".to_string(),
            source: Some("yt".to_string()),
        }
    }

    #[test]
    fn test_document_envelope() {
        let list = popular_list(vec![item("a")], &window());
        let value: serde_json::Value = serde_json::from_slice(&to_bytes(&list).unwrap()).unwrap();

        assert_eq!(value["start_date"], "2026-10-12");
        assert_eq!(value["end_date"], "2026-10-14");
        assert_eq!(value["generate_time"], "2026-10-14 09:05");
        assert_eq!(value["report"].as_array().unwrap().len(), 1);
        assert_eq!(value["report"][0]["heroImage"]["urlTinySized"], "https://img/480.jpg");
        assert!(value["report"][0]["heroImage"]["urlMobileSized"].is_null());
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let list = popular_list(vec![item("颱風最新動態")], &window());
        let text = String::from_utf8(to_bytes(&list).unwrap()).unwrap();
        assert!(text.contains("颱風最新動態"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_empty_report_document() {
        let list = popular_list(Vec::new(), &window());
        let text = String::from_utf8(to_bytes(&list).unwrap()).unwrap();
        assert!(text.starts_with(r#"{"report":[],"start_date":"2026-10-12""#));
    }

    #[test]
    fn test_object_path() {
        assert_eq!(object_path("json/", ARTICLES_FILENAME), "json/popularlist.json");
        assert_eq!(object_path("", VIDEOS_FILENAME), "popular-videonews-list.json");
    }
}
