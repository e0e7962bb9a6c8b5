//! Page-view report from the GA4 Data API.
//!
//! The report is fixed: dimensions `pageTitle` and `pagePath`, metric
//! `screenPageViews`, over [`DateWindow`] with `today` as the end date, ordered
//! by views so the most-viewed pages come first.
//!
//! # Architecture
//!
//! - [`AnalyticsSource`]: the seam the pipeline depends on
//! - [`GaClient`]: the `runReport` REST implementation

use crate::error::{ReportError, Result};
use crate::google_auth::{ANALYTICS_READONLY_SCOPE, GoogleAuth};
use crate::models::AnalyticsRow;
use crate::utils::{DateWindow, ensure_success};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Source of page-view rows.
pub trait AnalyticsSource {
    /// Run the page-view report over `window`.
    async fn run_report(&self, window: &DateWindow) -> Result<Vec<AnalyticsRow>>;
}

/// Request body for `properties/{id}:runReport`.
pub fn report_request(window: &DateWindow) -> Value {
    json!({
        "dimensions": [{ "name": "pageTitle" }, { "name": "pagePath" }],
        "metrics": [{ "name": "screenPageViews" }],
        "dateRanges": [{ "startDate": window.start_date, "endDate": "today" }],
        "orderBys": [{ "metric": { "metricName": "screenPageViews" }, "desc": true }],
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimension_values: Vec<ReportValue>,
    #[serde(default)]
    pub metric_values: Vec<ReportValue>,
}

#[derive(Debug, Deserialize)]
pub struct ReportValue {
    #[serde(default)]
    pub value: String,
}

impl RunReportResponse {
    /// Convert raw rows, skipping any that lack the two requested dimensions.
    pub fn into_rows(self) -> Vec<AnalyticsRow> {
        self.rows
            .into_iter()
            .filter_map(|row| {
                let mut dims = row.dimension_values.into_iter();
                let page_title = dims.next()?.value;
                let page_path = dims.next()?.value;
                let views = row
                    .metric_values
                    .first()
                    .and_then(|m| m.value.parse().ok())
                    .unwrap_or(0);
                Some(AnalyticsRow {
                    page_title,
                    page_path,
                    views,
                })
            })
            .collect()
    }
}

/// GA4 Data API client for one property.
#[derive(Debug)]
pub struct GaClient {
    http: reqwest::Client,
    property_id: String,
    access_token: String,
}

impl GaClient {
    /// Authenticate and build a client for `property_id`.
    ///
    /// # Errors
    ///
    /// Fails if no access token can be obtained; the pipeline treats this as
    /// a client-initialization failure.
    #[instrument(level = "info", skip(http, auth))]
    pub async fn connect(
        http: reqwest::Client,
        auth: &GoogleAuth,
        property_id: &str,
    ) -> Result<Self> {
        if property_id.trim().is_empty() {
            return Err(ReportError::Config("analytics property id is empty".into()));
        }
        let access_token = auth.access_token(&http, ANALYTICS_READONLY_SCOPE).await?;
        info!("Analytics client ready");
        Ok(Self {
            http,
            property_id: property_id.to_string(),
            access_token,
        })
    }
}

impl AnalyticsSource for GaClient {
    #[instrument(level = "info", skip_all, fields(property = %self.property_id, start = %window.start_date))]
    async fn run_report(&self, window: &DateWindow) -> Result<Vec<AnalyticsRow>> {
        let url = format!("{DATA_API_BASE}/properties/{}:runReport", self.property_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&report_request(window))
            .send()
            .await?;
        let report: RunReportResponse = ensure_success("analytics data api", response)
            .await?
            .json()
            .await?;

        if report.rows.is_empty() {
            warn!("Analytics report returned no rows");
        }
        let rows = report.into_rows();
        info!(count = rows.len(), "Fetched analytics rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DateWindow {
        DateWindow {
            start_date: "2026-10-12".to_string(),
            end_date: "2026-10-14".to_string(),
            generate_time: "2026-10-14 09:05".to_string(),
        }
    }

    #[test]
    fn test_report_request_shape() {
        let body = report_request(&window());
        assert_eq!(body["dimensions"][0]["name"], "pageTitle");
        assert_eq!(body["dimensions"][1]["name"], "pagePath");
        assert_eq!(body["metrics"][0]["name"], "screenPageViews");
        assert_eq!(body["dateRanges"][0]["startDate"], "2026-10-12");
        assert_eq!(body["dateRanges"][0]["endDate"], "today");
        assert_eq!(body["orderBys"][0]["desc"], true);
    }

    #[test]
    fn test_response_into_rows() {
        let json = r#"{
            "dimensionHeaders": [{"name": "pageTitle"}, {"name": "pagePath"}],
            "metricHeaders": [{"name": "screenPageViews", "type": "TYPE_INTEGER"}],
            "rows": [
                {
                    "dimensionValues": [{"value": "頭條"}, {"value": "/story/abc"}],
                    "metricValues": [{"value": "1520"}]
                },
                {
                    "dimensionValues": [{"value": "首頁"}, {"value": "/"}],
                    "metricValues": [{"value": "980"}]
                }
            ],
            "rowCount": 2,
            "kind": "analyticsData#runReport"
        }"#;

        let response: RunReportResponse = serde_json::from_str(json).unwrap();
        let rows = response.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].page_path, "/story/abc");
        assert_eq!(rows[0].views, 1520);
        assert_eq!(rows[1].page_title, "首頁");
    }

    #[test]
    fn test_empty_response_has_no_rows() {
        // The API omits `rows` entirely when nothing matched.
        let response: RunReportResponse =
            serde_json::from_str(r#"{"kind": "analyticsData#runReport"}"#).unwrap();
        assert!(response.into_rows().is_empty());
    }

    #[test]
    fn test_row_missing_path_is_skipped() {
        let json = r#"{"rows": [{"dimensionValues": [{"value": "only title"}], "metricValues": []}]}"#;
        let response: RunReportResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_rows().is_empty());
    }
}
