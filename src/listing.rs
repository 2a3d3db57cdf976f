// src/listing.rs
//! DART listing endpoint (`list.json`): request/response model and the
//! `ListingSource` seam the orchestrator pages through.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use serde::Deserialize;

use crate::filing::Filing;

const DART_LIST_URL: &str = "https://opendart.fss.or.kr/api/list.json";
/// DART success status code.
pub const STATUS_OK: &str = "000";

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("listing request timed out")]
    Timeout,
}

/// One page of the listing. A non-success `status` or an empty `list` ends
/// pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    pub status: String,
    #[serde(default)]
    pub list: Vec<Filing>,
}

impl ListingPage {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Inclusive begin/end dates in the `YYYYMMDD` format the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub bgn_de: String,
    pub end_de: String,
}

impl DateWindow {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self {
            bgn_de: begin.format("%Y%m%d").to_string(),
            end_de: end.format("%Y%m%d").to_string(),
        }
    }

    /// Window ending today, starting `days` calendar days back.
    pub fn last_days(days: i64) -> Self {
        let end = Local::now().date_naive();
        let begin = end - ChronoDuration::days(days);
        Self::new(begin, end)
    }
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(
        &self,
        page_no: u32,
        page_count: u32,
        window: Option<&DateWindow>,
    ) -> Result<ListingPage, ListingError>;
}

pub struct DartListingClient {
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl DartListingClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl ListingSource for DartListingClient {
    async fn fetch_page(
        &self,
        page_no: u32,
        page_count: u32,
        window: Option<&DateWindow>,
    ) -> Result<ListingPage, ListingError> {
        let mut params = vec![
            ("crtfc_key", self.api_key.clone()),
            ("page_count", page_count.to_string()),
            ("page_no", page_no.to_string()),
        ];
        if let Some(w) = window {
            params.push(("bgn_de", w.bgn_de.clone()));
            params.push(("end_de", w.end_de.clone()));
        }
        let page = self
            .client
            .get(DART_LIST_URL)
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<ListingPage>()
            .await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_deserializes_and_tolerates_missing_list() {
        let ok: ListingPage = serde_json::from_str(
            r#"{"status":"000","list":[{"report_nm":"공급계약체결","corp_name":"X","rcept_no":"1"}]}"#,
        )
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.list.len(), 1);

        // "013: no data" responses omit the list entirely.
        let empty: ListingPage = serde_json::from_str(r#"{"status":"013"}"#).unwrap();
        assert!(!empty.is_success());
        assert!(empty.list.is_empty());
    }

    #[test]
    fn date_window_formats_yyyymmdd() {
        let w = DateWindow::new(
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 23).unwrap(),
        );
        assert_eq!(w.bgn_de, "20260120");
        assert_eq!(w.end_de, "20260123");
    }
}
