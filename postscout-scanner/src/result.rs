use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happened to a single dequeued URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Text was extracted and written to the page store
    Stored,
    /// Fetched and parsed, but the body had no visible text
    Empty,
    /// Fetch or parse failed; no content and no links
    FetchFailed,
    /// Fetched and parsed, but the page store rejected the write
    StoreFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    pub url: String,
    pub status: PageStatus,
    pub status_code: Option<u16>,
    pub content_chars: usize,
    pub links_found: usize,
    pub response_time: Duration,
    pub error: Option<String>,
}

impl PageOutcome {
    pub fn new(url: String, status: PageStatus) -> Self {
        Self {
            url,
            status,
            status_code: None,
            content_chars: 0,
            links_found: 0,
            response_time: Duration::from_secs(0),
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url, PageStatus::FetchFailed)
        }
    }
}

/// Result of one crawl run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub project_id: String,
    /// Pages written to the store with non-empty content
    pub created: usize,
    /// Distinct URLs dequeued and processed, failures included
    pub visited_count: usize,
    /// The run stopped early because its cancellation flag was raised
    pub cancelled: bool,
    /// One entry per visited URL, in fetch order
    pub pages: Vec<PageOutcome>,
}

impl CrawlSummary {
    pub fn failed_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.status, PageStatus::FetchFailed | PageStatus::StoreFailed))
            .count()
    }
}
