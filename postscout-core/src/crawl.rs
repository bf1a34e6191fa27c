use indicatif::{ProgressBar, ProgressStyle};
use postscout_scanner::error::Result;
use postscout_scanner::fetch::{DEFAULT_TIMEOUT_SECS, default_user_agent};
use postscout_scanner::{CrawlSummary, CrawlTarget, Crawler, FetchOptions, PageStore, ProgressCallback};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub project_id: String,
    /// Clamped into `1..=MAX_PAGE_LIMIT` when the target is built
    pub page_limit: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn target(&self) -> CrawlTarget {
        CrawlTarget::new(self.url.clone(), self.project_id.clone()).with_page_limit(self.page_limit)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            project_id: String::new(),
            page_limit: postscout_scanner::DEFAULT_PAGE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            show_progress_bars: false,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options, writing page text into `store`.
pub async fn execute_crawl<S: PageStore>(
    options: &CrawlOptions,
    store: &S,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<CrawlSummary> {
    let target = options.target();
    debug!(
        "Crawling {} for project {} (limit {}, timeout {}s)",
        target.seed_url, target.project_id, target.page_limit, options.timeout_secs
    );

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let mut crawler = Crawler::new(&options.fetch_options())?;

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let limit = target.page_limit;
        let callback: ProgressCallback = Arc::new(move |visited: usize, url: &str| {
            pb_clone.set_message(format!(
                "[{}/{}] {}",
                visited,
                limit,
                extract_url_path(url)
            ));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    if let Some(flag) = cancel {
        crawler = crawler.with_cancel_flag(flag);
    }

    let result = crawler.crawl(&target, store).await;

    // Finish progress bar (only if enabled)
    if let Some(ref pb) = progress_bar {
        match result {
            Ok(ref summary) => pb.finish_with_message(format!(
                "Crawl complete! {} pages visited, {} stored",
                summary.visited_count, summary.created
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
