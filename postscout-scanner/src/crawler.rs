use crate::document::{HtmlParser, PageParser, extract_links};
use crate::error::{Result, ScanError};
use crate::fetch::{FetchOptions, Fetcher, HttpFetcher};
use crate::normalize::page_key;
use crate::result::{CrawlSummary, PageOutcome, PageStatus};
use crate::store::PageStore;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use url::Url;

pub const MAX_PAGE_LIMIT: usize = 50;
pub const DEFAULT_PAGE_LIMIT: usize = MAX_PAGE_LIMIT;

/// Called before each fetch with the number of URLs visited so far
/// (including this one) and the URL about to be fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// One crawl request: where to start, who owns the pages, how far to go.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub seed_url: String,
    pub project_id: String,
    pub page_limit: usize,
}

impl CrawlTarget {
    pub fn new(seed_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            project_id: project_id.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Clamps to `1..=MAX_PAGE_LIMIT`.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }
}

/// Sequential breadth-first crawler bounded to the seed's hostname.
pub struct Crawler<F = HttpFetcher, P = HtmlParser> {
    fetcher: F,
    parser: P,
    progress_callback: Option<ProgressCallback>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Crawler {
    pub fn new(options: &FetchOptions) -> Result<Self> {
        Ok(Self::with_parts(HttpFetcher::new(options)?, HtmlParser::new()?))
    }
}

impl<F: Fetcher, P: PageParser> Crawler<F, P> {
    pub fn with_parts(fetcher: F, parser: P) -> Self {
        Self {
            fetcher,
            parser,
            progress_callback: None,
            cancel: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The crawl checks this flag before every fetch and stops once it is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run one crawl. Only an unusable seed URL fails the whole call; every
    /// per-page problem is logged, recorded in the summary and skipped.
    pub async fn crawl<S: PageStore>(&self, target: &CrawlTarget, store: &S) -> Result<CrawlSummary> {
        let seed = page_key(&target.seed_url).map_err(ScanError::InvalidUrl)?;
        let seed_host = seed.host_str().unwrap_or_default().to_string();
        let page_limit = target.page_limit;

        info!(
            "Starting crawl of {} for project {} (limit {} pages)",
            seed, target.project_id, page_limit
        );

        let mut summary = CrawlSummary {
            seed_url: seed.to_string(),
            project_id: target.project_id.clone(),
            ..CrawlSummary::default()
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut queued: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<Url> = VecDeque::new();
        queued.insert(seed.to_string());
        frontier.push_back(seed);

        while !frontier.is_empty() && visited.len() < page_limit {
            if self.is_cancelled() {
                info!("Crawl cancelled after {} pages", visited.len());
                summary.cancelled = true;
                break;
            }

            let Some(current) = frontier.pop_front() else {
                break;
            };
            let key = current.as_str().to_string();
            queued.remove(&key);
            if !visited.insert(key.clone()) {
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(visited.len(), &key);
            }

            let fetched = match self.fetcher.fetch(&current).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Crawl error for {}: {}", key, e);
                    summary.pages.push(PageOutcome::with_error(key, e.to_string()));
                    continue;
                }
            };

            let parsed = match self.parser.parse(&fetched.body) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Parse error for {}: {}", key, e);
                    summary.pages.push(PageOutcome::with_error(key, e.to_string()));
                    continue;
                }
            };

            let mut outcome = PageOutcome::new(key.clone(), PageStatus::Empty);
            outcome.status_code = Some(fetched.status_code);
            outcome.response_time = fetched.response_time;
            outcome.content_chars = parsed.text.chars().count();

            if !parsed.text.is_empty() {
                match store.upsert_page(&key, &target.project_id, &parsed.text) {
                    Ok(()) => {
                        summary.created += 1;
                        outcome.status = PageStatus::Stored;
                    }
                    Err(e) => {
                        // An unstored page counts as failed and contributes no links
                        warn!("Failed to store {}: {}", key, e);
                        outcome.status = PageStatus::StoreFailed;
                        outcome.error = Some(e.to_string());
                        summary.pages.push(outcome);
                        continue;
                    }
                }
            } else {
                debug!("No visible text on {}", key);
            }

            let links = extract_links(&parsed.hrefs, &current, &seed_host);
            outcome.links_found = links.len();

            for link in links {
                if visited.contains(link.as_str()) || queued.contains(link.as_str()) {
                    continue;
                }
                if visited.len() + frontier.len() >= page_limit {
                    debug!("Page limit reached, not queuing further links from {}", key);
                    break;
                }
                debug!("Queuing {}", link);
                queued.insert(link.as_str().to_string());
                frontier.push_back(link);
            }

            summary.pages.push(outcome);
        }

        summary.visited_count = visited.len();
        info!(
            "Crawl complete. Visited {} pages, stored {}",
            summary.visited_count, summary.created
        );
        Ok(summary)
    }
}
