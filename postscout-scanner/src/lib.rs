pub mod crawler;
pub mod document;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod result;
pub mod store;

pub use crawler::{CrawlTarget, Crawler, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, ProgressCallback};
pub use document::{HtmlParser, PageParser, ParsedPage};
pub use error::ScanError;
pub use fetch::{FetchOptions, FetchedPage, Fetcher, HttpFetcher};
pub use result::{CrawlSummary, PageOutcome, PageStatus};
pub use store::{MemoryStore, PageStore};
