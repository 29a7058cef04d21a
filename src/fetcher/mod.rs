pub mod http_fetcher;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// One entry a feed offers for fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub link: String,
    pub title: Option<String>,
    pub published_hint: Option<NaiveDate>,
}

/// Source of feed entries, newest first as the feed lists them.
///
/// An empty feed is `Ok(vec![])`; only unreachable or unparsable feeds are
/// errors.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn entries(&self, source_uri: &str) -> Result<Vec<Candidate>>;
}
