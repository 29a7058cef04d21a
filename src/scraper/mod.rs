//! Article extraction.
//!
//! Turns an article link into a title, a plain-text body and, when the page
//! declares one, a publication date.
//!
//! ```text
//! link → Scraper (download) → ContentExtractor (HTML → text) → Extracted
//! ```

mod config;
mod extractor;
mod http;

pub use config::ScraperConfig;
pub use extractor::{parse_date, ContentExtractor};
pub use http::HttpScraper;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::app::Result;

/// Content pulled out of an article page.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub title: String,
    pub body: String,
    pub published: Option<NaiveDate>,
}

/// Trait for article extraction implementations
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Download `link` and extract its article content.
    async fn extract(&self, link: &str) -> Result<Extracted>;
}
