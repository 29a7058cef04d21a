use async_trait::async_trait;
use reqwest::Client;

use crate::app::{BriefError, Result};
use crate::scraper::{ContentExtractor, Extracted, Scraper, ScraperConfig};

/// Downloads pages with reqwest and extracts them locally.
pub struct HttpScraper {
    client: Client,
    extractor: ContentExtractor,
}

impl HttpScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout()).gzip(true).brotli(true);
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            extractor: ContentExtractor::new(config),
        })
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn extract(&self, link: &str) -> Result<Extracted> {
        let response = self.client.get(link).send().await?;
        response.error_for_status_ref()?;

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(BriefError::External(format!("Empty page: {}", link)));
        }

        tracing::debug!("Downloaded {} ({} bytes)", link, html.len());
        self.extractor.extract(&html)
    }
}
