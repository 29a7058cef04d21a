use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::{Candidate, FeedSource};
use crate::normalizer::Normalizer;

pub struct HttpFetcher {
    client: Client,
    normalizer: Normalizer,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("brief/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            normalizer: Normalizer::new(),
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl FeedSource for HttpFetcher {
    async fn entries(&self, source_uri: &str) -> Result<Vec<Candidate>> {
        let body = self.fetch(source_uri).await?;
        let (meta, candidates) = self.normalizer.normalize(&body)?;
        tracing::debug!(
            "Feed {} ({}) lists {} entries",
            source_uri,
            meta.title.as_deref().unwrap_or("untitled"),
            candidates.len()
        );
        Ok(candidates)
    }
}
