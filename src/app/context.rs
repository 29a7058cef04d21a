use std::path::Path;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{FeedSource, HttpFetcher};
use crate::playback::{Playback, SystemPlayback};
use crate::scraper::{HttpScraper, Scraper};
use crate::store::sqlite::SqliteStore;

/// The store handle and external collaborators for one session.
pub struct AppContext {
    pub store: SqliteStore,
    pub feeds: Box<dyn FeedSource>,
    pub scraper: Box<dyn Scraper>,
    pub playback: Box<dyn Playback>,
    pub config: Config,
}

impl AppContext {
    /// Open the configured database and wire up the network and playback
    /// collaborators.
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.db_path()?;
        Self::open(&db_path, config)
    }

    pub fn open(db_path: &Path, config: Config) -> Result<Self> {
        let store = SqliteStore::new(db_path)?.with_item_order(config.store.item_order);
        tracing::debug!("Opened store at {}", db_path.display());

        Ok(Self {
            store,
            feeds: Box::new(HttpFetcher::new()?),
            scraper: Box::new(HttpScraper::new(config.scraper.clone())?),
            playback: Box::new(SystemPlayback::new(&config.playback)),
            config,
        })
    }

    /// Assemble a context from explicit parts.
    pub fn with_parts(
        store: SqliteStore,
        feeds: Box<dyn FeedSource>,
        scraper: Box<dyn Scraper>,
        playback: Box<dyn Playback>,
        config: Config,
    ) -> Self {
        Self {
            store: store.with_item_order(config.store.item_order),
            feeds,
            scraper,
            playback,
            config,
        }
    }
}
