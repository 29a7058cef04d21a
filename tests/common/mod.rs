#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brief::app::{AppContext, BriefError, Result};
use brief::config::Config;
use brief::domain::NewItem;
use brief::fetcher::{Candidate, FeedSource};
use brief::playback::Playback;
use brief::scraper::{Extracted, Scraper};
use brief::store::{SqliteStore, Store};

/// Serves canned entries; unknown feeds fail to parse.
#[derive(Default)]
pub struct FakeFeeds {
    pub feeds: HashMap<String, Vec<Candidate>>,
}

impl FakeFeeds {
    pub fn with(mut self, uri: &str, links: &[&str]) -> Self {
        let entries = links
            .iter()
            .map(|link| Candidate {
                link: link.to_string(),
                title: Some(format!("Entry {}", link)),
                published_hint: None,
            })
            .collect();
        self.feeds.insert(uri.to_string(), entries);
        self
    }
}

#[async_trait]
impl FeedSource for FakeFeeds {
    async fn entries(&self, source_uri: &str) -> Result<Vec<Candidate>> {
        self.feeds
            .get(source_uri)
            .cloned()
            .ok_or_else(|| BriefError::FeedParse(format!("not a feed: {}", source_uri)))
    }
}

/// Extracts a fixed page for every link, except links containing "broken".
pub struct FakeScraper;

#[async_trait]
impl Scraper for FakeScraper {
    async fn extract(&self, link: &str) -> Result<Extracted> {
        if link.contains("broken") {
            return Err(BriefError::External(format!("cannot parse {}", link)));
        }
        Ok(Extracted {
            title: format!("Title of {}", link),
            body: format!("Body of {}", link),
            published: None,
        })
    }
}

/// Records what was played. Bodies containing "FAIL" fail to play.
#[derive(Clone, Default)]
pub struct FakePlayback {
    pub spoken: Arc<Mutex<Vec<(String, f64)>>>,
    pub viewed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Playback for FakePlayback {
    async fn speak(&self, body: &str, speed: f64) -> Result<()> {
        if body.contains("FAIL") {
            return Err(BriefError::External("tts exited with status 1".into()));
        }
        self.spoken.lock().unwrap().push((body.to_string(), speed));
        Ok(())
    }

    async fn view(&self, title: &str, _body: &str) -> Result<()> {
        self.viewed.lock().unwrap().push(title.to_string());
        Ok(())
    }
}

pub fn context(feeds: FakeFeeds, playback: FakePlayback) -> AppContext {
    AppContext::with_parts(
        SqliteStore::in_memory().unwrap(),
        Box::new(feeds),
        Box::new(FakeScraper),
        Box::new(playback),
        Config::default(),
    )
}

pub fn add_item(ctx: &AppContext, link: &str, title: &str, body: &str) -> i64 {
    let mut item = NewItem::new(link, "https://www.example.com/feed");
    item.title = title.to_string();
    item.body = body.to_string();
    ctx.store.add_item(&item).unwrap()
}

pub fn item_titles(ctx: &AppContext) -> Vec<(i64, String)> {
    ctx.store
        .get_all_items()
        .unwrap()
        .into_iter()
        .map(|item| (item.id, item.title))
        .collect()
}

pub fn feed_uris(ctx: &AppContext) -> Vec<(i64, String)> {
    ctx.store
        .get_all_subscriptions()
        .unwrap()
        .into_iter()
        .map(|feed| (feed.id, feed.source_uri))
        .collect()
}

pub fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}
