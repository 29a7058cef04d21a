use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{BriefError, Result};
use crate::fetcher::Candidate;

#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS/Atom/JSON feed into fetch candidates, keeping the feed's
    /// own entry order. Entries without a link are dropped.
    pub fn normalize(&self, body: &[u8]) -> Result<(FeedMeta, Vec<Candidate>)> {
        let feed = parser::parse(body).map_err(|e| BriefError::FeedParse(e.to_string()))?;

        let meta = FeedMeta {
            title: feed.title.map(|t| decode_html_entities(&t.content).to_string()),
            description: feed
                .description
                .map(|d| decode_html_entities(&d.content).to_string()),
        };

        let candidates: Vec<Candidate> = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .filter(|l| !l.is_empty());
                if link.is_none() {
                    tracing::debug!("Skipping entry {} without a link", entry.id);
                }

                Some(Candidate {
                    link: link?,
                    title: entry
                        .title
                        .map(|t| decode_html_entities(&t.content).to_string()),
                    published_hint: entry
                        .published
                        .or(entry.updated)
                        .map(|dt| dt.date_naive()),
                })
            })
            .collect();

        Ok((meta, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <description>A test feed</description>
    <item>
      <title>Test Item 1</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Test Item 2</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
    </item>
    <item>
      <title>No link</title>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <subtitle>An Atom test feed</subtitle>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let (meta, candidates) = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(meta.title, Some("Test Feed".into()));
        assert_eq!(meta.description, Some("A test feed".into()));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].link, "https://example.com/item1");
        assert_eq!(candidates[0].title, Some("Test Item 1".into()));
        assert_eq!(
            candidates[0].published_hint,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(candidates[1].link, "https://example.com/item2");
    }

    #[test]
    fn test_parse_atom_uses_updated() {
        let (meta, candidates) = Normalizer::new().normalize(ATOM_SAMPLE.as_bytes()).unwrap();

        assert_eq!(meta.title, Some("Atom Test Feed".into()));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].link, "https://example.com/atom1");
        assert_eq!(
            candidates[0].published_hint,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_invalid_feed() {
        let result = Normalizer::new().normalize(b"<html>not a feed</html>");
        assert!(matches!(result, Err(BriefError::FeedParse(_))));
    }
}
