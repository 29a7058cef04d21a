use chrono::{DateTime, NaiveDate};
use html_escape::decode_html_entities;

use crate::app::{BriefError, Result};
use crate::scraper::{Extracted, ScraperConfig};

const TITLE_META: &[&str] = &["og:title", "twitter:title"];
const DATE_META: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "date",
    "pubdate",
    "publish-date",
    "dc.date",
];

/// Pulls title, readable text and publication date out of an article page.
pub struct ContentExtractor {
    config: ScraperConfig,
}

impl ContentExtractor {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, html: &str) -> Result<Extracted> {
        let text = html2text::from_read(html.as_bytes(), self.config.wrap_width)
            .map_err(|e| BriefError::External(format!("Failed to convert HTML to text: {}", e)))?;

        let body = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if body.len() < self.config.min_body_length {
            return Err(BriefError::External(format!(
                "Extracted content too short ({} chars)",
                body.len()
            )));
        }

        let title = TITLE_META
            .iter()
            .find_map(|key| meta_content(html, key))
            .or_else(|| element_text(html, "title"))
            .unwrap_or_default();

        let published = DATE_META
            .iter()
            .find_map(|key| meta_content(html, key))
            .or_else(|| tag_attr(html, "time", "datetime"))
            .and_then(|s| parse_date(&s));

        Ok(Extracted {
            title,
            body,
            published,
        })
    }
}

/// Parse the date part of an ISO-8601, RFC 3339 or RFC 2822 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(s).map(|dt| dt.date_naive()))
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// `content` of the first `<meta>` whose `property` or `name` equals `key`.
fn meta_content(html: &str, key: &str) -> Option<String> {
    tags(html, "meta").find_map(|tag| {
        let matches = ["property", "name", "itemprop"]
            .iter()
            .filter_map(|attr| extract_attr(tag, attr))
            .any(|v| v.eq_ignore_ascii_case(key));
        if matches {
            extract_attr(tag, "content").filter(|c| !c.trim().is_empty())
        } else {
            None
        }
    })
}

fn tag_attr(html: &str, name: &str, attr: &str) -> Option<String> {
    tags(html, name).find_map(|tag| extract_attr(tag, attr))
}

/// Text between the first `<name ...>` and `</name>`.
fn element_text(html: &str, name: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find(&format!("<{}", name))?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find(&format!("</{}", name))?;
    let text = decode_html_entities(html[start..end].trim()).to_string();
    (!text.is_empty()).then_some(text)
}

/// Opening tags named `name`, from `<` up to (not including) `>`.
fn tags<'a>(html: &'a str, name: &str) -> impl Iterator<Item = &'a str> + 'a {
    let lower = html.to_ascii_lowercase();
    let needle = format!("<{}", name);
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(offset) = lower[from..].find(&needle) {
        let start = from + offset;
        let after = start + needle.len();
        let boundary = lower[after..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/');
        match lower[start..].find('>') {
            Some(len) => {
                if boundary {
                    found.push((start, start + len));
                }
                from = start + len;
            }
            None => break,
        }
    }

    found.into_iter().map(move |(s, e)| &html[s..e])
}

/// Extract an attribute value from an element string
fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    for quote in ['"', '\''] {
        let pattern = format!("{}={}", attr, quote);
        let mut from = 0;
        while let Some(offset) = lower[from..].find(&pattern) {
            let start = from + offset;
            let preceded_by_space = lower[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
            let value_start = start + pattern.len();
            if preceded_by_space {
                let end = tag[value_start..].find(quote)?;
                let value = &tag[value_start..value_start + end];
                return Some(decode_html_entities(value).to_string());
            }
            from = value_start;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fallback &amp; Title</title>
  <meta property="og:title" content="Rust &amp; Friends">
  <meta name="article:published_time" content="2024-02-03T10:00:00+00:00">
</head>
<body>
  <article>
    <p>First paragraph of the article.</p>
    <p>Second paragraph.</p>
  </article>
</body>
</html>"#;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(ScraperConfig::default())
    }

    #[test]
    fn test_extracts_meta_title_and_date() {
        let extracted = extractor().extract(PAGE).unwrap();
        assert_eq!(extracted.title, "Rust & Friends");
        assert_eq!(extracted.published, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert!(extracted.body.contains("First paragraph of the article."));
        assert!(extracted.body.contains("Second paragraph."));
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let html = "<html><head><title>Plain &amp; Simple</title></head><body><p>Hi</p></body></html>";
        let extracted = extractor().extract(html).unwrap();
        assert_eq!(extracted.title, "Plain & Simple");
        assert_eq!(extracted.published, None);
    }

    #[test]
    fn test_time_element_date() {
        let html = r#"<html><body><time datetime="2023-12-24">Dec 24</time><p>Body</p></body></html>"#;
        let extracted = extractor().extract(html).unwrap();
        assert_eq!(extracted.published, NaiveDate::from_ymd_opt(2023, 12, 24));
    }

    #[test]
    fn test_short_body_rejected() {
        let config = ScraperConfig {
            min_body_length: 500,
            ..Default::default()
        };
        let result = ContentExtractor::new(config).extract(PAGE);
        assert!(matches!(result, Err(BriefError::External(_))));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(parse_date("2024-01-02"), expected);
        assert_eq!(parse_date("2024-01-02T08:00:00Z"), expected);
        assert_eq!(parse_date("Tue, 02 Jan 2024 08:00:00 GMT"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_extract_attr_requires_word_boundary() {
        let tag = r#"<meta data-name="x" name='og:title' content="Y""#;
        assert_eq!(extract_attr(tag, "name"), Some("og:title".to_string()));
        assert_eq!(extract_attr(tag, "content"), Some("Y".to_string()));
    }
}
