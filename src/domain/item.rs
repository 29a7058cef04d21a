use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A stored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub source_uri: String,
    pub title: String,
    pub body: String,
    pub origin_uri: String,
    pub fetched_at: Option<DateTime<Utc>>,
    pub published_at: Option<NaiveDate>,
}

/// An article that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub source_uri: String,
    pub title: String,
    pub body: String,
    pub origin_uri: String,
    pub fetched_at: Option<DateTime<Utc>>,
    pub published_at: Option<NaiveDate>,
}

impl NewItem {
    pub fn new(source_uri: impl Into<String>, origin_uri: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            title: String::new(),
            body: String::new(),
            origin_uri: origin_uri.into(),
            fetched_at: Some(Utc::now()),
            published_at: None,
        }
    }
}

impl Item {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Host of the origin without a leading `www.`.
    pub fn site_name(&self) -> String {
        site_name(&self.origin_uri)
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

pub fn site_name(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .unwrap_or_else(|| "(unknown website)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(origin: &str) -> Item {
        Item {
            id: 1,
            source_uri: "https://example.com/a".into(),
            title: String::new(),
            body: "  ".into(),
            origin_uri: origin.into(),
            fetched_at: None,
            published_at: None,
        }
    }

    #[test]
    fn test_site_name_strips_www() {
        assert_eq!(item("https://www.example.com/feed.xml").site_name(), "example.com");
    }

    #[test]
    fn test_site_name_keeps_subdomain() {
        assert_eq!(item("https://blog.example.com/rss").site_name(), "blog.example.com");
    }

    #[test]
    fn test_site_name_unknown() {
        assert_eq!(item("not a url").site_name(), "(unknown website)");
    }

    #[test]
    fn test_display_title_without_title() {
        assert_eq!(item("https://example.com").display_title(), "(Untitled)");
    }

    #[test]
    fn test_blank_body() {
        assert!(!item("https://example.com").has_body());
    }
}
