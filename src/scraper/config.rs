use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for article extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Page download timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Extracted bodies shorter than this count as a failed extraction (default: 0)
    pub min_body_length: usize,

    /// Line width used when converting HTML to text (default: 80)
    pub wrap_width: usize,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            min_body_length: 0,
            wrap_width: 80,
            user_agent: Some(
                "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    /// Get the page download timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.min_body_length, 0);
        assert_eq!(config.wrap_width, 80);
        assert!(config.user_agent.is_some());
    }

    #[test]
    fn test_timeout_duration() {
        let config = ScraperConfig {
            timeout_secs: 5,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
