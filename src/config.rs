//! Configuration types for quake-feed

use crate::error::{Error, Result};
use crate::format::MagnitudePalette;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// USGS query for the ten most recent events of magnitude 5 or greater
pub const DEFAULT_FEED_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&orderby=time&minmag=5&limit=10";

/// Feed source and HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Absolute http(s) URL of the GeoJSON feed
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Whole-request timeout applied by the HTTP client (default: 15 seconds)
    ///
    /// This is a transport property; the loader itself never times out a session.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with feed requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Presentation collaborators supplied by the consumer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Localized offset text used when a location has no " of " separator
    #[serde(default = "default_near_the")]
    pub near_the: String,

    /// Color for each magnitude bucket (empty by default)
    #[serde(default)]
    pub palette: MagnitudePalette,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            near_the: default_near_the(),
            palette: MagnitudePalette::default(),
        }
    }
}

/// Main configuration for quake-feed
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed source settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load and validate a configuration from a JSON file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid JSON, or fails
    /// [`Config::validate`]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot express
    ///
    /// # Errors
    /// Returns `Error::Config` naming the offending key
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.feed.url).map_err(|e| Error::Config {
            message: format!("invalid feed URL '{}': {}", self.feed.url, e),
            key: Some("feed.url".to_string()),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("feed URL must use http or https, got '{}'", parsed.scheme()),
                key: Some("feed.url".to_string()),
            });
        }

        if self.feed.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".to_string(),
                key: Some("feed.request_timeout".to_string()),
            });
        }

        Ok(())
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_user_agent() -> String {
    concat!("quake-feed/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_near_the() -> String {
    "Near the".to_string()
}

// Durations are stored as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
