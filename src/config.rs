//! Configuration for the TMDB data layer
//!
//! All knobs live in an explicit `Config` struct handed to the client at
//! construction time; nothing reads global state behind the caller's back.
//! `Config::from_env` is a convenience for binaries that want environment
//! overrides.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default TMDB API base URL
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default TMDB image CDN base URL
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default language for localized fields
const DEFAULT_LANGUAGE: &str = "es-MX";

/// Default region for release-date and provider filtering
const DEFAULT_REGION: &str = "MX";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when building configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key environment variable is missing or empty
    #[error("TMDB_API_KEY is not set")]
    MissingApiKey,
}

/// Settings for the in-memory response cache
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Whether responses are cached at all
    pub enabled: bool,
    /// Maximum number of cached responses
    pub capacity: usize,
    /// TTL applied when a request does not specify one
    pub default_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 100,
            default_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Configuration for [`TmdbClient`](crate::client::TmdbClient)
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent with every request. Never becomes part of a cache key.
    pub api_key: String,
    /// API base URL (overridable for testing)
    pub base_url: String,
    /// Image CDN base URL
    pub image_base_url: String,
    /// Default language for localized fields, e.g. `es-MX`
    pub language: String,
    /// Default region for release-date filtering, e.g. `MX`
    pub region: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry budget advertised to callers. The client itself never retries a
    /// request; callers that want a retry loop own it.
    pub max_retries: u32,
    /// Response cache settings
    pub cache: CacheSettings,
}

impl Config {
    /// Creates a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: 3,
            cache: CacheSettings::default(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the image CDN base URL.
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// Overrides the default language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Overrides the default region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the cache settings.
    pub fn with_cache(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }

    /// Builds a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TMDB_API_KEY` - API key (required)
    /// - `TMDB_BASE_URL` - API base URL
    /// - `TMDB_IMAGE_BASE_URL` - Image CDN base URL
    /// - `TMDB_LANGUAGE` - Default language (default: `es-MX`)
    /// - `TMDB_REGION` - Default region (default: `MX`)
    /// - `TMDB_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
    /// - `TMDB_CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `TMDB_CACHE_CAPACITY` - Maximum cached responses (default: 100)
    /// - `TMDB_CACHE_TTL_SECS` - Default cache TTL in seconds (default: 300)
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Returns
    /// * `Ok(Config)` when `TMDB_API_KEY` is present and non-empty
    /// * `Err(ConfigError::MissingApiKey)` otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Config::new(api_key);

        if let Ok(base_url) = env::var("TMDB_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(image_base_url) = env::var("TMDB_IMAGE_BASE_URL") {
            config.image_base_url = image_base_url;
        }
        if let Ok(language) = env::var("TMDB_LANGUAGE") {
            config.language = language;
        }
        if let Ok(region) = env::var("TMDB_REGION") {
            config.region = region;
        }

        config.timeout = env::var("TMDB_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        config.cache.enabled = env::var("TMDB_CACHE_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);
        config.cache.capacity = env::var("TMDB_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.cache.capacity);
        config.cache.default_ttl = env::var("TMDB_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.cache.default_ttl);

        Ok(config)
    }
}
