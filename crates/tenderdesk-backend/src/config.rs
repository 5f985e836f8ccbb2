//! Portal client configuration.
//!
//! Values come from an optional TOML file overlaid with `TENDERDESK_*`
//! environment variables; everything has a code default so an empty
//! config still yields a working client pointed at a base URL.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tenderdesk_core::{CoreError, Result};

/// Configuration for the portal client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the hosted backend (e.g. `https://xyz.backend.co`).
    #[serde(default)]
    pub base_url: String,

    /// Publishable API key sent with every request.
    #[serde(default)]
    pub anon_key: String,

    /// Storage bucket holding identity documents.
    #[serde(default = "default_documents_bucket")]
    pub documents_bucket: String,

    /// Rows per tender listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Time-to-live for cached result pages, in seconds.
    #[serde(default = "default_results_ttl_secs")]
    pub results_ttl_secs: u64,

    /// Time-to-live for cached filter-option lists, in seconds.
    #[serde(default = "default_options_ttl_secs")]
    pub options_ttl_secs: u64,

    /// Debounce quantum for free-text search changes, in milliseconds.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Debounce quantum for structural filter/page changes, in
    /// milliseconds.
    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,

    /// HTTP request timeout, in seconds. Bounds how long a hung backend
    /// call can hold a loading state.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_documents_bucket() -> String {
    "documents".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_results_ttl_secs() -> u64 {
    600
}

fn default_options_ttl_secs() -> u64 {
    1800
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_filter_debounce_ms() -> u64 {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: String::new(),
            documents_bucket: default_documents_bucket(),
            page_size: default_page_size(),
            results_ttl_secs: default_results_ttl_secs(),
            options_ttl_secs: default_options_ttl_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            filter_debounce_ms: default_filter_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PortalConfig {
    /// Creates a config with defaults and the given backend endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from an optional TOML file overlaid with
    /// `TENDERDESK_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder =
            builder.add_source(config::Environment::with_prefix("TENDERDESK").try_parsing(true));

        let cfg: Self = builder
            .build()
            .map_err(|e| CoreError::configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configurations the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::configuration("base_url must be set"));
        }
        url::Url::parse(&self.base_url)?;
        if self.page_size == 0 {
            return Err(CoreError::configuration("page_size must be >= 1"));
        }
        if self.results_ttl_secs == 0 || self.options_ttl_secs == 0 {
            return Err(CoreError::configuration("cache TTLs must be non-zero"));
        }
        Ok(())
    }

    /// TTL for cached result pages.
    #[must_use]
    pub fn results_ttl(&self) -> Duration {
        Duration::from_secs(self.results_ttl_secs)
    }

    /// TTL for cached filter-option lists.
    #[must_use]
    pub fn options_ttl(&self) -> Duration {
        Duration::from_secs(self.options_ttl_secs)
    }

    /// Debounce quantum for free-text search changes.
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Debounce quantum for structural filter/page changes.
    #[must_use]
    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// HTTP request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
