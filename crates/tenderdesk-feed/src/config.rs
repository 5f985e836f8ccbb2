//! Feed tuning knobs.

use std::time::Duration;

use tenderdesk_backend::PortalConfig;

use crate::debounce::ChangeKind;

/// Configuration for one [`TenderFeed`](crate::TenderFeed).
///
/// The debounce quanta differ by trigger: free-text search waits longer
/// than structural filter/page changes. Both are product-tuned values,
/// kept configurable rather than hardcoded.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Rows per page passed to the backend.
    pub page_size: u32,
    /// Time-to-live for cached result pages.
    pub results_ttl: Duration,
    /// Time-to-live for cached filter-option lists.
    pub options_ttl: Duration,
    /// Debounce quantum for free-text search changes.
    pub search_debounce: Duration,
    /// Debounce quantum for structural filter/page changes.
    pub filter_debounce: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            results_ttl: Duration::from_secs(600),
            options_ttl: Duration::from_secs(1800),
            search_debounce: Duration::from_millis(300),
            filter_debounce: Duration::from_millis(100),
        }
    }
}

impl FeedConfig {
    /// Creates a config with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the result-page TTL.
    #[must_use]
    pub fn with_results_ttl(mut self, ttl: Duration) -> Self {
        self.results_ttl = ttl;
        self
    }

    /// Sets the filter-options TTL.
    #[must_use]
    pub fn with_options_ttl(mut self, ttl: Duration) -> Self {
        self.options_ttl = ttl;
        self
    }

    /// Sets both debounce quanta.
    #[must_use]
    pub fn with_debounce(mut self, search: Duration, filter: Duration) -> Self {
        self.search_debounce = search;
        self.filter_debounce = filter;
        self
    }

    /// Quantum to wait for a given change kind.
    #[must_use]
    pub fn quantum(&self, change: ChangeKind) -> Duration {
        match change {
            ChangeKind::Search => self.search_debounce,
            ChangeKind::Structural => self.filter_debounce,
            ChangeKind::Immediate => Duration::ZERO,
        }
    }
}

impl From<&PortalConfig> for FeedConfig {
    fn from(config: &PortalConfig) -> Self {
        Self {
            page_size: config.page_size,
            results_ttl: config.results_ttl(),
            options_ttl: config.options_ttl(),
            search_debounce: config.search_debounce(),
            filter_debounce: config.filter_debounce(),
        }
    }
}
