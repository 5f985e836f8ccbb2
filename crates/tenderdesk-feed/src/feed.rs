//! The fetch orchestrator and its consumer surface.
//!
//! [`TenderFeed`] produces the current page of results for a query
//! descriptor while minimizing redundant backend calls:
//!
//! 1. fingerprint the descriptor;
//! 2. serve a fresh cache entry if one exists (no backend call, no
//!    loading transition);
//! 3. otherwise join a pending fetch for the same fingerprint, if any;
//! 4. otherwise issue the backend call as leader, cache the result and
//!    broadcast it to every follower.
//!
//! Rapid-fire changes are debounced before step 1, and a result is
//! applied to consumer state only while its fingerprint is still the
//! current one: a slow response for an abandoned query is cached for
//! reuse but never overwrites newer state.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::sync::watch;

use tenderdesk_backend::{DistinctColumn, DynPortalBackend, TenderPage, TenderQuery};
use tenderdesk_core::{TenderRecord, UserId};

use crate::cache::{CacheStatsSnapshot, TtlCache};
use crate::config::FeedConfig;
use crate::debounce::{ChangeKind, Debouncer};
use crate::error::FeedError;
use crate::fingerprint::Fingerprint;
use crate::inflight::{FetchRole, InflightRegistry};

/// Snapshot of what a UI consumer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Rows of the current page.
    pub rows: Vec<TenderRecord>,
    /// Total matching count across all pages.
    pub total_count: u64,
    /// Page count derived from the total and the page size.
    pub page_count: u32,
    /// True while a fetch for the current query is outstanding.
    pub loading: bool,
    /// Error message from the last failed fetch, absent when ok.
    pub error: Option<String>,
    /// Whether the acting user has saved keyword filters.
    pub has_keywords: bool,
}

/// Cached, coalesced, debounced tender listing feed.
///
/// All stores are owned by the feed instance and injected where needed;
/// nothing is process-global. Dropping the feed drops its caches.
pub struct TenderFeed {
    backend: DynPortalBackend,
    config: FeedConfig,
    pages: TtlCache<Arc<TenderPage>>,
    options: TtlCache<Arc<Vec<String>>>,
    page_inflight: Arc<InflightRegistry<Result<Arc<TenderPage>, FeedError>>>,
    options_inflight: Arc<InflightRegistry<Result<Arc<Vec<String>>, FeedError>>>,
    keyword_flags: DashMap<UserId, bool>,
    debouncer: Debouncer,
    /// The query the consumer is currently interested in.
    current: Mutex<Option<TenderQuery>>,
    state: watch::Sender<FeedState>,
}

impl TenderFeed {
    /// Creates a feed over the given backend.
    #[must_use]
    pub fn new(backend: DynPortalBackend, config: FeedConfig) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            backend,
            pages: TtlCache::new(config.results_ttl),
            options: TtlCache::new(config.options_ttl),
            page_inflight: Arc::new(InflightRegistry::new()),
            options_inflight: Arc::new(InflightRegistry::new()),
            keyword_flags: DashMap::new(),
            debouncer: Debouncer::new(),
            current: Mutex::new(None),
            state,
            config,
        }
    }

    /// Subscribes to consumer state updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Current consumer state snapshot.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// The feed configuration.
    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetches one page for the descriptor: cache, coalesce, or call.
    ///
    /// This is the raw pipeline without debounce or consumer-state
    /// transitions; [`apply`](Self::apply) wraps it for UI callers.
    pub async fn fetch_page(&self, query: &TenderQuery) -> Result<Arc<TenderPage>, FeedError> {
        let fp = Fingerprint::of(query);

        if let Some(page) = self.pages.get(&fp) {
            tracing::debug!(fingerprint = %fp, "Tender page served from cache");
            return Ok(page);
        }

        match InflightRegistry::attach_or_lead(&self.page_inflight, fp.clone()) {
            FetchRole::Follower(mut rx) => {
                tracing::debug!(fingerprint = %fp, "Joining in-flight tender fetch");
                match rx.recv().await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(FeedError::Abandoned),
                }
            }
            FetchRole::Leader(guard) => {
                let outcome = match self
                    .backend
                    .filtered_tenders(query, self.config.page_size)
                    .await
                {
                    Ok(page) => {
                        let page = Arc::new(page);
                        self.pages.put(fp.clone(), Arc::clone(&page));
                        Ok(page)
                    }
                    Err(err) => {
                        tracing::warn!(fingerprint = %fp, error = %err, "Tender fetch failed");
                        Err(FeedError::from(err))
                    }
                };
                guard.settle(outcome.clone());
                outcome
            }
        }
    }

    /// Runs a query change through debounce, fetch and state update.
    ///
    /// Superseded invocations return without fetching. Failures land in
    /// [`FeedState::error`]; the previously displayed rows are left in
    /// place (empty on a first-load failure).
    pub async fn apply(&self, query: TenderQuery, change: ChangeKind) {
        if !self.debouncer.settle(self.config.quantum(change)).await {
            tracing::trace!("Query change superseded within its debounce window");
            return;
        }

        let fp = Fingerprint::of(&query);
        {
            let mut current = self.current.lock().expect("current query lock poisoned");
            *current = Some(query.clone());
        }
        let has_keywords = self.has_saved_keywords(query.user).await.unwrap_or(false);

        if let Some(page) = self.pages.get(&fp) {
            // Fresh hit: the consumer never sees a loading transition.
            self.publish(&fp, Ok(page), has_keywords);
            return;
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.fetch_page(&query).await;
        self.publish(&fp, result, has_keywords);
    }

    /// Clears both caches and the keyword flags, then re-issues the
    /// current query. Used after a mutation that could invalidate
    /// previously cached pages.
    pub async fn refetch(&self) -> Result<(), FeedError> {
        tracing::info!("Explicit refetch: flushing caches");
        self.pages.clear();
        self.options.clear();
        self.keyword_flags.clear();

        let Some(query) = self
            .current
            .lock()
            .expect("current query lock poisoned")
            .clone()
        else {
            return Ok(());
        };

        let fp = Fingerprint::of(&query);
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let has_keywords = self.has_saved_keywords(query.user).await.unwrap_or(false);
        let result = self.fetch_page(&query).await;
        self.publish(&fp, result.clone(), has_keywords);
        result.map(|_| ())
    }

    /// Distinct values of a filter column, with their own TTL cache and
    /// coalescing.
    pub async fn filter_options(
        &self,
        column: DistinctColumn,
    ) -> Result<Arc<Vec<String>>, FeedError> {
        let fp = Fingerprint::options(column);

        if let Some(values) = self.options.get(&fp) {
            return Ok(values);
        }

        match InflightRegistry::attach_or_lead(&self.options_inflight, fp.clone()) {
            FetchRole::Follower(mut rx) => match rx.recv().await {
                Ok(outcome) => outcome,
                Err(_) => Err(FeedError::Abandoned),
            },
            FetchRole::Leader(guard) => {
                let outcome = match self.backend.distinct_values(column).await {
                    Ok(values) => {
                        let values = Arc::new(values);
                        self.options.put(fp, Arc::clone(&values));
                        Ok(values)
                    }
                    Err(err) => Err(FeedError::from(err)),
                };
                guard.settle(outcome.clone());
                outcome
            }
        }
    }

    /// Whether the user has saved keywords. Fetched once per identity
    /// and remembered until the next flush.
    pub async fn has_saved_keywords(&self, user: UserId) -> Result<bool, FeedError> {
        if let Some(flag) = self.keyword_flags.get(&user) {
            return Ok(*flag);
        }
        let keywords = self.backend.user_keywords(user).await?;
        let flag = !keywords.is_empty();
        self.keyword_flags.insert(user, flag);
        Ok(flag)
    }

    /// Drops everything the feed remembers: caches, keyword flags, the
    /// current query and the consumer state. Called on identity change.
    pub fn flush(&self) {
        tracing::info!("Flushing feed caches and state");
        self.pages.clear();
        self.options.clear();
        self.keyword_flags.clear();
        *self.current.lock().expect("current query lock poisoned") = None;
        self.state.send_modify(|s| *s = FeedState::default());
    }

    /// Statistics of the result-page cache.
    #[must_use]
    pub fn page_cache_stats(&self) -> CacheStatsSnapshot {
        self.pages.stats()
    }

    /// Statistics of the filter-options cache.
    #[must_use]
    pub fn options_cache_stats(&self) -> CacheStatsSnapshot {
        self.options.stats()
    }

    /// Applies a settled result to consumer state, unless the consumer
    /// has moved to a different query in the meantime.
    fn publish(
        &self,
        fp: &Fingerprint,
        result: Result<Arc<TenderPage>, FeedError>,
        has_keywords: bool,
    ) {
        {
            let current = self.current.lock().expect("current query lock poisoned");
            let still_current = current
                .as_ref()
                .is_some_and(|q| Fingerprint::of(q) == *fp);
            if !still_current {
                tracing::debug!(fingerprint = %fp, "Stale result discarded");
                return;
            }
        }

        self.state.send_modify(|s| {
            s.has_keywords = has_keywords;
            match &result {
                Ok(page) => {
                    s.rows = page.rows.clone();
                    s.total_count = page.total_count;
                    s.page_count = page.page_count(self.config.page_size);
                    s.error = None;
                }
                Err(err) => {
                    s.error = Some(err.to_string());
                }
            }
            s.loading = false;
        });
    }
}
