//! Cached, coalesced, debounced tender listing pipeline.
//!
//! This crate is the read path of the TenderDesk client. Fetching a
//! page of filtered tenders goes through:
//!
//! - [`Fingerprint`] - deterministic string key from a query descriptor
//!   and the acting identity;
//! - [`TtlCache`] - fingerprint-keyed store with a fixed time-to-live
//!   (separate instances for result pages and filter-option lists);
//! - [`InflightRegistry`] - coalesces duplicate concurrent fetches into
//!   one backend call whose outcome every caller observes;
//! - [`Debouncer`] - lets only the last invocation of a rapid burst
//!   reach the backend;
//! - [`TenderFeed`] - the orchestrator tying the above together, with a
//!   `watch`-based consumer surface and an explicit cache-flushing
//!   [`refetch`](TenderFeed::refetch).

pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod fingerprint;
pub mod inflight;

pub use cache::{CacheStatsSnapshot, TtlCache};
pub use config::FeedConfig;
pub use debounce::{ChangeKind, Debouncer};
pub use error::FeedError;
pub use feed::{FeedState, TenderFeed};
pub use fingerprint::Fingerprint;
pub use inflight::{FetchRole, InflightGuard, InflightRegistry};
