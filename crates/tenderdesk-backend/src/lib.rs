//! Backend seam for the TenderDesk portal client.
//!
//! Everything the portal consumes from the hosted backend-as-a-service
//! (RPC functions over the Postgres tables, the storage bucket, the user
//! table) is named by the [`PortalBackend`] trait. Two implementations
//! ship with the crate:
//!
//! - [`HttpBackend`] - talks to the hosted REST/RPC endpoints with
//!   reqwest. This is what production wiring uses.
//! - [`MemoryBackend`] - an in-process implementation over plain maps,
//!   with a fetch-call counter, used by the feed and portal tests.
//!
//! # Example
//!
//! ```ignore
//! use tenderdesk_backend::{MemoryBackend, PortalBackend, TenderQuery};
//!
//! let backend = MemoryBackend::new();
//! let query = TenderQuery::new(user).with_ministry("Ministry of Defence");
//! let page = backend.filtered_tenders(&query, 10).await?;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;
pub mod types;

pub use config::PortalConfig;
pub use error::{BackendError, ErrorCategory};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use traits::{DynPortalBackend, PortalBackend};
pub use types::{BidQuery, DistinctColumn, TenderPage, TenderQuery};
