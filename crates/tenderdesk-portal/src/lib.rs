//! Session layer for the TenderDesk portal client.
//!
//! [`PortalSession`] composes the backend handle with the tender feed
//! and the signed-in identity: browsing goes through the feed's cached
//! pipeline, mutations go straight to the backend, and identity changes
//! flush everything cached. Admin review operations live in
//! [`admin`].

pub mod admin;
pub mod error;
pub mod session;

pub use admin::{BidReview, BidReviewPage, BidSort, SortDirection};
pub use error::{PortalError, Result};
pub use session::PortalSession;
