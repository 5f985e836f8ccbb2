pub mod bid;
pub mod document;
pub mod error;
pub mod identity;
pub mod tender;
pub mod time;

pub use bid::{Bid, BidDecision, BidStatus};
pub use document::{DocumentKind, IdentityDocument, VerificationStatus};
pub use error::{CoreError, ErrorCategory, Result};
pub use identity::{UserId, UserProfile, UserRole};
pub use tender::{DateRange, TenderRecord};
pub use time::{now_utc, parse_rfc3339};
