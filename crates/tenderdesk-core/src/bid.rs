use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::identity::UserId;

/// Review state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::UnderReview => write!(f, "under_review"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A bid placed by a user against a tender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub bidder: UserId,
    /// Offered amount in INR.
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: BidStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Bid {
    /// Creates a freshly submitted bid.
    #[must_use]
    pub fn new(tender_id: Uuid, bidder: UserId, amount: u64) -> Self {
        let now = crate::time::now_utc();
        Self {
            id: Uuid::new_v4(),
            tender_id,
            bidder,
            amount,
            note: None,
            status: BidStatus::Submitted,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Attaches a free-text note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns true once an administrator has settled the bid.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        matches!(self.status, BidStatus::Accepted | BidStatus::Rejected)
    }
}

/// Admin decision on a reviewed bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidDecision {
    Accept,
    Reject,
}

impl BidDecision {
    /// Status the bid moves to under this decision.
    #[must_use]
    pub fn resulting_status(self) -> BidStatus {
        match self {
            Self::Accept => BidStatus::Accepted,
            Self::Reject => BidStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&BidStatus::UnderReview).unwrap(),
            "\"under_review\""
        );
        let status: BidStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, BidStatus::Accepted);
    }

    #[test]
    fn test_new_bid_is_submitted() {
        let bid = Bid::new(Uuid::new_v4(), UserId::generate(), 125_000).with_note("L1 quote");
        assert_eq!(bid.status, BidStatus::Submitted);
        assert!(!bid.is_decided());
        assert_eq!(bid.note.as_deref(), Some("L1 quote"));
    }

    #[test]
    fn test_decision_resulting_status() {
        assert_eq!(BidDecision::Accept.resulting_status(), BidStatus::Accepted);
        assert_eq!(BidDecision::Reject.resulting_status(), BidStatus::Rejected);
    }
}
