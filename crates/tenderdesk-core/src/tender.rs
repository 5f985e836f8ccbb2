//! Tender listing types.
//!
//! A [`TenderRecord`] is a read-only projection of backend state: the
//! cache layer never mutates one, it only replaces whole pages on
//! refresh.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One tender as listed on the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderRecord {
    /// Backend row id.
    pub id: Uuid,
    /// Human-facing bid number (e.g. "GEM/2026/B/1234567").
    pub bid_number: String,
    /// Item/service category.
    pub category: String,
    pub ministry: String,
    pub department: String,
    /// City the tender is fulfilled in, when the listing carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Quantity requested, when the listing carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    /// When bidding opened.
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    /// When bidding closes.
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    /// URL of the downloadable tender document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// URL of the bid participation page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_url: Option<String>,
}

impl TenderRecord {
    /// Returns true while the tender is open for bids at `now`.
    #[must_use]
    pub fn is_open(&self, now: OffsetDateTime) -> bool {
        self.start_date <= now && now < self.end_date
    }
}

/// Inclusive date range filter for tender queries.
///
/// Either bound may be absent; an absent bound is unconstrained on that
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub to: Option<OffsetDateTime>,
}

impl DateRange {
    /// Creates an unconstrained range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn from(mut self, from: OffsetDateTime) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn to(mut self, to: OffsetDateTime) -> Self {
        self.to = Some(to);
        self
    }

    /// Returns true when neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true when `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: OffsetDateTime) -> bool {
        if let Some(from) = self.from
            && date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && date > to
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_rfc3339;

    fn sample_tender() -> TenderRecord {
        TenderRecord {
            id: Uuid::new_v4(),
            bid_number: "GEM/2026/B/1234567".to_string(),
            category: "Desktop Computers".to_string(),
            ministry: "Ministry of Defence".to_string(),
            department: "Department of Defence Production".to_string(),
            city: Some("Pune".to_string()),
            quantity: Some(120),
            start_date: parse_rfc3339("2026-03-01T00:00:00Z").unwrap(),
            end_date: parse_rfc3339("2026-03-20T18:00:00Z").unwrap(),
            download_url: None,
            bid_url: None,
        }
    }

    #[test]
    fn test_tender_serialization_roundtrip() {
        let tender = sample_tender();
        let json = serde_json::to_string(&tender).expect("serialization failed");
        let back: TenderRecord = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(tender, back);
    }

    #[test]
    fn test_is_open() {
        let tender = sample_tender();
        assert!(tender.is_open(parse_rfc3339("2026-03-10T12:00:00Z").unwrap()));
        assert!(!tender.is_open(parse_rfc3339("2026-02-28T12:00:00Z").unwrap()));
        assert!(!tender.is_open(parse_rfc3339("2026-03-21T12:00:00Z").unwrap()));
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new()
            .from(parse_rfc3339("2026-03-01T00:00:00Z").unwrap())
            .to(parse_rfc3339("2026-03-31T00:00:00Z").unwrap());

        assert!(range.contains(parse_rfc3339("2026-03-15T00:00:00Z").unwrap()));
        assert!(!range.contains(parse_rfc3339("2026-04-01T00:00:00Z").unwrap()));
        assert!(!range.contains(parse_rfc3339("2026-02-01T00:00:00Z").unwrap()));
    }

    #[test]
    fn test_date_range_half_open() {
        let range = DateRange::new().from(parse_rfc3339("2026-03-01T00:00:00Z").unwrap());
        assert!(!range.is_unbounded());
        assert!(range.contains(parse_rfc3339("2030-01-01T00:00:00Z").unwrap()));

        assert!(DateRange::new().is_unbounded());
    }
}
