//! Request and result types for the backend seam.
//!
//! [`TenderQuery`] is the immutable query descriptor the whole fetch
//! pipeline is keyed on: a new descriptor is built on every filter or
//! page change, never mutated in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tenderdesk_core::{BidStatus, DateRange, TenderRecord, UserId};

/// Descriptor of one paginated, filtered tender listing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderQuery {
    /// 1-based page number.
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ministry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Free-text search over bid number and category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Bid start-date window.
    #[serde(default)]
    pub dates: DateRange,
    /// Restrict results to the user's saved keywords.
    #[serde(default)]
    pub use_keywords: bool,
    /// The acting user. Part of the descriptor so per-user result sets
    /// never collide in the cache.
    pub user: UserId,
}

impl TenderQuery {
    /// Creates a descriptor for page 1 with no filters.
    #[must_use]
    pub fn new(user: UserId) -> Self {
        Self {
            page: 1,
            ministry: None,
            department: None,
            city: None,
            search: None,
            dates: DateRange::default(),
            use_keywords: false,
            user,
        }
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the ministry filter.
    #[must_use]
    pub fn with_ministry(mut self, ministry: impl Into<String>) -> Self {
        self.ministry = Some(ministry.into());
        self
    }

    /// Sets the department filter.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the city filter.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the free-text search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the date window.
    #[must_use]
    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    /// Enables saved-keyword filtering.
    #[must_use]
    pub fn with_keywords(mut self, use_keywords: bool) -> Self {
        self.use_keywords = use_keywords;
        self
    }

    /// Returns true when no filter beyond the page is set.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.ministry.is_none()
            && self.department.is_none()
            && self.city.is_none()
            && self.search.is_none()
            && self.dates.is_unbounded()
            && !self.use_keywords
    }

    /// Rejects descriptors the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), tenderdesk_core::CoreError> {
        if self.page == 0 {
            return Err(tenderdesk_core::CoreError::invalid_query(
                "page numbers are 1-based",
            ));
        }
        Ok(())
    }
}

/// One page of tender results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderPage {
    /// The matching tenders, in backend order.
    pub rows: Vec<TenderRecord>,
    /// Total matching count across all pages.
    pub total_count: u64,
}

impl TenderPage {
    /// Creates an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a page with rows and a total.
    #[must_use]
    pub fn new(rows: Vec<TenderRecord>, total_count: u64) -> Self {
        Self { rows, total_count }
    }

    /// Number of pages at the given page size.
    #[must_use]
    pub fn page_count(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size)) as u32
    }

    /// Returns the number of rows on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this page has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column whose distinct values populate a filter dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistinctColumn {
    Ministry,
    Department,
    City,
}

impl DistinctColumn {
    /// Column name as the backend knows it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ministry => "ministry",
            Self::Department => "department",
            Self::City => "city",
        }
    }
}

impl std::fmt::Display for DistinctColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistinctColumn {
    type Err = tenderdesk_core::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ministry" => Ok(Self::Ministry),
            "department" => Ok(Self::Department),
            "city" => Ok(Self::City),
            other => Err(tenderdesk_core::CoreError::invalid_query(format!(
                "unknown filter column '{other}'"
            ))),
        }
    }
}

/// Filter for the admin bid review listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BidStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tender_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder: Option<UserId>,
}

impl BidQuery {
    /// Creates an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a bid status.
    #[must_use]
    pub fn with_status(mut self, status: BidStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one tender.
    #[must_use]
    pub fn with_tender(mut self, tender_id: Uuid) -> Self {
        self.tender_id = Some(tender_id);
        self
    }

    /// Restricts to one bidder.
    #[must_use]
    pub fn with_bidder(mut self, bidder: UserId) -> Self {
        self.bidder = Some(bidder);
        self
    }

    /// Returns true when the filter matches the bid.
    #[must_use]
    pub fn matches(&self, bid: &tenderdesk_core::Bid) -> bool {
        if let Some(status) = self.status
            && bid.status != status
        {
            return false;
        }
        if let Some(tender_id) = self.tender_id
            && bid.tender_id != tender_id
        {
            return false;
        }
        if let Some(bidder) = self.bidder
            && bid.bidder != bidder
        {
            return false;
        }
        true
    }
}
