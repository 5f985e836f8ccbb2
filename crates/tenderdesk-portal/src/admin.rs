//! Admin console operations.
//!
//! The review table fetches the full matching bid set once and then
//! sorts, filters and paginates client-side, the way the admin page
//! renders it. Every operation here requires the Admin role.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tenderdesk_backend::BidQuery;
use tenderdesk_core::{Bid, BidDecision, IdentityDocument, UserProfile, VerificationStatus};

use crate::error::Result;
use crate::session::PortalSession;

/// Field the review table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidSort {
    Amount,
    #[default]
    SubmittedAt,
    Status,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Parameters of one admin review-table render.
#[derive(Debug, Clone, Default)]
pub struct BidReview {
    /// Backend-side filter.
    pub filter: BidQuery,
    pub sort: BidSort,
    pub direction: SortDirection,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl BidReview {
    /// Creates a review over everything, newest first, one page of 20.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: BidQuery::new(),
            sort: BidSort::SubmittedAt,
            direction: SortDirection::Desc,
            page: 1,
            page_size: 20,
        }
    }

    /// Sets the backend-side filter.
    #[must_use]
    pub fn with_filter(mut self, filter: BidQuery) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the sort field and direction.
    #[must_use]
    pub fn with_sort(mut self, sort: BidSort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Sets the page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// One rendered page of the review table.
#[derive(Debug, Clone)]
pub struct BidReviewPage {
    pub bids: Vec<Bid>,
    /// Total bids matching the filter, across all pages.
    pub total: u64,
    pub page_count: u32,
}

fn sort_bids(bids: &mut [Bid], sort: BidSort, direction: SortDirection) {
    bids.sort_by(|a, b| {
        let ordering = match sort {
            BidSort::Amount => a.amount.cmp(&b.amount),
            BidSort::SubmittedAt => a.submitted_at.cmp(&b.submitted_at),
            BidSort::Status => a.status.cmp(&b.status),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn paginate(bids: Vec<Bid>, page: u32, page_size: u32) -> BidReviewPage {
    let total = bids.len() as u64;
    let page_count = total.div_ceil(u64::from(page_size.max(1))) as u32;
    let start = (page.max(1) as usize - 1) * page_size as usize;
    let bids = bids
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    BidReviewPage {
        bids,
        total,
        page_count,
    }
}

impl PortalSession {
    /// Renders one page of the admin bid review table.
    pub async fn review_bids(&self, review: &BidReview) -> Result<BidReviewPage> {
        self.require_admin("review bids")?;
        let mut bids = self.backend().list_bids(&review.filter).await?;
        sort_bids(&mut bids, review.sort, review.direction);
        Ok(paginate(bids, review.page, review.page_size))
    }

    /// Settles a bid under review.
    pub async fn decide_bid(&self, id: Uuid, decision: BidDecision) -> Result<Bid> {
        let admin = self.require_admin("decide bids")?;
        tracing::info!(bid = %id, admin = %admin.id, ?decision, "Deciding bid");
        Ok(self.backend().decide_bid(id, decision).await?)
    }

    /// Sets the verification status of an uploaded document.
    pub async fn verify_document(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<IdentityDocument> {
        self.require_admin("verify documents")?;
        Ok(self.backend().verify_document(id, status).await?)
    }

    /// Documents still awaiting verification, across all users.
    pub async fn pending_documents(&self) -> Result<Vec<IdentityDocument>> {
        self.require_admin("list pending documents")?;
        let documents = self.backend().list_documents(None).await?;
        Ok(documents
            .into_iter()
            .filter(|d| d.status == VerificationStatus::Pending)
            .collect())
    }

    /// All user profiles.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        self.require_admin("list users")?;
        Ok(self.backend().list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderdesk_core::UserId;

    fn bid(amount: u64) -> Bid {
        Bid::new(Uuid::new_v4(), UserId::generate(), amount)
    }

    #[test]
    fn test_sort_by_amount() {
        let mut bids = vec![bid(300), bid(100), bid(200)];
        sort_bids(&mut bids, BidSort::Amount, SortDirection::Asc);
        let amounts: Vec<u64> = bids.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![100, 200, 300]);

        sort_bids(&mut bids, BidSort::Amount, SortDirection::Desc);
        let amounts: Vec<u64> = bids.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![300, 200, 100]);
    }

    #[test]
    fn test_paginate() {
        let bids: Vec<Bid> = (0..5).map(|i| bid(i * 100)).collect();
        let page = paginate(bids.clone(), 2, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.bids.len(), 2);

        let last = paginate(bids, 3, 2);
        assert_eq!(last.bids.len(), 1);
    }

    #[test]
    fn test_paginate_past_the_end_is_empty() {
        let bids: Vec<Bid> = (0..3).map(|i| bid(i)).collect();
        let page = paginate(bids, 9, 2);
        assert_eq!(page.total, 3);
        assert!(page.bids.is_empty());
    }

    #[test]
    fn test_review_builder_clamps() {
        let review = BidReview::new().with_page(0).with_page_size(0);
        assert_eq!(review.page, 1);
        assert_eq!(review.page_size, 1);
    }
}
