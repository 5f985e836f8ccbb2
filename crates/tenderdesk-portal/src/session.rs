//! The portal session.
//!
//! A [`PortalSession`] owns the backend handle, the tender feed and the
//! signed-in identity. Identity changes flush every cache the feed
//! holds, so one user's pages can never leak into another's view.
//! Mutations (bids, documents, keywords) are fire-and-forget from the
//! cache's perspective: callers invalidate by calling
//! [`TenderFeed::refetch`] afterwards, which the keyword setter does on
//! their behalf because saved keywords change what the listing returns.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use uuid::Uuid;

use tenderdesk_backend::{BidQuery, DynPortalBackend, TenderQuery};
use tenderdesk_core::{Bid, DocumentKind, IdentityDocument, UserId, UserProfile};
use tenderdesk_feed::{FeedConfig, TenderFeed};

use crate::error::{PortalError, Result};

/// One signed-in (or anonymous) portal session.
pub struct PortalSession {
    backend: DynPortalBackend,
    feed: TenderFeed,
    identity: ArcSwapOption<UserProfile>,
}

impl PortalSession {
    /// Creates a session over the given backend.
    #[must_use]
    pub fn new(backend: DynPortalBackend, config: FeedConfig) -> Self {
        let feed = TenderFeed::new(Arc::clone(&backend), config);
        Self {
            backend,
            feed,
            identity: ArcSwapOption::empty(),
        }
    }

    /// The tender feed owned by this session.
    #[must_use]
    pub fn feed(&self) -> &TenderFeed {
        &self.feed
    }

    /// The signed-in profile, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<Arc<UserProfile>> {
        self.identity.load_full()
    }

    // ==================== Identity ====================

    /// Signs a user in. Flushes the feed so nothing cached under the
    /// previous identity survives.
    pub async fn sign_in(&self, user: UserId) -> Result<UserProfile> {
        let profile = self.backend.profile(user).await?;
        self.feed.flush();
        self.identity.store(Some(Arc::new(profile.clone())));
        tracing::info!(user = %user, role = %profile.role, "Signed in");
        Ok(profile)
    }

    /// Signs the current user out and flushes the feed.
    pub fn sign_out(&self) {
        if let Some(profile) = self.identity.swap(None) {
            tracing::info!(user = %profile.id, "Signed out");
        }
        self.feed.flush();
    }

    /// A fresh unfiltered page-1 descriptor for the signed-in user.
    pub fn tender_query(&self) -> Result<TenderQuery> {
        let user = self.require_user()?;
        Ok(TenderQuery::new(user.id))
    }

    // ==================== Bids ====================

    /// Places a bid against a tender for the signed-in user.
    pub async fn place_bid(
        &self,
        tender_id: Uuid,
        amount: u64,
        note: Option<String>,
    ) -> Result<Bid> {
        let user = self.require_user()?;
        let mut bid = Bid::new(tender_id, user.id, amount);
        if let Some(note) = note {
            bid = bid.with_note(note);
        }
        tracing::debug!(tender = %tender_id, amount, "Placing bid");
        Ok(self.backend.place_bid(&bid).await?)
    }

    /// Revises the amount/note of one of the user's bids.
    pub async fn update_bid(&self, id: Uuid, amount: u64, note: Option<&str>) -> Result<Bid> {
        self.require_user()?;
        Ok(self.backend.update_bid(id, amount, note).await?)
    }

    /// The signed-in user's bids, newest first.
    pub async fn my_bids(&self) -> Result<Vec<Bid>> {
        let user = self.require_user()?;
        Ok(self
            .backend
            .list_bids(&BidQuery::new().with_bidder(user.id))
            .await?)
    }

    // ==================== Saved keywords ====================

    /// The signed-in user's saved search keywords.
    pub async fn keywords(&self) -> Result<Vec<String>> {
        let user = self.require_user()?;
        Ok(self.backend.user_keywords(user.id).await?)
    }

    /// Replaces the saved keywords, then refetches: keyword changes
    /// alter what keyword-filtered listings return, so every cached
    /// page is suspect.
    pub async fn set_keywords(&self, keywords: Vec<String>) -> Result<()> {
        let user = self.require_user()?;
        self.backend.update_keywords(user.id, &keywords).await?;
        self.feed.refetch().await?;
        Ok(())
    }

    // ==================== Identity documents ====================

    /// Uploads an identity document for the signed-in user.
    pub async fn upload_document(
        &self,
        kind: DocumentKind,
        bytes: Vec<u8>,
    ) -> Result<IdentityDocument> {
        let user = self.require_user()?;
        Ok(self.backend.upload_document(user.id, kind, bytes).await?)
    }

    /// The signed-in user's documents, newest first.
    pub async fn my_documents(&self) -> Result<Vec<IdentityDocument>> {
        let user = self.require_user()?;
        Ok(self.backend.list_documents(Some(user.id)).await?)
    }

    /// Removes one of the user's documents.
    pub async fn remove_document(&self, id: Uuid) -> Result<()> {
        self.require_user()?;
        Ok(self.backend.delete_document(id).await?)
    }

    // ==================== Guards ====================

    pub(crate) fn require_user(&self) -> Result<Arc<UserProfile>> {
        self.identity.load_full().ok_or(PortalError::NotSignedIn)
    }

    pub(crate) fn require_admin(&self, action: &str) -> Result<Arc<UserProfile>> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(PortalError::forbidden(action));
        }
        Ok(user)
    }

    pub(crate) fn backend(&self) -> &DynPortalBackend {
        &self.backend
    }
}
