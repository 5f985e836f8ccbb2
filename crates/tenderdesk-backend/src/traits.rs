//! The portal backend trait.
//!
//! This is the contract every backend implementation must satisfy. The
//! hosted service is consumed as a black box: each method maps to one
//! remote operation (an RPC function, a table endpoint, or a storage
//! call). Implementations must be thread-safe (`Send + Sync`).

use async_trait::async_trait;
use uuid::Uuid;

use tenderdesk_core::{
    Bid, BidDecision, DocumentKind, IdentityDocument, UserId, UserProfile, VerificationStatus,
};

use crate::error::BackendError;
use crate::types::{BidQuery, DistinctColumn, TenderPage, TenderQuery};

/// Remote operations consumed by the portal client.
///
/// # Example
///
/// ```ignore
/// use tenderdesk_backend::{PortalBackend, TenderQuery};
///
/// async fn first_page(
///     backend: &dyn PortalBackend,
///     query: &TenderQuery,
/// ) -> Result<u64, BackendError> {
///     let page = backend.filtered_tenders(query, 10).await?;
///     Ok(page.total_count)
/// }
/// ```
#[async_trait]
pub trait PortalBackend: Send + Sync {
    // ==================== Tender listing ====================

    /// Fetches one page of tenders matching the descriptor.
    ///
    /// Maps to the hosted `get_filtered_tenders` RPC; the total match
    /// count the backend embeds per row is lifted into
    /// [`TenderPage::total_count`].
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Invalid` for a descriptor the backend
    /// would reject, any other variant for remote failures.
    async fn filtered_tenders(
        &self,
        query: &TenderQuery,
        page_size: u32,
    ) -> Result<TenderPage, BackendError>;

    /// Lists the distinct values of a filter column.
    async fn distinct_values(&self, column: DistinctColumn) -> Result<Vec<String>, BackendError>;

    // ==================== Saved keywords ====================

    /// Returns the user's saved search keywords.
    async fn user_keywords(&self, user: UserId) -> Result<Vec<String>, BackendError>;

    /// Replaces the user's saved search keywords.
    async fn update_keywords(&self, user: UserId, keywords: &[String])
    -> Result<(), BackendError>;

    // ==================== Bids ====================

    /// Places a new bid. Returns the stored row.
    async fn place_bid(&self, bid: &Bid) -> Result<Bid, BackendError>;

    /// Updates the amount and note of an existing bid.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the bid does not exist.
    async fn update_bid(
        &self,
        id: Uuid,
        amount: u64,
        note: Option<&str>,
    ) -> Result<Bid, BackendError>;

    /// Lists bids matching the filter (admin review).
    async fn list_bids(&self, filter: &BidQuery) -> Result<Vec<Bid>, BackendError>;

    /// Settles a bid under review (admin).
    async fn decide_bid(&self, id: Uuid, decision: BidDecision) -> Result<Bid, BackendError>;

    // ==================== Identity documents ====================

    /// Uploads document bytes to the storage bucket and records the
    /// metadata row. Returns the stored record, verification pending.
    async fn upload_document(
        &self,
        owner: UserId,
        kind: DocumentKind,
        bytes: Vec<u8>,
    ) -> Result<IdentityDocument, BackendError>;

    /// Removes a document record and its stored object.
    async fn delete_document(&self, id: Uuid) -> Result<(), BackendError>;

    /// Sets the verification status of a document (admin).
    async fn verify_document(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<IdentityDocument, BackendError>;

    /// Lists documents, optionally restricted to one owner.
    async fn list_documents(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<IdentityDocument>, BackendError>;

    // ==================== Users ====================

    /// Fetches the profile of a user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for an unknown user.
    async fn profile(&self, user: UserId) -> Result<UserProfile, BackendError>;

    /// Lists all user profiles (admin).
    async fn list_users(&self) -> Result<Vec<UserProfile>, BackendError>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shareable backend instance.
pub type DynPortalBackend = std::sync::Arc<dyn PortalBackend>;

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that PortalBackend is object-safe
    fn _assert_backend_object_safe(_: &dyn PortalBackend) {}
}
