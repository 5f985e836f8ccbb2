//! In-memory implementation of [`PortalBackend`].
//!
//! Backs the feed and portal tests: filtering, pagination and the
//! mutation operations run against plain maps, and an atomic counter
//! records how many listing fetches actually reached the backend so
//! coalescing tests can assert "exactly one call".

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use tenderdesk_core::{
    Bid, BidDecision, DocumentKind, IdentityDocument, TenderRecord, UserId, UserProfile,
    VerificationStatus,
};

use crate::error::BackendError;
use crate::traits::PortalBackend;
use crate::types::{BidQuery, DistinctColumn, TenderPage, TenderQuery};

#[derive(Default)]
struct State {
    tenders: Vec<TenderRecord>,
    keywords: HashMap<UserId, Vec<String>>,
    bids: HashMap<Uuid, Bid>,
    documents: HashMap<Uuid, IdentityDocument>,
    objects: HashMap<String, Vec<u8>>,
    users: HashMap<UserId, UserProfile>,
}

/// In-process backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    fetch_calls: AtomicU64,
    failing: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the tender table.
    #[must_use]
    pub fn with_tenders(self, tenders: Vec<TenderRecord>) -> Self {
        self.state.lock().expect("state lock poisoned").tenders = tenders;
        self
    }

    /// Seeds one user row.
    #[must_use]
    pub fn with_user(self, profile: UserProfile) -> Self {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            state.users.insert(profile.id, profile);
        }
        self
    }

    /// Seeds saved keywords for a user.
    #[must_use]
    pub fn with_keywords(self, user: UserId, keywords: Vec<String>) -> Self {
        self.state
            .lock()
            .expect("state lock poisoned")
            .keywords
            .insert(user, keywords);
        self
    }

    /// Adds artificial latency to every listing fetch, so tests can
    /// overlap concurrent requests deterministically.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of listing fetches that reached this backend.
    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Makes subsequent listing fetches fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn matches(query: &TenderQuery, keywords: &[String], tender: &TenderRecord) -> bool {
        if let Some(ministry) = &query.ministry
            && !tender.ministry.eq_ignore_ascii_case(ministry)
        {
            return false;
        }
        if let Some(department) = &query.department
            && !tender.department.eq_ignore_ascii_case(department)
        {
            return false;
        }
        if let Some(city) = &query.city {
            match &tender.city {
                Some(c) if c.eq_ignore_ascii_case(city) => {}
                _ => return false,
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            let hit = tender.bid_number.to_lowercase().contains(&needle)
                || tender.category.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(from) = query.dates.from
            && tender.end_date < from
        {
            return false;
        }
        if let Some(to) = query.dates.to
            && tender.start_date > to
        {
            return false;
        }
        // Users with no saved keywords see the unfiltered listing even
        // with the flag on.
        if query.use_keywords && !keywords.is_empty() {
            let hit = keywords.iter().any(|kw| {
                let kw = kw.to_lowercase();
                tender.category.to_lowercase().contains(&kw)
                    || tender.bid_number.to_lowercase().contains(&kw)
            });
            if !hit {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl PortalBackend for MemoryBackend {
    async fn filtered_tenders(
        &self,
        query: &TenderQuery,
        page_size: u32,
    ) -> Result<TenderPage, BackendError> {
        query
            .validate()
            .map_err(|e| BackendError::invalid(e.to_string()))?;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::network("simulated network failure"));
        }
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().expect("state lock poisoned");
        let keywords = state.keywords.get(&query.user).cloned().unwrap_or_default();

        let mut matching: Vec<TenderRecord> = state
            .tenders
            .iter()
            .filter(|t| Self::matches(query, &keywords, t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.end_date
                .cmp(&b.end_date)
                .then_with(|| a.bid_number.cmp(&b.bid_number))
        });

        let total_count = matching.len() as u64;
        let start = (query.page as usize - 1) * page_size as usize;
        let rows = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(TenderPage::new(rows, total_count))
    }

    async fn distinct_values(&self, column: DistinctColumn) -> Result<Vec<String>, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        let mut values: Vec<String> = state
            .tenders
            .iter()
            .filter_map(|t| match column {
                DistinctColumn::Ministry => Some(t.ministry.clone()),
                DistinctColumn::Department => Some(t.department.clone()),
                DistinctColumn::City => t.city.clone(),
            })
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }

    async fn user_keywords(&self, user: UserId) -> Result<Vec<String>, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        Ok(state.keywords.get(&user).cloned().unwrap_or_default())
    }

    async fn update_keywords(
        &self,
        user: UserId,
        keywords: &[String],
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        state.keywords.insert(user, keywords.to_vec());
        Ok(())
    }

    async fn place_bid(&self, bid: &Bid) -> Result<Bid, BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        state.bids.insert(bid.id, bid.clone());
        Ok(bid.clone())
    }

    async fn update_bid(
        &self,
        id: Uuid,
        amount: u64,
        note: Option<&str>,
    ) -> Result<Bid, BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let bid = state
            .bids
            .get_mut(&id)
            .ok_or_else(|| BackendError::not_found(format!("bid {id}")))?;
        bid.amount = amount;
        bid.note = note.map(str::to_string);
        bid.updated_at = tenderdesk_core::now_utc();
        Ok(bid.clone())
    }

    async fn list_bids(&self, filter: &BidQuery) -> Result<Vec<Bid>, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        let mut bids: Vec<Bid> = state
            .bids
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(bids)
    }

    async fn decide_bid(&self, id: Uuid, decision: BidDecision) -> Result<Bid, BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let bid = state
            .bids
            .get_mut(&id)
            .ok_or_else(|| BackendError::not_found(format!("bid {id}")))?;
        bid.status = decision.resulting_status();
        bid.updated_at = tenderdesk_core::now_utc();
        Ok(bid.clone())
    }

    async fn upload_document(
        &self,
        owner: UserId,
        kind: DocumentKind,
        bytes: Vec<u8>,
    ) -> Result<IdentityDocument, BackendError> {
        if bytes.is_empty() {
            return Err(BackendError::invalid("document is empty"));
        }
        let document = IdentityDocument::new(owner, kind, format!("{owner}/{}", Uuid::new_v4()));
        let mut state = self.state.lock().expect("state lock poisoned");
        state.objects.insert(document.storage_path.clone(), bytes);
        state.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn delete_document(&self, id: Uuid) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let document = state
            .documents
            .remove(&id)
            .ok_or_else(|| BackendError::not_found(format!("document {id}")))?;
        state.objects.remove(&document.storage_path);
        Ok(())
    }

    async fn verify_document(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<IdentityDocument, BackendError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let document = state
            .documents
            .get_mut(&id)
            .ok_or_else(|| BackendError::not_found(format!("document {id}")))?;
        document.status = status;
        Ok(document.clone())
    }

    async fn list_documents(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<IdentityDocument>, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        let mut documents: Vec<IdentityDocument> = state
            .documents
            .values()
            .filter(|d| owner.is_none_or(|o| d.owner == o))
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(documents)
    }

    async fn profile(&self, user: UserId) -> Result<UserProfile, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        state
            .users
            .get(&user)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("user {user}")))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, BackendError> {
        let state = self.state.lock().expect("state lock poisoned");
        let mut users: Vec<UserProfile> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderdesk_core::time::parse_rfc3339;
    use tenderdesk_core::{DateRange, UserRole};

    fn tender(bid_number: &str, category: &str, ministry: &str, city: &str) -> TenderRecord {
        TenderRecord {
            id: Uuid::new_v4(),
            bid_number: bid_number.to_string(),
            category: category.to_string(),
            ministry: ministry.to_string(),
            department: format!("{ministry} Department"),
            city: Some(city.to_string()),
            quantity: None,
            start_date: parse_rfc3339("2026-03-01T00:00:00Z").unwrap(),
            end_date: parse_rfc3339("2026-03-20T00:00:00Z").unwrap(),
            download_url: None,
            bid_url: None,
        }
    }

    fn seeded() -> MemoryBackend {
        MemoryBackend::new().with_tenders(vec![
            tender("GEM/2026/B/1", "Desktop Computers", "Ministry of Defence", "Pune"),
            tender("GEM/2026/B/2", "Office Chairs", "Ministry of Railways", "Delhi"),
            tender("GEM/2026/B/3", "Laptop Computers", "Ministry of Defence", "Delhi"),
        ])
    }

    #[tokio::test]
    async fn test_filter_by_ministry() {
        let backend = seeded();
        let query = TenderQuery::new(UserId::generate()).with_ministry("Ministry of Defence");
        let page = backend.filtered_tenders(&query, 10).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert!(page.rows.iter().all(|t| t.ministry == "Ministry of Defence"));
    }

    #[tokio::test]
    async fn test_search_matches_category() {
        let backend = seeded();
        let query = TenderQuery::new(UserId::generate()).with_search("computers");
        let page = backend.filtered_tenders(&query, 10).await.unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_pagination_and_total() {
        let backend = seeded();
        let user = UserId::generate();
        let page = backend
            .filtered_tenders(&TenderQuery::new(user).with_page(2), 2)
            .await
            .unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page.page_count(2), 2);
    }

    #[tokio::test]
    async fn test_date_window_excludes() {
        let backend = seeded();
        let query = TenderQuery::new(UserId::generate()).with_dates(
            DateRange::new().from(parse_rfc3339("2026-04-01T00:00:00Z").unwrap()),
        );
        let page = backend.filtered_tenders(&query, 10).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_keyword_filter() {
        let user = UserId::generate();
        let backend = seeded().with_keywords(user, vec!["laptop".to_string()]);
        let query = TenderQuery::new(user).with_keywords(true);
        let page = backend.filtered_tenders(&query, 10).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].category, "Laptop Computers");
    }

    #[tokio::test]
    async fn test_keyword_flag_without_saved_keywords_is_noop() {
        let user = UserId::generate();
        let backend = seeded();
        let query = TenderQuery::new(user).with_keywords(true);
        let page = backend.filtered_tenders(&query, 10).await.unwrap();
        assert_eq!(page.total_count, 3);
    }

    #[tokio::test]
    async fn test_fetch_call_counter() {
        let backend = seeded();
        let query = TenderQuery::new(UserId::generate());
        assert_eq!(backend.fetch_calls(), 0);
        backend.filtered_tenders(&query, 10).await.unwrap();
        backend.filtered_tenders(&query, 10).await.unwrap();
        assert_eq!(backend.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_fetch() {
        let backend = seeded();
        backend.set_failing(true);
        let err = backend
            .filtered_tenders(&TenderQuery::new(UserId::generate()), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Network { .. }));
        assert_eq!(backend.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_distinct_values_sorted_dedup() {
        let backend = seeded();
        let cities = backend.distinct_values(DistinctColumn::City).await.unwrap();
        assert_eq!(cities, vec!["Delhi".to_string(), "Pune".to_string()]);
    }

    #[tokio::test]
    async fn test_bid_lifecycle() {
        let backend = seeded();
        let bidder = UserId::generate();
        let placed = backend
            .place_bid(&Bid::new(Uuid::new_v4(), bidder, 90_000))
            .await
            .unwrap();

        let updated = backend
            .update_bid(placed.id, 85_000, Some("revised"))
            .await
            .unwrap();
        assert_eq!(updated.amount, 85_000);

        let decided = backend
            .decide_bid(placed.id, BidDecision::Accept)
            .await
            .unwrap();
        assert!(decided.is_decided());

        let listed = backend
            .list_bids(&BidQuery::new().with_bidder(bidder))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_document_lifecycle() {
        let backend = MemoryBackend::new();
        let owner = UserId::generate();
        let doc = backend
            .upload_document(owner, DocumentKind::Pan, b"pdf bytes".to_vec())
            .await
            .unwrap();
        assert_eq!(doc.status, VerificationStatus::Pending);

        let verified = backend
            .verify_document(doc.id, VerificationStatus::Verified)
            .await
            .unwrap();
        assert!(verified.is_verified());

        backend.delete_document(doc.id).await.unwrap();
        let err = backend.delete_document(doc.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.profile(UserId::generate()).await.unwrap_err();
        assert!(err.is_not_found());

        let user = UserProfile::new(UserId::generate(), "a@b.in", UserRole::Bidder);
        let backend = backend.with_user(user.clone());
        assert_eq!(backend.profile(user.id).await.unwrap().email, "a@b.in");
    }
}
