//! HTTP implementation of [`PortalBackend`] over the hosted service.
//!
//! The hosted backend exposes PostgREST-style table endpoints under
//! `/rest/v1/`, RPC functions under `/rest/v1/rpc/`, and object storage
//! under `/storage/v1/object/`. Every request carries the publishable
//! `apikey` header plus a bearer token: the signed-in user's JWT when a
//! session exists, the anon key otherwise.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use tenderdesk_core::time::format_rfc3339;
use tenderdesk_core::{
    Bid, BidDecision, DocumentKind, IdentityDocument, UserId, UserProfile, VerificationStatus,
    now_utc,
};

use crate::config::PortalConfig;
use crate::error::BackendError;
use crate::traits::PortalBackend;
use crate::types::{BidQuery, DistinctColumn, TenderPage, TenderQuery};

/// Backend implementation over the hosted REST/RPC endpoints.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    documents_bucket: String,
    /// User JWT for the signed-in session, if any.
    bearer: Option<String>,
}

impl HttpBackend {
    /// Creates a backend from the portal configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// practice).
    #[must_use]
    pub fn new(config: &PortalConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            documents_bucket: config.documents_bucket.clone(),
            bearer: None,
        }
    }

    /// Attaches a signed-in user's JWT. Requests sent without one carry
    /// the anon key as the bearer.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn storage_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.documents_bucket, object_path
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let token = self.bearer.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let resp = self
            .request(reqwest::Method::POST, &self.rpc_url(function))
            .json(body)
            .send()
            .await?;
        decode_response(resp).await
    }

    /// Issues a table mutation that asks the backend to echo the
    /// affected rows back, and returns the first one.
    async fn returning_one<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        missing: &str,
    ) -> Result<T, BackendError> {
        let resp = req.header("Prefer", "return=representation").send().await?;
        let mut rows: Vec<T> = decode_response(resp).await?;
        if rows.is_empty() {
            return Err(BackendError::not_found(missing));
        }
        Ok(rows.swap_remove(0))
    }
}

/// One row of the `get_filtered_tenders` RPC result. The backend embeds
/// the total match count in every row; it is lifted out into the page.
#[derive(Debug, Deserialize)]
struct FilteredTenderRow {
    #[serde(flatten)]
    tender: tenderdesk_core::TenderRecord,
    total_count: u64,
}

fn filtered_tenders_body(
    query: &TenderQuery,
    page_size: u32,
) -> Result<serde_json::Value, BackendError> {
    let fmt = |dt: Option<OffsetDateTime>| -> Result<Option<String>, BackendError> {
        dt.map(format_rfc3339)
            .transpose()
            .map_err(|e| BackendError::invalid(e.to_string()))
    };

    Ok(json!({
        "p_user_id": query.user,
        "p_page": query.page,
        "p_page_size": page_size,
        "p_ministry": query.ministry,
        "p_department": query.department,
        "p_city": query.city,
        "p_search": query.search,
        "p_start_date": fmt(query.dates.from)?,
        "p_end_date": fmt(query.dates.to)?,
        "p_use_keywords": query.use_keywords,
    }))
}

#[async_trait]
impl PortalBackend for HttpBackend {
    async fn filtered_tenders(
        &self,
        query: &TenderQuery,
        page_size: u32,
    ) -> Result<TenderPage, BackendError> {
        query
            .validate()
            .map_err(|e| BackendError::invalid(e.to_string()))?;

        tracing::debug!(user = %query.user, page = query.page, "Fetching tender page");
        let body = filtered_tenders_body(query, page_size)?;
        let rows: Vec<FilteredTenderRow> = self.rpc("get_filtered_tenders", &body).await?;

        let total_count = rows.first().map_or(0, |r| r.total_count);
        let rows = rows.into_iter().map(|r| r.tender).collect();
        Ok(TenderPage::new(rows, total_count))
    }

    async fn distinct_values(&self, column: DistinctColumn) -> Result<Vec<String>, BackendError> {
        self.rpc(
            "get_distinct_values",
            &json!({ "p_column": column.as_str() }),
        )
        .await
    }

    async fn user_keywords(&self, user: UserId) -> Result<Vec<String>, BackendError> {
        self.rpc("get_user_keywords", &json!({ "p_user_id": user }))
            .await
    }

    async fn update_keywords(
        &self,
        user: UserId,
        keywords: &[String],
    ) -> Result<(), BackendError> {
        let resp = self
            .request(reqwest::Method::POST, &self.rpc_url("set_user_keywords"))
            .json(&json!({ "p_user_id": user, "p_keywords": keywords }))
            .send()
            .await?;
        expect_success(resp).await
    }

    async fn place_bid(&self, bid: &Bid) -> Result<Bid, BackendError> {
        let req = self
            .request(reqwest::Method::POST, &self.rest_url("bids"))
            .json(bid);
        self.returning_one(req, "placed bid").await
    }

    async fn update_bid(
        &self,
        id: Uuid,
        amount: u64,
        note: Option<&str>,
    ) -> Result<Bid, BackendError> {
        let req = self
            .request(reqwest::Method::PATCH, &self.rest_url("bids"))
            .query(&[("id", format!("eq.{id}"))])
            .json(&json!({
                "amount": amount,
                "note": note,
                "updated_at": format_rfc3339(now_utc())
                    .map_err(|e| BackendError::invalid(e.to_string()))?,
            }));
        self.returning_one(req, &format!("bid {id}")).await
    }

    async fn list_bids(&self, filter: &BidQuery) -> Result<Vec<Bid>, BackendError> {
        let mut params: Vec<(String, String)> =
            vec![("order".to_string(), "submitted_at.desc".to_string())];
        if let Some(status) = filter.status {
            params.push(("status".to_string(), format!("eq.{status}")));
        }
        if let Some(tender_id) = filter.tender_id {
            params.push(("tender_id".to_string(), format!("eq.{tender_id}")));
        }
        if let Some(bidder) = filter.bidder {
            params.push(("bidder".to_string(), format!("eq.{bidder}")));
        }

        let resp = self
            .request(reqwest::Method::GET, &self.rest_url("bids"))
            .query(&params)
            .send()
            .await?;
        decode_response(resp).await
    }

    async fn decide_bid(&self, id: Uuid, decision: BidDecision) -> Result<Bid, BackendError> {
        let req = self
            .request(reqwest::Method::PATCH, &self.rest_url("bids"))
            .query(&[("id", format!("eq.{id}"))])
            .json(&json!({
                "status": decision.resulting_status(),
                "updated_at": format_rfc3339(now_utc())
                    .map_err(|e| BackendError::invalid(e.to_string()))?,
            }));
        self.returning_one(req, &format!("bid {id}")).await
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

        let resp = self
            .request(
                reqwest::Method::POST,
                &self.storage_url(&document.storage_path),
            )
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        expect_success(resp).await?;

        let req = self
            .request(reqwest::Method::POST, &self.rest_url("documents"))
            .json(&document);
        self.returning_one(req, "uploaded document").await
    }

    async fn delete_document(&self, id: Uuid) -> Result<(), BackendError> {
        let resp = self
            .request(reqwest::Method::GET, &self.rest_url("documents"))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        let mut rows: Vec<IdentityDocument> = decode_response(resp).await?;
        let document = if rows.is_empty() {
            return Err(BackendError::not_found(format!("document {id}")));
        } else {
            rows.swap_remove(0)
        };

        let resp = self
            .request(
                reqwest::Method::DELETE,
                &self.storage_url(&document.storage_path),
            )
            .send()
            .await?;
        expect_success(resp).await?;

        let resp = self
            .request(reqwest::Method::DELETE, &self.rest_url("documents"))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        expect_success(resp).await
    }

    async fn verify_document(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<IdentityDocument, BackendError> {
        let req = self
            .request(reqwest::Method::PATCH, &self.rest_url("documents"))
            .query(&[("id", format!("eq.{id}"))])
            .json(&json!({ "status": status }));
        self.returning_one(req, &format!("document {id}")).await
    }

    async fn list_documents(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<IdentityDocument>, BackendError> {
        let mut params: Vec<(String, String)> =
            vec![("order".to_string(), "uploaded_at.desc".to_string())];
        if let Some(owner) = owner {
            params.push(("owner".to_string(), format!("eq.{owner}")));
        }

        let resp = self
            .request(reqwest::Method::GET, &self.rest_url("documents"))
            .query(&params)
            .send()
            .await?;
        decode_response(resp).await
    }

    async fn profile(&self, user: UserId) -> Result<UserProfile, BackendError> {
        let resp = self
            .request(reqwest::Method::GET, &self.rest_url("users"))
            .query(&[("id", format!("eq.{user}"))])
            .send()
            .await?;
        let mut rows: Vec<UserProfile> = decode_response(resp).await?;
        if rows.is_empty() {
            return Err(BackendError::not_found(format!("user {user}")));
        }
        Ok(rows.swap_remove(0))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, BackendError> {
        let resp = self
            .request(reqwest::Method::GET, &self.rest_url("users"))
            .query(&[("order", "email.asc")])
            .send()
            .await?;
        decode_response(resp).await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

/// Decodes a successful JSON response, mapping failures into the error
/// taxonomy.
async fn decode_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| BackendError::decode(e.to_string()))
}

/// Checks the status of a response whose body we do not care about.
async fn expect_success(resp: reqwest::Response) -> Result<(), BackendError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), &body));
    }
    Ok(())
}

fn status_error(status: u16, body: &str) -> BackendError {
    // PostgREST errors come as {"message": "...", ...}
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => BackendError::auth(message),
        _ => BackendError::http(status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderdesk_core::DateRange;
    use tenderdesk_core::time::parse_rfc3339;

    #[test]
    fn test_filtered_tenders_body_shape() {
        let user = UserId::generate();
        let query = TenderQuery::new(user)
            .with_page(2)
            .with_ministry("Ministry of Defence")
            .with_dates(DateRange::new().from(parse_rfc3339("2026-03-01T00:00:00Z").unwrap()));

        let body = filtered_tenders_body(&query, 10).unwrap();
        assert_eq!(body["p_page"], 2);
        assert_eq!(body["p_page_size"], 10);
        assert_eq!(body["p_ministry"], "Ministry of Defence");
        assert_eq!(body["p_department"], serde_json::Value::Null);
        assert_eq!(body["p_start_date"], "2026-03-01T00:00:00Z");
        assert_eq!(body["p_end_date"], serde_json::Value::Null);
        assert_eq!(body["p_use_keywords"], false);
        assert_eq!(body["p_user_id"], user.to_string());
    }

    #[test]
    fn test_status_error_extracts_postgrest_message() {
        let err = status_error(400, r#"{"message": "invalid input syntax"}"#);
        assert_eq!(
            err.to_string(),
            "Backend error (HTTP 400): invalid input syntax"
        );
    }

    #[test]
    fn test_status_error_auth_mapping() {
        assert!(status_error(401, "{}").is_auth());
        assert!(status_error(403, r#"{"message": "JWT expired"}"#).is_auth());
        assert!(!status_error(500, "boom").is_auth());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new(&PortalConfig::new("https://x.example.in/", "k"));
        assert_eq!(backend.rest_url("bids"), "https://x.example.in/rest/v1/bids");
        assert_eq!(
            backend.rpc_url("get_filtered_tenders"),
            "https://x.example.in/rest/v1/rpc/get_filtered_tenders"
        );
        assert_eq!(
            backend.storage_url("u/1.pdf"),
            "https://x.example.in/storage/v1/object/documents/u/1.pdf"
        );
    }
}
