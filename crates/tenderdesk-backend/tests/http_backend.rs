//! Integration tests for the HTTP backend against a mock server.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tenderdesk_backend::{
    BackendError, DistinctColumn, HttpBackend, PortalBackend, PortalConfig, TenderQuery,
};
use tenderdesk_core::{Bid, UserId};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&PortalConfig::new(server.uri(), "anon-key"))
}

fn tender_row(bid_number: &str, total_count: u64) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "bid_number": bid_number,
        "category": "Desktop Computers",
        "ministry": "Ministry of Defence",
        "department": "Department of Defence Production",
        "city": "Pune",
        "start_date": "2026-03-01T00:00:00Z",
        "end_date": "2026-03-20T18:00:00Z",
        "total_count": total_count,
    })
}

#[tokio::test]
async fn filtered_tenders_parses_rows_and_lifts_total() {
    let server = MockServer::start().await;
    let user = UserId::generate();

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_filtered_tenders"))
        .and(header("apikey", "anon-key"))
        .and(body_partial_json(json!({
            "p_user_id": user.to_string(),
            "p_page": 2,
            "p_page_size": 10,
            "p_ministry": "Ministry of Defence",
            "p_use_keywords": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            tender_row("GEM/2026/B/1", 37),
            tender_row("GEM/2026/B/2", 37),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = TenderQuery::new(user)
        .with_page(2)
        .with_ministry("Ministry of Defence");
    let page = backend_for(&server)
        .filtered_tenders(&query, 10)
        .await
        .unwrap();

    assert_eq!(page.total_count, 37);
    assert_eq!(page.len(), 2);
    assert_eq!(page.rows[0].bid_number, "GEM/2026/B/1");
    assert_eq!(page.page_count(10), 4);
}

#[tokio::test]
async fn filtered_tenders_empty_result_has_zero_total() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_filtered_tenders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let page = backend_for(&server)
        .filtered_tenders(&TenderQuery::new(UserId::generate()), 10)
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn bearer_token_overrides_anon_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_user_keywords"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["laptop", "chair"])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).with_bearer("user-jwt");
    let keywords = backend.user_keywords(UserId::generate()).await.unwrap();
    assert_eq!(keywords, vec!["laptop".to_string(), "chair".to_string()]);
}

#[tokio::test]
async fn auth_errors_are_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_filtered_tenders"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "JWT expired" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .filtered_tenders(&TenderQuery::new(UserId::generate()), 10)
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("JWT expired"));
}

#[tokio::test]
async fn server_errors_extract_postgrest_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_filtered_tenders"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "function timeout" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .filtered_tenders(&TenderQuery::new(UserId::generate()), 10)
        .await
        .unwrap_err();
    match err {
        BackendError::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "function timeout");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_filtered_tenders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .filtered_tenders(&TenderQuery::new(UserId::generate()), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Decode { .. }));
}

#[tokio::test]
async fn place_bid_requests_representation() {
    let server = MockServer::start().await;
    let bid = Bid::new(Uuid::new_v4(), UserId::generate(), 125_000);
    let stored = serde_json::to_value(&bid).unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/bids"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({ "amount": 125_000 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored])))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = backend_for(&server).place_bid(&bid).await.unwrap();
    assert_eq!(echoed.id, bid.id);
    assert_eq!(echoed.amount, 125_000);
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .profile(UserId::generate())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn distinct_values_roundtrip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_distinct_values"))
        .and(body_partial_json(json!({ "p_column": "ministry" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(["Ministry of Defence", "Ministry of Railways"])),
        )
        .mount(&server)
        .await;

    let values = backend_for(&server)
        .distinct_values(DistinctColumn::Ministry)
        .await
        .unwrap();
    assert_eq!(values.len(), 2);
}
