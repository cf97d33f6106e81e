#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde::Deserialize;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockroom_api::{ApiClient, Error, ListQuery, NO_FILTER};

#[derive(Debug, Deserialize)]
struct TestProduct {
    id: i64,
    name: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_unwraps_page_envelope() {
    let (server, client) = setup().await;

    let envelope = json!({
        "total": 27,
        "data": [
            { "id": 1, "name": "Desk lamp" },
            { "id": 2, "name": "Floor lamp" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let page = client
        .list::<TestProduct>("products", &ListQuery::page(1))
        .await
        .unwrap();

    assert_eq!(page.total, 27);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].name, "Desk lamp");
}

#[tokio::test]
async fn test_list_sends_pagination_and_search_filters() {
    let (server, client) = setup().await;

    let envelope = json!({ "total": 0, "data": [] });

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("$skip", "10"))
        .and(query_param("$limit", "10"))
        .and(query_param("$order[updatedAt]", "DESC"))
        .and(query_param("name[$iLike]", "%lamp%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let query = ListQuery::page(2).search("name", "lamp");
    let page = client.list::<TestProduct>("products", &query).await.unwrap();

    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_sentinel_category_filter_is_not_sent() {
    let (server, client) = setup().await;

    let envelope = json!({ "total": 0, "data": [] });

    // Matches only when `categoryId` is absent — wiremock rejects the
    // request if the mock with the param were required, so assert via a
    // received-request inspection instead.
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let query = ListQuery::page(1).equals("categoryId", NO_FILTER);
    client.list::<TestProduct>("products", &query).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let url = &requests[0].url;
    assert!(
        !url.query_pairs().any(|(k, _)| k == "categoryId"),
        "sentinel filter leaked into query: {url}"
    );
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_create_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(body_json(json!({ "name": "Desk lamp" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 5, "name": "Desk lamp" })),
        )
        .mount(&server)
        .await;

    let created: TestProduct = client
        .create("products", &json!({ "name": "Desk lamp" }), "tok-123")
        .await
        .unwrap();

    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn test_patch_targets_entity_url() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/products/42"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 42, "name": "Renamed" })),
        )
        .mount(&server)
        .await;

    let updated: TestProduct = client
        .patch("products", 42, &json!({ "name": "Renamed" }), "tok-123")
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn test_delete_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
        .mount(&server)
        .await;

    client.delete("products", 42, "tok-123").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let result = client.delete("products", 1, "stale-token").await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "jwt expired");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_conflict_surfaces_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/categories/7"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Cannot delete a category that still has products."
        })))
        .mount(&server)
        .await;

    let result = client.delete("categories", 7, "tok-123").await;

    match result {
        Err(Error::Api {
            status,
            ref message,
        }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Cannot delete a category that still has products.");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_multibyte_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    // A 2xx reply whose body is not the page envelope, long enough that
    // the error preview has to cut inside the Cyrillic text.
    let noise = "й".repeat(150);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "oops": noise })),
        )
        .mount(&server)
        .await;

    let result = client
        .list::<TestProduct>("products", &ListQuery::page(1))
        .await;

    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains("body preview"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_json_body_falls_back_to_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client
        .list::<TestProduct>("products", &ListQuery::page(1))
        .await;

    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Api error, got: {other:?}"),
    }
}
