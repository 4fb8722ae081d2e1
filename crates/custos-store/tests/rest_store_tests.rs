//! Integration tests for the REST store client
//!
//! Exercises the HTTP surface and status-to-taxonomy mapping against a
//! mocked admin API.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use custos_store::{
    DocumentRef, DocumentStore, IdentityStore, IdentityUpdate, NewIdentity, PageRequest,
    RestStore, StoreError,
};

fn store_for(server: &MockServer) -> RestStore {
    RestStore::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn find_by_email_returns_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .and(query_param("email", "a@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "u-1",
            "email": "a@x.com",
            "disabled": false,
            "email_verified": true,
            "claims": { "admin": true }
        })))
        .mount(&server)
        .await;

    let identity = store_for(&server).find_by_email("a@x.com").await.unwrap();
    assert_eq!(identity.uid, "u-1");
    assert!(identity.is_admin());
}

#[tokio::test]
async fn missing_identity_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .find_by_email("ghost@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "identity", .. }));
}

#[tokio::test]
async fn duplicate_create_maps_to_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .create(&NewIdentity::verified("a@x.com", "s"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { .. }));
}

#[tokio::test]
async fn server_failure_maps_to_transient_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/u-1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .update("u-1", &IdentityUpdate::secret("new"))
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn set_claims_puts_whole_map() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/accounts/u-1/claims"))
        .and(body_json(json!({ "admin": true })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut claims = serde_json::Map::new();
    claims.insert("admin".into(), json!(true));
    store_for(&server).set_claims("u-1", &claims).await.unwrap();
}

#[tokio::test]
async fn absent_document_reads_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/users/documents/u-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let doc = store_for(&server).get("users", "u-1").await.unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn list_all_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/cities/documents"))
        .and(query_param("page_token", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "id": "c2", "fields": {} }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/cities/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "id": "c1", "fields": { "name": "Ashdod" } }],
            "next_page_token": "t1"
        })))
        .mount(&server)
        .await;

    let docs = store_for(&server).list_all("cities").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].get_str("name"), Some("Ashdod"));
    assert_eq!(docs[1].id, "c2");
}

#[tokio::test]
async fn batch_delete_posts_refs_atomically() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/documents:batchDelete"))
        .and(body_json(json!({
            "deletes": [
                { "collection": "cities", "id": "c1" },
                { "collection": "cities", "id": "c2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let refs = vec![
        DocumentRef::new("cities", "c1"),
        DocumentRef::new("cities", "c2"),
    ];
    store_for(&server).commit_delete_batch(&refs).await.unwrap();
}

#[tokio::test]
async fn oversized_batch_is_rejected_locally() {
    let server = MockServer::start().await;
    // No mock mounted: the client must refuse before any request.
    let refs: Vec<DocumentRef> = (0..501)
        .map(|i| DocumentRef::new("cities", format!("c{i}")))
        .collect();
    let err = store_for(&server)
        .commit_delete_batch(&refs)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
