//! HTTP-level tests for the items API, against an in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use slate_server::{app, build_registry, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn setup_app() -> (axum::Router, slate_db::DbPool) {
    let pool = slate_db::open(":memory:", slate_db::DbSettings::default()).unwrap();
    let registry = build_registry().unwrap();
    {
        let conn = pool.get().unwrap();
        slate_db::create_all(&conn, &registry).unwrap();
    }

    let state = AppState {
        pool: pool.clone(),
        registry: Arc::new(registry),
    };
    (app(state), pool)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn create_returns_stored_item_with_key_and_defaults() {
    let (app, _pool) = setup_app();

    let response = app
        .oneshot(post_json(
            "/api/items",
            &json!({"name": "anvil", "description": "heavy"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let item = response_json(response).await;
    assert_eq!(item["id"], json!(1));
    assert_eq!(item["name"], json!("anvil"));
    assert_eq!(item["description"], json!("heavy"));
    // Defaults applied by validation, visible in the stored object.
    assert_eq!(item["quantity"], json!(0));
    assert_eq!(item["warehouse"], json!("main"));
}

#[tokio::test]
async fn create_with_invalid_body_is_422_with_error_list() {
    let (app, _pool) = setup_app();

    let response = app
        .oneshot(post_json("/api/items", &json!({"quantity": "lots"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    let locs: Vec<_> = errors.iter().map(|e| e["loc"].as_str().unwrap()).collect();
    assert_eq!(locs, vec!["name", "quantity"]);
    assert_eq!(errors[0]["kind"], json!("missing"));
    assert_eq!(errors[1]["kind"], json!("integer_type"));
}

#[tokio::test]
async fn null_warehouse_passes_validation_and_conflicts_at_commit() {
    let (app, _pool) = setup_app();

    // `warehouse` is declared optional, so the null is a valid value; the
    // NOT NULL column rejects it at write time and the handler maps the
    // integrity violation to 409.
    let response = app
        .oneshot(post_json(
            "/api/items",
            &json!({"name": "anvil", "warehouse": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert!(
        body["error"].as_str().unwrap().contains("NOT NULL"),
        "{body}"
    );
}

#[tokio::test]
async fn get_by_id_and_missing_id() {
    let (app, _pool) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/items", &json!({"name": "bolt"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/api/items/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let item = response_json(response).await;
    assert_eq!(item["name"], json!("bolt"));

    let response = app.oneshot(get_request("/api/items/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_pagination_clamps_limit_to_100() {
    let (app, pool) = setup_app();

    // Seed straight through the storage layer; the handlers are exercised by
    // the reads.
    {
        let conn = pool.get().unwrap();
        let registry = build_registry().unwrap();
        let model = registry.get(slate_server::ITEM_TABLE).unwrap();
        for i in 0..105 {
            let row = slate_validate::validate(
                &model.input_projection(),
                &json!({"name": format!("item-{i}")}),
            )
            .unwrap();
            slate_db::insert(&conn, model, &row).unwrap();
        }
    }

    // Default page size is 100.
    let response = app.clone().oneshot(get_request("/api/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items = response_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 100);

    // An oversized limit is clamped, not rejected.
    let response = app
        .clone()
        .oneshot(get_request("/api/items?limit=1000"))
        .await
        .unwrap();
    let items = response_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 100);

    // min(limit, total - offset), in insertion order.
    let response = app
        .clone()
        .oneshot(get_request("/api/items?offset=100&limit=50"))
        .await
        .unwrap();
    let items = response_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["name"], json!("item-100"));

    let response = app
        .oneshot(get_request("/api/items?offset=2&limit=3"))
        .await
        .unwrap();
    let items = response_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["name"], json!("item-2"));
    assert_eq!(items[2]["name"], json!("item-4"));
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _pool) = setup_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], json!("ok"));
}
