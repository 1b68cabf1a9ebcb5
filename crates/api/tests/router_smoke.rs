use axum::{body::Body, http::Request, http::StatusCode, Router};
use serde_json::Value;
use tower::ServiceExt;

use ratecmp_api::{create_router, AppState};
use ratecmp_core::dataset::Dataset;

fn app() -> Router {
    create_router(AppState::from_dataset(Dataset::sample()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

#[tokio::test]
async fn healthz_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn filters_describe_sample_table() {
    let (status, body) = get_json(app(), "/filters").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["dataset_kind"], "simple");
    assert_eq!(body["banks"].as_array().unwrap().len(), 4);
    assert_eq!(body["terms"], serde_json::json!([6, 12]));
    assert_eq!(body["preferences"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn default_dashboard_ranks_every_product() {
    let (status, body) = get_json(app(), "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["rows"].as_array().unwrap().len(), 8);
    assert_eq!(body["top"]["product_name"], "우리 WON 적금");
    assert_eq!(body["top"]["emphasis"], "top");
    assert!(body["notice"].is_null());
}

#[tokio::test]
async fn empty_bank_selection_returns_notice() {
    let (status, body) = get_json(app(), "/dashboard?banks=").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert!(body["top"].is_null());
    assert!(body["notice"].is_string());
}

#[tokio::test]
async fn preference_and_rate_sort_are_applied() {
    let (status, body) = get_json(
        app(),
        "/dashboard?product_type=savings&preference=term-focused&sort=rate",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["product_name"], "하나 청년 적금");
    assert_eq!(body["scorer"]["kind"], "preference");
    assert_eq!(body["scorer"]["preference"], "term-focused");
}

#[tokio::test]
async fn unknown_preference_is_bad_request() {
    let (status, _) = get_json(app(), "/dashboard?preference=yolo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(app(), "/top-picks?preference=yolo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn top_picks_respect_limit() {
    let (status, body) = get_json(app(), "/top-picks?preference=savings-preferred&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.unwrap()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["product_type"] == "savings"));
}
