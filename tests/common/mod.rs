#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt; // For Response body handling
use portfolio_tracker::{config::Config, create_app, db, AppState};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt; // For oneshot

pub const HEADER: &str =
    "Company Name,Total Funding,Current Revenue,Investor List,Market Segment,Stage";

pub const SAMPLE_CSV: &str = "Company Name,Total Funding,Current Revenue,Investor List,Market Segment,Stage
Company A,25000000,5000000,\"Draper, Sequoia\",SaaS,Series B
Company B,12000000,2500000,\"Draper, a16z\",Fintech,Series A
";

// For initializing tracing once
static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Fresh, fully migrated in-memory store.
pub async fn setup_db() -> DatabaseConnection {
    setup_tracing();
    db::connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Router over a fresh store, with rate limiting and docs off.
pub async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_db().await;
    let app = create_app(AppState::new(db.clone(), Config::default()));
    (app, db)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_csv(app: &Router, csv: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/import/csv")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    send(app, request).await
}
