mod common;

use std::net::SocketAddr;
use std::time::Duration;

use common::{setup_db, SAMPLE_CSV};
use portfolio_tracker::config::{Config, RateLimit};
use portfolio_tracker::{create_app, AppState};
use tokio::task::JoinHandle;

/// Serves the app on an ephemeral port and returns its address.
async fn spawn_server(config: Config) -> (SocketAddr, JoinHandle<()>) {
    let db = setup_db().await;
    let app = create_app(AppState::new(db, config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tracing::info!("Test server running on http://{}", addr);

    let server_task = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    // Wait a moment for the server to start up
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, server_task)
}

#[tokio::test]
async fn test_server_startup_and_csv_import() {
    let (addr, server_task) = spawn_server(Config::default()).await;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert!(health.status().is_success());

    let imported = client
        .post(format!("http://{}/import/csv", addr))
        .header("content-type", "text/csv")
        .body(SAMPLE_CSV)
        .send()
        .await
        .unwrap();
    assert_eq!(imported.status().as_u16(), 201);
    let body: serde_json::Value = imported.json().await.unwrap();
    assert_eq!(body["data"]["imported"], 2);

    server_task.abort();
}

#[tokio::test]
async fn test_rate_limit_rejects_burst_overflow() {
    let config = Config {
        rate_limit: Some(RateLimit {
            per_minute: 1,
            burst: 2,
        }),
        ..Config::default()
    };
    let (addr, server_task) = spawn_server(config).await;
    let client = reqwest::Client::new();

    let mut statuses = Vec::new();
    let mut last_body = serde_json::Value::Null;
    for _ in 0..3 {
        let response = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();
        statuses.push(response.status().as_u16());
        last_body = response.json().await.unwrap_or(serde_json::Value::Null);
    }

    server_task.abort();
    assert_eq!(statuses, vec![200, 200, 429]);
    assert_eq!(last_body["success"], false);
    assert_eq!(last_body["error"], "Too many requests, retry later");
}
