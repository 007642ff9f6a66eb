//! End-to-end tests of the control API against a mock store.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

async fn connect(client: &reqwest::Client, server: &common::TestServer, store: std::net::SocketAddr) -> Value {
    let res = client
        .post(server.url("/api/connect"))
        .json(&json!({ "endpoint": format!("http://{}", store), "api_key": "test-key" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn test_full_generation_cycle() {
    let (store_addr, store) = common::start_mock_store().await;
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();

    let health: Value = client.get(server.url("/api/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health, json!({ "status": "healthy", "es_connected": false, "generating": false }));

    let connected = connect(&client, &server, store_addr).await;
    assert_eq!(connected["success"], true);
    assert_eq!(connected["cluster_name"], "mock-cluster");
    assert_eq!(connected["version"], "8.11.0");
    // Write probe was cleaned up.
    assert!(store.documents_in("traces-apm-test").is_empty());
    assert_eq!(store.deleted(), 1);

    let res = client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "gaming", "scenario": "ddos-attack", "duration": 1, "rate": 17 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "message": "Generation started" }));

    let again = client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "gaming" }))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(350)).await;
    let stop: Value = client.post(server.url("/api/stop")).send().await.unwrap().json().await.unwrap();
    assert_eq!(stop["success"], true);
    common::wait_until_idle(&client, &server).await;

    let stats: Value = client.get(server.url("/api/stats")).send().await.unwrap().json().await.unwrap();
    let traces = stats["traces"].as_u64().unwrap();
    assert!(traces >= 10 && traces % 10 == 0, "traces {}", traces);
    assert_eq!(stats["logs"].as_u64().unwrap(), traces / 2);
    assert_eq!(stats["synthetics"].as_u64().unwrap(), traces / 10);

    let transactions: Vec<Value> = store
        .documents_in("traces-apm-default")
        .into_iter()
        .filter(|d| d["processor"]["event"] == "transaction")
        .collect();
    assert_eq!(transactions.len() as u64, traces);
    assert!(transactions.iter().all(|t| t["labels"]["scenario"] == "DDoS Attack Pattern"));
    assert_eq!(store.documents_in("logs-gaming").len() as u64, traces / 2);
    assert_eq!(store.documents_in("synthetics-gaming").len() as u64, traces / 10);

    // Counters stay readable after the run.
    let later: Value = client.get(server.url("/api/stats")).send().await.unwrap().json().await.unwrap();
    assert_eq!(later["traces"], stats["traces"]);

    server.stop().await;
}

#[tokio::test]
async fn test_request_validation() {
    let (store_addr, _store) = common::start_mock_store().await;
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "gaming" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not connected to Elasticsearch");

    let res = client.post(server.url("/api/connect")).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    connect(&client, &server, store_addr).await;

    for bad in [
        json!({}),
        json!({ "industry": "retail" }),
        json!({ "industry": "gaming", "rate": 0 }),
        json!({ "industry": "gaming", "duration": 0 }),
        json!({ "industry": "gaming", "use_llm": true }),
    ] {
        let res = client.post(server.url("/api/generate")).json(&bad).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", bad);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let res = client
        .post(server.url("/api/generate"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(server.url("/api/scenarios")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Industry parameter required");

    let res = client.get(server.url("/api/scenarios?industry=retail")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let health: Value = client.get(server.url("/api/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["generating"], false);

    server.stop().await;
}

#[tokio::test]
async fn test_catalog_listings() {
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();

    let industries: Value = client.get(server.url("/api/industries")).send().await.unwrap().json().await.unwrap();
    let industries = industries.as_object().unwrap();
    assert_eq!(industries.len(), 6);
    assert_eq!(industries["ecommerce"]["service_count"], 19);
    assert_eq!(industries["banking"]["name"], "Digital Banking");
    assert_eq!(industries["banking"]["has_dependencies"], true);

    let scenarios: Value = client
        .get(server.url("/api/scenarios?industry=ecommerce"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scenarios.as_object().unwrap().len(), 6);
    let black_friday = &scenarios["black-friday"];
    assert_eq!(black_friday["name"], "Black Friday Traffic Spike");
    assert!(black_friday["story"].is_string());
    assert!(black_friday["error_rate"].as_f64().unwrap() > 0.0);

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_store() {
    let mut config = common::test_config();
    config.store.max_retries = 0;
    config.store.request_timeout_secs = 1;
    let server = common::start_server(config).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/connect"))
        .json(&json!({ "endpoint": "http://127.0.0.1:1", "api_key": "k" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Connection failed"));

    let health: Value = client.get(server.url("/api/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["es_connected"], false);

    server.stop().await;
}

#[tokio::test]
async fn test_silent_store_fails_within_request_timeout() {
    let store_addr = common::start_silent_store().await;
    let mut config = common::test_config();
    config.timeouts.request_secs = 3;
    config.store.request_timeout_secs = 1;
    config.store.max_retries = 1;
    assert!(telemetry_synth::config::validation::validate_config(&config).is_ok());
    let server = common::start_server(config).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/connect"))
        .json(&json!({ "endpoint": format!("http://{}", store_addr), "api_key": "k" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Connection failed"));

    server.stop().await;
}

#[tokio::test]
async fn test_rejected_trace_index_uses_legacy_indices() {
    let (store_addr, store) = common::start_mock_store().await;
    store.reject_index("traces-apm-default");
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();
    connect(&client, &server, store_addr).await;

    client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "ecommerce", "rate": 10 }))
        .send()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.post(server.url("/api/stop")).send().await.unwrap();
    common::wait_until_idle(&client, &server).await;

    let stats: Value = client.get(server.url("/api/stats")).send().await.unwrap().json().await.unwrap();
    let traces = stats["traces"].as_u64().unwrap();
    assert!(traces >= 6);
    assert!(store.documents_in("traces-apm-default").is_empty());
    assert_eq!(store.documents_in("apm-8.0.0-transaction").len() as u64, traces);
    assert!(!store.documents_in("apm-8.0.0-span").is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_transient_store_errors_are_retried() {
    let (store_addr, store) = common::start_mock_store().await;
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();
    connect(&client, &server, store_addr).await;
    let attempts_after_connect = store.write_attempts();

    store.fail_next_writes(2);
    client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "logistics", "rate": 10 }))
        .send()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.post(server.url("/api/stop")).send().await.unwrap();
    common::wait_until_idle(&client, &server).await;

    let stats: Value = client.get(server.url("/api/stats")).send().await.unwrap().json().await.unwrap();
    assert!(stats["traces"].as_u64().unwrap() >= 6);
    // Both 503s were absorbed by retries rather than the fallback index.
    assert!(store.documents_in("apm-8.0.0-transaction").is_empty());
    assert!(store.write_attempts() - attempts_after_connect >= 2);

    server.stop().await;
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/health")).send().await.unwrap();
    let generated = res.headers().get("x-request-id").unwrap().to_str().unwrap().to_string();
    assert_eq!(generated.len(), 36);

    let res = client
        .get(server.url("/api/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "abc-123");

    server.stop().await;
}

#[tokio::test]
async fn test_dry_run_connection() {
    let server = common::start_server(common::test_config()).await;
    let client = reqwest::Client::new();

    let res: Value = client
        .post(server.url("/api/connect"))
        .json(&json!({ "dry_run": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res["cluster_name"], "dry-run");

    client
        .post(server.url("/api/generate"))
        .json(&json!({ "industry": "healthcare", "scenario": "not-a-scenario" }))
        .send()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Shutdown stops the active run.
    server.stop().await;
}
