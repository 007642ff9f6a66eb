//! Shared utilities for integration tests: a mock Elasticsearch and a server harness.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use telemetry_synth::{HttpServer, Shutdown, SynthConfig};

#[derive(Default)]
struct MockState {
    documents: Vec<(String, Value)>,
    rejected: HashSet<String>,
    /// 503 responses to hand out before writes succeed again.
    transient_failures: u32,
    write_attempts: u32,
    deleted: u64,
}

/// Handle to a running mock store.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    pub fn reject_index(&self, index: &str) {
        self.state.lock().unwrap().rejected.insert(index.to_string());
    }

    pub fn fail_next_writes(&self, n: u32) {
        self.state.lock().unwrap().transient_failures = n;
    }

    pub fn documents_in(&self, index: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, d)| d.clone())
            .collect()
    }

    pub fn write_attempts(&self) -> u32 {
        self.state.lock().unwrap().write_attempts
    }

    pub fn deleted(&self) -> u64 {
        self.state.lock().unwrap().deleted
    }
}

async fn info() -> Json<Value> {
    Json(json!({
        "name": "mock-node",
        "cluster_name": "mock-cluster",
        "version": { "number": "8.11.0" },
    }))
}

async fn index_doc(
    State(store): State<MockStore>,
    Path(index): Path<String>,
    Json(doc): Json<Value>,
) -> impl IntoResponse {
    let mut state = store.state.lock().unwrap();
    state.write_attempts += 1;

    if state.transient_failures > 0 {
        state.transient_failures -= 1;
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "unavailable" })));
    }
    if state.rejected.contains(&index) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "type": "mapper_parsing_exception" } })),
        );
    }

    state.documents.push((index.clone(), doc));
    (StatusCode::CREATED, Json(json!({ "_index": index, "result": "created" })))
}

async fn delete_by_query(
    State(store): State<MockStore>,
    Path(index): Path<String>,
    Json(_query): Json<Value>,
) -> Json<Value> {
    let mut state = store.state.lock().unwrap();
    let before = state.documents.len();
    state.documents.retain(|(i, _)| i != &index);
    let deleted = (before - state.documents.len()) as u64;
    state.deleted += deleted;
    Json(json!({ "deleted": deleted }))
}

/// Start a mock Elasticsearch on an ephemeral port.
pub async fn start_mock_store() -> (SocketAddr, MockStore) {
    let store = MockStore::default();
    let app = Router::new()
        .route("/", get(info))
        .route("/{index}/_doc", post(index_doc))
        .route("/{index}/_delete_by_query", post(delete_by_query))
        .with_state(store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, store)
}

/// Config tuned for fast tests.
/// A store that accepts connections and never answers.
pub async fn start_silent_store() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

pub fn test_config() -> SynthConfig {
    let mut config = SynthConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.store.request_timeout_secs = 2;
    config.store.max_retries = 3;
    config.store.base_delay_ms = 1;
    config.store.max_delay_ms = 5;
    config.generation.tick_interval_ms = 100;
    config
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

/// Start the control server on an ephemeral port.
pub async fn start_server(config: SynthConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));
    TestServer { addr, shutdown, task }
}

/// Poll `GET /api/health` until no run is active.
pub async fn wait_until_idle(client: &reqwest::Client, server: &TestServer) {
    for _ in 0..100 {
        let health: Value = client.get(server.url("/api/health")).send().await.unwrap().json().await.unwrap();
        if health["generating"] == false {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("run did not stop");
}
