//! Shared utilities for integration testing.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use watchlist_gateway::{GatewayConfig, HttpServer, Shutdown};

/// In-process stand-in for a jsonblob-style document store.
#[derive(Clone)]
pub struct MockStore {
    pub base: String,
    docs: Arc<Mutex<HashMap<String, Value>>>,
    next_id: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    puts: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn seed(&self, id: &str, document: Value) {
        self.docs.lock().unwrap().insert(id.to_string(), document);
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(id).cloned()
    }

    pub fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

async fn create(State(store): State<MockStore>, Json(document): Json<Value>) -> Response {
    let id = format!("blob{}", store.next_id.fetch_add(1, Ordering::SeqCst));
    store.seed(&id, document);
    (StatusCode::CREATED, [(header::LOCATION, store.url(&id))]).into_response()
}

async fn fetch(State(store): State<MockStore>, Path(id): Path<String>) -> Response {
    match store.document(&id) {
        Some(document) => Json(document).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn replace(State(store): State<MockStore>, Path(id): Path<String>, body: Bytes) -> Response {
    store.puts.fetch_add(1, Ordering::SeqCst);
    if store.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if store.document(&id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    match serde_json::from_slice::<Value>(&body) {
        Ok(document) => {
            store.seed(&id, document.clone());
            Json(document).into_response()
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Start a mock document store on an ephemeral port.
pub async fn start_mock_store() -> MockStore {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = MockStore {
        base: format!("http://{}/api/jsonBlob", addr),
        docs: Arc::default(),
        next_id: Arc::default(),
        fail_writes: Arc::default(),
        puts: Arc::default(),
    };

    let app = Router::new()
        .route("/api/jsonBlob", post(create))
        .route("/api/jsonBlob/{id}", get(fetch).put(replace))
        .with_state(store.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    store
}

/// A running gateway and the handle that stops it.
pub struct Gateway {
    pub url: String,
    pub shutdown: Shutdown,
}

/// Start a gateway pointed at `store_base` on an ephemeral port.
pub async fn start_gateway(store_base: &str) -> Gateway {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.store.base_url = store_base.to_string();
    config.store.timeout_secs = 5;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway {
        url: format!("http://{}/watchlist", addr),
        shutdown,
    }
}

/// A client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
