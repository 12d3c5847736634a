//! Mock service backend for dashboard testing
//!
//! Serves canned responses for `/{service}/{route}` paths and counts the
//! requests each path receives.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Canned response
#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
struct MockBackendState {
    /// Keyed by path plus query, or by path alone to match any query
    responses: HashMap<String, Canned>,
    /// Requests seen per path (query ignored)
    hits: HashMap<String, usize>,
}

/// Mock backend hosting per-service JSON and image routes
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<RwLock<MockBackendState>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock backend on a random port
    pub async fn start() -> Self {
        let state = Arc::new(RwLock::new(MockBackendState::default()));

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL, usable as the dashboard's `backend`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `path` (optionally with `?query`) with a JSON body
    pub async fn set_json(&self, path: &str, body: Value) {
        self.set_raw(path, StatusCode::OK, "application/json", body.to_string().into_bytes())
            .await;
    }

    /// Answer `path` with an error status and empty body
    pub async fn set_status(&self, path: &str, status: StatusCode) {
        self.set_raw(path, status, "text/plain", Vec::new()).await;
    }

    pub async fn set_raw(
        &self,
        path: &str,
        status: StatusCode,
        content_type: &'static str,
        body: Vec<u8>,
    ) {
        let mut state = self.state.write().await;
        state.responses.insert(
            path.to_string(),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    /// Requests received for `path`
    pub async fn hits(&self, path: &str) -> usize {
        let state = self.state.read().await;
        state.hits.get(path).copied().unwrap_or(0)
    }

    /// Requests received in total
    pub async fn total_hits(&self) -> usize {
        let state = self.state.read().await;
        state.hits.values().sum()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

async fn handle_request(
    State(state): State<Arc<RwLock<MockBackendState>>>,
    uri: Uri,
) -> Response {
    let path = uri.path().to_string();
    let full = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let mut state = state.write().await;
    *state.hits.entry(path.clone()).or_insert(0) += 1;

    let canned = state
        .responses
        .get(&full)
        .or_else(|| state.responses.get(&path))
        .cloned();

    match canned {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
