#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Route contract tests
//!
//! tests/fixtures/api_routes.txt lists every route the dashboard serves.
//! Each entry is requested against the real router, at the root and under a
//! base path, and must be matched by it: handlers may answer 400 or 502 here
//! (the backend is unreachable), but never with the router's 404 or 405.
//!
//! If a route is added or renamed, update api_routes.txt in the same change.
//!
//! Run with: cargo test --test api_contract

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use media_dashboard::api::{self, AppState};
use media_dashboard::client::ServiceClient;
use media_dashboard::config::Config;
use media_dashboard::dashboard::Dashboard;
use media_dashboard::images::ImageCache;
use media_dashboard::settings::DashSettingsStore;
use media_dashboard::widgets::LoaderRegistry;

/// Nothing listens here; service calls fail fast with a connection error.
const DEAD_BACKEND: &str = "http://127.0.0.1:1";

/// Sample values for path parameters, chosen so handlers get past their own
/// validation and reach the backend.
const PARAMS: &[(&str, &str)] = &[
    ("{module_id}", "dash_sysinfo"),
    ("{service}", "kodi"),
    ("{tvdbid}", "280619"),
    ("{season}", "1"),
];

fn load_contract() -> Vec<(Method, String)> {
    let content =
        fs::read_to_string("tests/fixtures/api_routes.txt").expect("Failed to read api_routes.txt");

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.is_empty())
        .map(|line| {
            let (method, path) = line
                .split_once(' ')
                .unwrap_or_else(|| panic!("malformed contract line: {line}"));
            (method.parse().unwrap(), path.to_string())
        })
        .collect()
}

fn concrete_path(template: &str) -> String {
    PARAMS
        .iter()
        .fold(template.to_string(), |path, (param, value)| path.replace(param, value))
}

fn router_at(webdir: &str) -> (Router, TempDir) {
    let data_dir = tempfile::tempdir().unwrap();
    let config = Arc::new(Config {
        backend: DEAD_BACKEND.to_string(),
        webdir: webdir.to_string(),
        widgets: vec!["dash_sysinfo".to_string()],
        ..Config::default()
    });
    let client = ServiceClient::new(config.clone()).unwrap();
    let dashboard =
        Dashboard::new(config.clone(), client.clone(), LoaderRegistry::standard()).unwrap();
    let settings =
        DashSettingsStore::new(data_dir.path().to_path_buf(), config.dash_order.clone());
    let images = ImageCache::new(data_dir.path().to_path_buf(), client.clone(), true);

    let state = AppState::new(config, client, dashboard, settings, images);
    (api::router(state), data_dir)
}

async fn status_of(router: &Router, method: Method, uri: &str) -> StatusCode {
    router
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

async fn assert_contract_served(webdir: &str) {
    let (router, _data_dir) = router_at(webdir);
    let prefix = webdir.trim_end_matches('/');

    let mut unmatched = Vec::new();
    for (method, template) in load_contract() {
        let path = concrete_path(&template);
        let uri = match (prefix, path.as_str()) {
            ("", path) => path.to_string(),
            (prefix, "/") => prefix.to_string(),
            (prefix, path) => format!("{prefix}{path}"),
        };
        let status = status_of(&router, method.clone(), &uri).await;
        if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED {
            unmatched.push(format!("  {method} {template} ({uri} -> {status})"));
        }
    }

    assert!(
        unmatched.is_empty(),
        "\n\nRoutes in api_routes.txt not served under webdir {webdir}:\n{}\n",
        unmatched.join("\n")
    );
}

#[tokio::test]
async fn contract_routes_served_at_root() {
    assert_contract_served("/").await;
}

#[tokio::test]
async fn contract_routes_served_under_base_path() {
    assert_contract_served("/htpc/").await;
}

#[tokio::test]
async fn contract_routes_reject_other_methods() {
    let (router, _data_dir) = router_at("/");
    for (_, template) in load_contract() {
        let uri = concrete_path(&template);
        assert_eq!(
            status_of(&router, Method::POST, &uri).await,
            StatusCode::METHOD_NOT_ALLOWED,
            "POST {uri} should not be routed"
        );
    }
}

#[tokio::test]
async fn unlisted_paths_are_not_served() {
    let (router, _data_dir) = router_at("/htpc/");
    for uri in ["/status", "/htpc/nope", "/htpc/dash/widgets"] {
        assert_eq!(status_of(&router, Method::GET, uri).await, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[test]
fn golden_file_is_sorted() {
    let content =
        fs::read_to_string("tests/fixtures/api_routes.txt").expect("Failed to read api_routes.txt");

    let routes: Vec<_> = content
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .collect();

    let mut sorted = routes.clone();
    sorted.sort();

    assert_eq!(
        routes, sorted,
        "api_routes.txt is not sorted! Please sort alphabetically."
    );
}
