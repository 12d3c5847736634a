//! Web UI handlers.
//!
//! Pages are Dioxus components rendered server-side; widget content arrives
//! afterwards as HTML fragments from the API handlers.
//!
//! - components/ - Shared Dioxus components (nav, layout, widget shells)
//! - pages/ - Page components (dashboard, show detail)

pub mod components;
pub mod pages;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};
use dioxus::prelude::*;
use serde::Deserialize;

use crate::api::AppState;
use crate::layout::LayoutBuilder;
use pages::{DashboardPage, ShowPage};

/// Query params for the dashboard page (`?edit` renders edit mode)
#[derive(Deserialize)]
pub struct DashboardQuery {
    pub edit: Option<String>,
}

/// Wrap a rendered page; `data-webdir` tells the client JS its base path.
fn html_doc(webdir: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"dark\" data-webdir=\"{}\">\n{}</html>",
        webdir.replace('"', "&quot;"),
        body
    )
}

/// GET / - Dashboard rows built from the saved (or configured) order
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let order = state.settings.dash_order().await;
    let rows = LayoutBuilder::new(state.dashboard.enabled()).build(&order);
    let edit = query.edit.is_some();
    let webdir = state.config.webdir.clone();

    tracing::debug!("Dashboard layout: {} rows (edit: {})", rows.len(), edit);
    let html = dioxus::ssr::render_element(rsx! {
        DashboardPage { webdir: webdir.clone(), rows, edit }
    });
    Html(html_doc(&webdir, &html))
}

/// GET /sickbeard/view/{tvdbid} - Show detail page
pub async fn show_page(
    State(state): State<AppState>,
    Path(tvdbid): Path<String>,
) -> impl IntoResponse {
    let webdir = state.config.webdir.clone();
    let html = dioxus::ssr::render_element(rsx! {
        ShowPage { webdir: webdir.clone(), tvdbid }
    });
    Html(html_doc(&webdir, &html))
}
