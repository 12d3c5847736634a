//! HTTP API handlers

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::client::ServiceClient;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::error::DashError;
use crate::images::{self, ColorMode, ImageCache, ImageOptions};
use crate::layout::{replay_order, DashOrder, LayoutBuilder, LayoutEditor};
use crate::settings::DashSettingsStore;
use crate::shows::{self, SEASON_NOT_FOUND};
use crate::ui;
use crate::ui::components::render_widget;
use crate::ui::pages::show::{render_season, render_show_info};
use crate::widgets::WidgetId;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ServiceClient,
    pub dashboard: Dashboard,
    pub settings: DashSettingsStore,
    pub images: ImageCache,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        client: ServiceClient,
        dashboard: Dashboard,
        settings: DashSettingsStore,
        images: ImageCache,
    ) -> Self {
        Self {
            config,
            client,
            dashboard,
            settings,
            images,
        }
    }
}

/// Build the application router, mounted under the configured base path.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/status", get(status_handler))
        // Dashboard
        .route("/", get(ui::dashboard_page))
        .route("/dash/widget/{module_id}", get(widget_handler))
        .route("/dash/cancel", get(dash_cancel_handler))
        .route("/save_dash", get(save_dash_handler))
        // Artwork
        .route("/{service}/GetThumb", get(thumb_handler))
        .route("/img/no-cover-art.svg", get(no_cover_handler))
        // Show detail
        .route("/sickbeard/GetBanner/{tvdbid}", get(banner_handler))
        .route("/sickbeard/view/{tvdbid}", get(ui::show_page))
        .route("/sickbeard/show/{tvdbid}", get(show_handler))
        .route("/sickbeard/season/{tvdbid}/{season}", get(season_handler));

    let prefix = state.config.webdir.trim_end_matches('/').to_string();
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes).fallback(base_path_fallback)
    };

    app
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `/x/` when the app is nested at `/x`: send it to the nested root.
async fn base_path_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    if uri.path() == state.config.webdir {
        return Redirect::to(state.config.webdir.trim_end_matches('/')).into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub widgets: Vec<&'static str>,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "media-dashboard",
        version: env!("MDASH_VERSION"),
        git_sha: env!("MDASH_GIT_SHA"),
        widgets: state
            .dashboard
            .enabled()
            .iter()
            .map(|w| w.module_id())
            .collect(),
    })
}

// =============================================================================
// Dashboard handlers
// =============================================================================

/// GET /dash/widget/{module_id} - HTML fragment for one widget container
///
/// 204 when the widget decided to stay hidden, 404 for unknown or disabled
/// widgets, 502 when its service failed. The page ignores everything but 200.
pub async fn widget_handler(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Response {
    let Ok(widget) = module_id.parse::<WidgetId>() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.dashboard.load(widget).await {
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Ok(Some(view)) if view.is_hidden() => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(view)) => Html(render_widget(&view, widget.kind())).into_response(),
        Err(e) if e.is_upstream() => StatusCode::BAD_GATEWAY.into_response(),
        Err(e) => {
            tracing::error!("Widget {} failed: {}", widget, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct SaveDashQuery {
    #[serde(default)]
    pub dash_order: String,
}

/// GET /save_dash?dash_order= - Validate and persist the layout order
pub async fn save_dash_handler(
    State(state): State<AppState>,
    Query(query): Query<SaveDashQuery>,
) -> Response {
    let submitted = DashOrder::parse(&query.dash_order);
    let order = match replay_order(state.dashboard.enabled(), &submitted) {
        Ok(order) => order,
        Err(e) => {
            tracing::debug!("Rejected layout {:?}: {}", query.dash_order, e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.settings.set_dash_order(&order).await {
        Ok(()) => "Dashboard layout saved".into_response(),
        Err(e) => {
            tracing::error!("Failed to save dashboard layout: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save dashboard layout").into_response()
        }
    }
}

/// GET /dash/cancel - Leave edit mode without saving
pub async fn dash_cancel_handler(State(state): State<AppState>) -> Redirect {
    let order = state.settings.dash_order().await;
    let rows = LayoutBuilder::new(state.dashboard.enabled()).build(&order);
    let mut editor = LayoutEditor::new(rows, state.config.webdir.clone());
    editor.begin_edit();
    Redirect::to(&editor.cancel())
}

// =============================================================================
// Artwork handlers
// =============================================================================

#[derive(Deserialize)]
pub struct ThumbQuery {
    pub thumb: Option<String>,
    pub h: Option<String>,
    pub w: Option<String>,
    pub o: Option<String>,
    pub mode: Option<String>,
}

impl ThumbQuery {
    fn options(&self) -> ImageOptions {
        let dim = |v: &Option<String>| v.as_deref().and_then(|v| v.trim().parse::<u32>().ok());
        ImageOptions {
            height: dim(&self.h),
            width: dim(&self.w),
            opacity: self
                .o
                .as_deref()
                .and_then(|o| o.trim().parse::<f32>().ok())
                .map(|o| o.clamp(0.0, 100.0))
                .unwrap_or(100.0),
            mode: self.mode.as_deref().and_then(ColorMode::parse),
        }
    }
}

fn image_response(result: crate::error::Result<images::CachedImage>, what: &str) -> Response {
    match result {
        Ok(image) => Response::builder()
            .header(header::CONTENT_TYPE, image.content_type)
            .body(Body::from(image.bytes))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(e) if e.is_upstream() => {
            tracing::warn!("Failed to fetch {}: {}", what, e);
            StatusCode::BAD_GATEWAY.into_response()
        }
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", what, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /{service}/GetThumb?thumb=&h=&w=&o=&mode= - Artwork proxy
pub async fn thumb_handler(
    State(state): State<AppState>,
    Path(service): Path<String>,
    Query(query): Query<ThumbQuery>,
) -> Response {
    let Some(thumb) = query.thumb.as_deref().filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "thumb is required").into_response();
    };
    let url = match images::source_url(&state.config, &service, thumb) {
        Ok(url) => url,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let result = state.images.get(&url, Some(&service), query.options()).await;
    image_response(result, url.as_str())
}

/// GET /sickbeard/GetBanner/{tvdbid} - Show banner through the cache
pub async fn banner_handler(
    State(state): State<AppState>,
    Path(tvdbid): Path<String>,
) -> Response {
    let route = format!("GetBanner/{}", urlencoding::encode(&tvdbid));
    let url = match state.config.service_url("sickbeard", &route) {
        Ok(url) => url,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let result = state
        .images
        .get(&url, Some("sickbeard"), ImageOptions::default())
        .await;
    image_response(result, url.as_str())
}

/// GET /img/no-cover-art.svg - Placeholder artwork
pub async fn no_cover_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        images::placeholder_svg(300, 300),
    )
}

// =============================================================================
// Show detail handlers
// =============================================================================

fn show_error(e: DashError, upstream_message: &'static str) -> Response {
    match e {
        DashError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
        e => {
            tracing::warn!("{} {}", upstream_message, e);
            (StatusCode::BAD_GATEWAY, upstream_message).into_response()
        }
    }
}

/// GET /sickbeard/show/{tvdbid} - Show header and season tabs fragment
pub async fn show_handler(
    State(state): State<AppState>,
    Path(tvdbid): Path<String>,
) -> Response {
    match shows::get_show(&state.client, &tvdbid).await {
        Ok(show) => Html(render_show_info(&show, &tvdbid)).into_response(),
        Err(e) => show_error(e, "Error while loading show."),
    }
}

/// GET /sickbeard/season/{tvdbid}/{season} - Episode rows, latest first
pub async fn season_handler(
    State(state): State<AppState>,
    Path((tvdbid, season)): Path<(String, String)>,
) -> Response {
    let Ok(season) = season.trim().parse::<i64>() else {
        return (StatusCode::NOT_FOUND, SEASON_NOT_FOUND).into_response();
    };
    match shows::get_season(&state.client, &tvdbid, season).await {
        Ok(rows) => Html(render_season(rows)).into_response(),
        Err(e) => show_error(e, "Error while loading season."),
    }
}
