//! Dashboard widgets: identifiers, the render model and the loader registry.
//!
//! Every widget is bound to one service route. A loader issues exactly one
//! GET for its route, decodes the JSON into typed payloads and hands them to
//! a pure render function producing a [`WidgetView`]. Rendering to HTML is
//! done by the UI layer.
//!
//! Which widgets exist on the page is decided by configuration
//! (`widgets = [...]`), validated once at startup against the registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::client::ServiceClient;
use crate::error::{DashError, Result};
use crate::helpers::StatusLabel;

/// Implements [`Loader`] for a unit struct: fetch the widget's route, decode
/// into `$payload` and render with `$render`.
///
/// ```ignore
/// json_loader!(RecentMovies, MoviesPayload, render_movies);
/// ```
macro_rules! json_loader {
    ($loader:ident, $payload:ty, $render:expr) => {
        pub struct $loader;

        #[async_trait::async_trait]
        impl $crate::widgets::Loader for $loader {
            async fn load(
                &self,
                widget: $crate::widgets::WidgetId,
                client: &$crate::client::ServiceClient,
                ctx: &$crate::widgets::RenderContext,
            ) -> $crate::error::Result<$crate::widgets::WidgetView> {
                let data: Option<$payload> = client.get_json(widget.service(), widget.route()).await?;
                Ok(($render)(data, ctx))
            }
        }
    };
}

pub mod downloads;
pub mod headphones;
pub mod library;
pub mod schedulers;
pub mod stats;

/// Rows shown by table widgets.
pub const MAX_TABLE_ROWS: usize = 5;
/// Slides shown by carousel widgets.
pub const MAX_CAROUSEL_ITEMS: usize = 5;
/// Entries shown by the album media list.
pub const MAX_MEDIA_ITEMS: usize = 4;
/// Rows in a placeholder block (message + blanks).
pub const PLACEHOLDER_ROWS: usize = 5;

// =============================================================================
// Widget identifiers
// =============================================================================

/// How a widget's container is laid out on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Carousel,
    MediaList,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetId {
    WantedAlbums,
    RecentMovies,
    RecentShows,
    RecentAlbums,
    RecentMoviesPlex,
    RecentShowsPlex,
    RecentAlbumsPlex,
    SabnzbdHistory,
    NzbgetHistory,
    WantedMovies,
    NextAiredSickbeard,
    SonarrCalendar,
    NextAiredSickrage,
    SysInfo,
    Disks,
    Smart,
    Qbittorrent,
}

impl WidgetId {
    pub const ALL: [WidgetId; 17] = [
        WidgetId::WantedAlbums,
        WidgetId::RecentMovies,
        WidgetId::RecentShows,
        WidgetId::RecentAlbums,
        WidgetId::RecentMoviesPlex,
        WidgetId::RecentShowsPlex,
        WidgetId::RecentAlbumsPlex,
        WidgetId::SabnzbdHistory,
        WidgetId::NzbgetHistory,
        WidgetId::WantedMovies,
        WidgetId::NextAiredSickbeard,
        WidgetId::SonarrCalendar,
        WidgetId::NextAiredSickrage,
        WidgetId::SysInfo,
        WidgetId::Disks,
        WidgetId::Smart,
        WidgetId::Qbittorrent,
    ];

    /// Identifier used in the layout order and as the module element id.
    pub fn module_id(self) -> &'static str {
        match self {
            WidgetId::WantedAlbums => "dash_wanted_albums",
            WidgetId::RecentMovies => "dash_rec_movies",
            WidgetId::RecentShows => "dash_rec_shows",
            WidgetId::RecentAlbums => "dash_rec_music",
            WidgetId::RecentMoviesPlex => "dash_rec_movies_plex",
            WidgetId::RecentShowsPlex => "dash_rec_shows_plex",
            WidgetId::RecentAlbumsPlex => "dash_rec_music_plex",
            WidgetId::SabnzbdHistory => "dash_sabnzbd",
            WidgetId::NzbgetHistory => "dash_nzbget",
            WidgetId::WantedMovies => "dash_couchpotato",
            WidgetId::NextAiredSickbeard => "dash_sickbeard",
            WidgetId::SonarrCalendar => "dash_sonarr",
            WidgetId::NextAiredSickrage => "dash_sickrage",
            WidgetId::SysInfo => "dash_sysinfo",
            WidgetId::Disks => "dash_disks",
            WidgetId::Smart => "dash_smart",
            WidgetId::Qbittorrent => "dash_qbit",
        }
    }

    /// Id of the element the rendered content goes into.
    pub fn target_id(self) -> &'static str {
        match self {
            WidgetId::WantedAlbums => "headphones-carousel",
            WidgetId::RecentMovies => "movie-carousel",
            WidgetId::RecentShows => "tvshow-carousel",
            WidgetId::RecentAlbums => "music-carousel",
            WidgetId::RecentMoviesPlex => "movie-carousel-plex",
            WidgetId::RecentShowsPlex => "tvshow-carousel-plex",
            WidgetId::RecentAlbumsPlex => "albums-content-plex",
            WidgetId::SabnzbdHistory => "downloads_table_body",
            WidgetId::NzbgetHistory => "nzbgetdownloads_table_body",
            WidgetId::WantedMovies => "wantedmovies_table_body",
            WidgetId::NextAiredSickbeard => "nextaired_sickbeard_table_body",
            WidgetId::SonarrCalendar => "calendar_table_body",
            WidgetId::NextAiredSickrage => "nextaired_sickrage_table_body",
            WidgetId::SysInfo => "dash_sysinfo_table_body",
            WidgetId::Disks => "dash_disks_table_body",
            WidgetId::Smart => "dash_smart_table_body",
            WidgetId::Qbittorrent => "dash_qbit_table_body",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WidgetId::WantedAlbums => "Wanted Albums",
            WidgetId::RecentMovies | WidgetId::RecentMoviesPlex => "Recently Added Movies",
            WidgetId::RecentShows | WidgetId::RecentShowsPlex => "Recently Added Episodes",
            WidgetId::RecentAlbums | WidgetId::RecentAlbumsPlex => "Recently Added Albums",
            WidgetId::SabnzbdHistory | WidgetId::NzbgetHistory => "Latest Downloads",
            WidgetId::WantedMovies => "Wanted Movies",
            WidgetId::NextAiredSickbeard
            | WidgetId::SonarrCalendar
            | WidgetId::NextAiredSickrage => "Next Aired",
            WidgetId::SysInfo => "System",
            WidgetId::Disks => "Disks",
            WidgetId::Smart => "S.M.A.R.T",
            WidgetId::Qbittorrent => "Active Torrents",
        }
    }

    /// Upstream service the widget reads from.
    pub fn service(self) -> &'static str {
        match self {
            WidgetId::WantedAlbums => "headphones",
            WidgetId::RecentMovies | WidgetId::RecentShows | WidgetId::RecentAlbums => "kodi",
            WidgetId::RecentMoviesPlex | WidgetId::RecentShowsPlex | WidgetId::RecentAlbumsPlex => {
                "plex"
            }
            WidgetId::SabnzbdHistory => "sabnzbd",
            WidgetId::NzbgetHistory => "nzbget",
            WidgetId::WantedMovies => "couchpotato",
            WidgetId::NextAiredSickbeard => "sickbeard",
            WidgetId::SonarrCalendar => "sonarr",
            WidgetId::NextAiredSickrage => "sickrage",
            WidgetId::SysInfo | WidgetId::Disks | WidgetId::Smart => "stats",
            WidgetId::Qbittorrent => "qbittorrent",
        }
    }

    /// Route relative to the service base.
    pub fn route(self) -> &'static str {
        match self {
            WidgetId::WantedAlbums => "GetWantedList",
            WidgetId::RecentMovies | WidgetId::RecentMoviesPlex => "GetRecentMovies",
            WidgetId::RecentShows | WidgetId::RecentShowsPlex => "GetRecentShows",
            WidgetId::RecentAlbums => "GetRecentAlbums/5",
            WidgetId::RecentAlbumsPlex => "GetRecentAlbums",
            WidgetId::SabnzbdHistory => "GetHistory?limit=5",
            WidgetId::NzbgetHistory => "GetHistory",
            WidgetId::WantedMovies => "GetMovieList/active/5",
            WidgetId::NextAiredSickbeard | WidgetId::NextAiredSickrage => "GetNextAired",
            WidgetId::SonarrCalendar => "Calendar",
            WidgetId::SysInfo => "sysinfodash",
            WidgetId::Disks => "disk_usage",
            WidgetId::Smart => "smart_info",
            WidgetId::Qbittorrent => "fetch",
        }
    }

    pub fn kind(self) -> WidgetKind {
        match self {
            WidgetId::WantedAlbums
            | WidgetId::RecentMovies
            | WidgetId::RecentShows
            | WidgetId::RecentAlbums
            | WidgetId::RecentMoviesPlex
            | WidgetId::RecentShowsPlex => WidgetKind::Carousel,
            WidgetId::RecentAlbumsPlex => WidgetKind::MediaList,
            _ => WidgetKind::Table,
        }
    }

    /// Widgets with a manual refresh control and busy spinner.
    pub fn has_refresh(self) -> bool {
        matches!(
            self,
            WidgetId::SysInfo | WidgetId::Disks | WidgetId::Smart | WidgetId::Qbittorrent
        )
    }

    /// Short name used for the refresh/spinner element ids (`sysinfo-refresh`).
    pub fn refresh_key(self) -> &'static str {
        self.module_id().trim_start_matches("dash_")
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_id())
    }
}

impl FromStr for WidgetId {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        WidgetId::ALL
            .iter()
            .copied()
            .find(|w| w.module_id() == s)
            .ok_or_else(|| DashError::UnknownWidget(s.to_string()))
    }
}

// =============================================================================
// Render model
// =============================================================================

/// What a loader produced for its container.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// Nothing to show; the container stays hidden.
    Hidden,
    /// Fixed-height "no data" block.
    Placeholder { message: String, colspan: u8 },
    Carousel(Vec<CarouselItem>),
    MediaList(Vec<MediaItem>),
    Table(Vec<TableRow>),
}

impl WidgetView {
    pub fn placeholder(message: impl Into<String>) -> Self {
        WidgetView::Placeholder {
            message: message.into(),
            colspan: 1,
        }
    }

    /// Table rows a placeholder expands to: the message, then blank rows.
    pub fn placeholder_rows(message: &str, colspan: u8) -> Vec<TableRow> {
        let mut rows = Vec::with_capacity(PLACEHOLDER_ROWS);
        rows.push(TableRow::new(vec![Cell::text(message).with_colspan(colspan)]));
        for _ in 1..PLACEHOLDER_ROWS {
            rows.push(TableRow::new(vec![Cell::blank().with_colspan(colspan)]));
        }
        rows
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, WidgetView::Hidden)
    }
}

/// One carousel slide.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselItem {
    pub image: String,
    pub title: String,
    /// Where clicking the caption goes
    pub link: String,
    /// Label/value pairs revealed on hover
    pub details: Vec<(String, String)>,
    pub plot: Option<String>,
    /// Square artwork stretched to fill the slide
    pub stretched: bool,
}

/// One entry of the album media list.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub image: String,
    pub heading: String,
    pub subtitle: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub class: Option<String>,
    pub title: Option<String>,
    pub colspan: Option<u8>,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            class: None,
            title: None,
            colspan: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(CellContent::Text(text.into()))
    }

    pub fn blank() -> Self {
        Self::new(CellContent::Blank)
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_colspan(mut self, colspan: u8) -> Self {
        if colspan > 1 {
            self.colspan = Some(colspan);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    /// Non-breaking space keeping the row height
    Blank,
    Small(String),
    Link { href: String, text: String },
    /// Check mark, or a cross titled with the failure reason
    Status { failed: bool, reason: Option<String> },
    /// `S01E02` with an info icon carrying the overview
    Episode { code: String, overview: String },
    Progress(Vec<Bar>),
    Split { left: Inline, right: Inline },
    Label(StatusLabel),
}

/// One segment of a stacked progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// CSS width value without the `%`
    pub width: String,
    pub kind: BarKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Primary,
    Warning,
    Success,
}

impl BarKind {
    pub fn css_class(self) -> &'static str {
        match self {
            BarKind::Primary => "bar",
            BarKind::Warning => "bar bar-warning",
            BarKind::Success => "bar bar-success",
        }
    }
}

/// Text with an optional leading icon.
#[derive(Debug, Clone, PartialEq)]
pub struct Inline {
    pub icon: Option<&'static str>,
    pub text: String,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            icon: None,
            text: text.into(),
        }
    }

    pub fn with_icon(icon: &'static str, text: impl Into<String>) -> Self {
        Self {
            icon: Some(icon),
            text: text.into(),
        }
    }
}

// =============================================================================
// Render context
// =============================================================================

/// Inputs renderers need besides the payload.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Base path of this dashboard (`/` or `/x/`)
    pub webdir: String,
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(webdir: impl Into<String>) -> Self {
        Self {
            webdir: webdir.into(),
            now: Utc::now(),
        }
    }

    pub fn path(&self, path: &str) -> String {
        format!("{}{}", self.webdir, path.trim_start_matches('/'))
    }

    /// Artwork URL through the per-service thumbnail proxy.
    pub fn thumb(&self, service: &str, thumb: &str, height: u32, width: u32) -> String {
        self.path(&format!(
            "{}/GetThumb?h={}&w={}&thumb={}",
            service,
            height,
            width,
            urlencoding::encode(thumb)
        ))
    }

    /// Bundled artwork used when an item has none.
    pub fn no_cover(&self) -> String {
        self.path("img/no-cover-art.svg")
    }

    /// Proxied artwork, or the bundled placeholder when the item has none.
    pub fn artwork(&self, service: &str, thumb: Option<&str>, height: u32, width: u32) -> String {
        match present(thumb) {
            Some(thumb) => self.thumb(service, thumb, height, width),
            None => self.no_cover(),
        }
    }
}

// =============================================================================
// Payload helpers
// =============================================================================

/// Accept a string, number or null where services disagree on the type
/// (years, ids, temperatures).
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Treat `null`, empty and the literal `"None"` as missing.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "None")
}

// =============================================================================
// Loaders
// =============================================================================

/// Fetches one widget's data and renders it.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(
        &self,
        widget: WidgetId,
        client: &ServiceClient,
        ctx: &RenderContext,
    ) -> Result<WidgetView>;
}

/// Explicit mapping from widget to loader.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<WidgetId, Arc<dyn Loader>>,
}

impl LoaderRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with a loader for every known widget.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(WidgetId::WantedAlbums, headphones::WantedAlbums);
        registry.register(WidgetId::RecentMovies, library::KodiMovies);
        registry.register(WidgetId::RecentShows, library::KodiShows);
        registry.register(WidgetId::RecentAlbums, library::KodiAlbums);
        registry.register(WidgetId::RecentMoviesPlex, library::PlexMovies);
        registry.register(WidgetId::RecentShowsPlex, library::PlexShows);
        registry.register(WidgetId::RecentAlbumsPlex, library::PlexAlbums);
        registry.register(WidgetId::SabnzbdHistory, downloads::SabnzbdHistory);
        registry.register(WidgetId::NzbgetHistory, downloads::NzbgetHistory);
        registry.register(WidgetId::Qbittorrent, downloads::QbitTransfers);
        registry.register(WidgetId::WantedMovies, schedulers::WantedMovies);
        registry.register(WidgetId::NextAiredSickbeard, schedulers::SickbeardNextAired);
        registry.register(WidgetId::SonarrCalendar, schedulers::SonarrCalendar);
        registry.register(WidgetId::NextAiredSickrage, schedulers::SickrageNextAired);
        registry.register(WidgetId::SysInfo, stats::SysInfo);
        registry.register(WidgetId::Disks, stats::DiskUsage);
        registry.register(WidgetId::Smart, stats::SmartInfo);
        registry
    }

    pub fn register(&mut self, widget: WidgetId, loader: impl Loader + 'static) {
        self.loaders.insert(widget, Arc::new(loader));
    }

    pub fn get(&self, widget: WidgetId) -> Option<Arc<dyn Loader>> {
        self.loaders.get(&widget).cloned()
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.loaders.contains_key(&widget)
    }

    /// Resolve configured module ids to widgets, failing on the first id
    /// that is unknown or has no loader. Duplicates keep their first position.
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<WidgetId>> {
        let mut widgets = Vec::with_capacity(ids.len());
        for id in ids {
            let widget: WidgetId = id.parse()?;
            if !self.contains(widget) {
                return Err(DashError::UnknownWidget(id.clone()));
            }
            if !widgets.contains(&widget) {
                widgets.push(widget);
            }
        }
        Ok(widgets)
    }
}
