//! Recently added media from the media center (Kodi) and library server (Plex).
//!
//! Both services expose the same route names and close enough payloads that
//! one set of renderers serves both, parameterised by service name.

use serde::Deserialize;

use super::{
    lenient_string, present, CarouselItem, MediaItem, RenderContext, WidgetView,
    MAX_CAROUSEL_ITEMS, MAX_MEDIA_ITEMS,
};
use crate::helpers::parse_sec;

#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    pub runtime: Option<f64>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub plot: String,
    pub fanart: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoviesPayload {
    pub movies: Option<Vec<Movie>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub showtitle: String,
    #[serde(default)]
    pub label: String,
    pub runtime: Option<f64>,
    #[serde(default)]
    pub plot: String,
    pub thumbnail: Option<String>,
    pub fanart: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodesPayload {
    pub episodes: Option<Vec<Episode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    /// Kodi names the album `label`, Plex `title`
    #[serde(alias = "title", default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub artist: Artists,
    pub thumbnail: Option<String>,
}

/// Kodi sends a list of artists, Plex a single string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum Artists {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Artists {
    pub fn first(&self) -> &str {
        match self {
            Artists::None => "",
            Artists::One(name) => name,
            Artists::Many(names) => names.first().map(String::as_str).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumsPayload {
    pub albums: Option<Vec<Album>>,
    pub limits: Option<Limits>,
}

json_loader!(KodiMovies, MoviesPayload, |d, ctx| render_movies("kodi", d, ctx));
json_loader!(KodiShows, EpisodesPayload, |d, ctx| render_episodes("kodi", d, ctx));
json_loader!(KodiAlbums, AlbumsPayload, render_album_carousel);
json_loader!(PlexMovies, MoviesPayload, |d, ctx| render_movies("plex", d, ctx));
json_loader!(PlexShows, EpisodesPayload, |d, ctx| render_episodes("plex", d, ctx));
json_loader!(PlexAlbums, AlbumsPayload, render_album_list);

fn with_year(title: &str, year: Option<&str>) -> String {
    match present(year).filter(|y| *y != "0") {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

pub fn render_movies(
    service: &str,
    data: Option<MoviesPayload>,
    ctx: &RenderContext,
) -> WidgetView {
    let Some(movies) = data.and_then(|d| d.movies) else {
        return WidgetView::Hidden;
    };
    if movies.is_empty() {
        return WidgetView::Hidden;
    }

    let items = movies
        .iter()
        .take(MAX_CAROUSEL_ITEMS)
        .map(|movie| CarouselItem {
            image: ctx.artwork(service, movie.fanart.as_deref(), 240, 430),
            title: with_year(&movie.title, movie.year.as_deref()),
            link: ctx.path(&format!("{}/#movies", service)),
            details: vec![
                ("Runtime".to_string(), parse_sec(movie.runtime)),
                ("Genre".to_string(), movie.genre.join(", ")),
            ],
            plot: Some(movie.plot.clone()).filter(|p| !p.is_empty()),
            stretched: false,
        })
        .collect();

    WidgetView::Carousel(items)
}

pub fn render_episodes(
    service: &str,
    data: Option<EpisodesPayload>,
    ctx: &RenderContext,
) -> WidgetView {
    let Some(episodes) = data.and_then(|d| d.episodes) else {
        return WidgetView::Hidden;
    };
    if episodes.is_empty() {
        return WidgetView::Hidden;
    }

    let items = episodes
        .iter()
        .take(MAX_CAROUSEL_ITEMS)
        .map(|episode| {
            // Episode stills first, show fanart as a fallback
            let art = present(episode.thumbnail.as_deref()).or(episode.fanart.as_deref());
            CarouselItem {
                image: ctx.artwork(service, art, 240, 430),
                title: format!("{}: {}", episode.showtitle, episode.label),
                link: ctx.path(&format!("{}/#shows", service)),
                details: vec![("Runtime".to_string(), parse_sec(episode.runtime))],
                plot: Some(episode.plot.clone()).filter(|p| !p.is_empty()),
                stretched: false,
            }
        })
        .collect();

    WidgetView::Carousel(items)
}

/// Media-center albums as full-size square slides.
pub fn render_album_carousel(data: Option<AlbumsPayload>, ctx: &RenderContext) -> WidgetView {
    let Some(payload) = data else {
        return WidgetView::Hidden;
    };
    if payload.limits.as_ref().is_some_and(|l| l.total == 0) {
        return WidgetView::Hidden;
    }
    let albums = payload.albums.unwrap_or_default();
    if albums.is_empty() {
        return WidgetView::Hidden;
    }

    let items = albums
        .iter()
        .take(MAX_CAROUSEL_ITEMS)
        .map(|album| CarouselItem {
            image: ctx.artwork("kodi", album.thumbnail.as_deref(), 480, 480),
            title: with_year(&album.label, album.year.as_deref()),
            link: ctx.path("kodi/#music"),
            details: vec![("Artist".to_string(), album.artist.first().to_string())],
            plot: None,
            stretched: true,
        })
        .collect();

    WidgetView::Carousel(items)
}

/// Library-server albums as a compact list with small covers.
pub fn render_album_list(data: Option<AlbumsPayload>, ctx: &RenderContext) -> WidgetView {
    let albums = data.and_then(|d| d.albums).unwrap_or_default();
    if albums.is_empty() {
        return WidgetView::Hidden;
    }

    let items = albums
        .iter()
        .take(MAX_MEDIA_ITEMS)
        .map(|album| MediaItem {
            image: ctx.artwork("plex", album.thumbnail.as_deref(), 45, 45),
            heading: with_year(&album.label, album.year.as_deref()),
            subtitle: album.artist.first().to_string(),
            link: ctx.path("plex/#albums"),
        })
        .collect();

    WidgetView::MediaList(items)
}
