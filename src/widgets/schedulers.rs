//! Movie and TV schedulers: wanted movies and upcoming episodes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{
    lenient_string, Cell, CellContent, RenderContext, TableRow, WidgetView, MAX_TABLE_ROWS,
};
use crate::helpers::{from_now, pad};

// =============================================================================
// CouchPotato
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MovieInfo {
    #[serde(default)]
    pub original_title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WantedMovie {
    pub info: Option<MovieInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieList {
    pub movies: Option<Vec<Option<WantedMovie>>>,
}

json_loader!(WantedMovies, MovieList, render_wanted_movies);

pub fn render_wanted_movies(data: Option<MovieList>, _ctx: &RenderContext) -> WidgetView {
    let movies: Vec<WantedMovie> = data
        .and_then(|d| d.movies)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect();

    if movies.is_empty() {
        return WidgetView::Placeholder {
            message: "No wanted movies found".to_string(),
            colspan: 2,
        };
    }

    let rows = movies
        .iter()
        .take(MAX_TABLE_ROWS)
        .filter_map(|movie| movie.info.as_ref())
        .map(|info| {
            TableRow::new(vec![
                Cell::text(&info.original_title),
                Cell::text(info.year.clone().unwrap_or_default()).with_class("alignright"),
            ])
        })
        .collect();
    WidgetView::Table(rows)
}

// =============================================================================
// SickBeard / SickRage
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AiringEpisode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tvdbid: Option<String>,
    #[serde(default)]
    pub show_name: String,
    #[serde(default)]
    pub ep_name: String,
    #[serde(default)]
    pub airdate: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextAiredData {
    #[serde(default)]
    pub missed: Vec<AiringEpisode>,
    #[serde(default)]
    pub today: Vec<AiringEpisode>,
    #[serde(default)]
    pub soon: Vec<AiringEpisode>,
    #[serde(default)]
    pub later: Vec<AiringEpisode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextAired {
    pub data: Option<NextAiredData>,
}

json_loader!(SickbeardNextAired, NextAired, render_sickbeard);
json_loader!(SickrageNextAired, NextAired, render_sickrage);

fn airing_rows<'a>(
    service: &str,
    episodes: impl Iterator<Item = &'a AiringEpisode>,
    ctx: &RenderContext,
) -> Vec<TableRow> {
    episodes
        .take(MAX_TABLE_ROWS)
        .map(|ep| {
            let href = ctx.path(&format!(
                "{}/view/{}",
                service,
                ep.tvdbid.as_deref().unwrap_or_default()
            ));
            TableRow::new(vec![
                Cell::new(CellContent::Link {
                    href,
                    text: ep.show_name.clone(),
                }),
                Cell::text(&ep.ep_name),
                Cell::text(&ep.airdate),
            ])
        })
        .collect()
}

/// Episodes airing today, then soon.
pub fn render_sickbeard(data: Option<NextAired>, ctx: &RenderContext) -> WidgetView {
    let Some(data) = data.and_then(|d| d.data).filter(|d| !d.soon.is_empty()) else {
        return WidgetView::placeholder("No future episodes found");
    };
    WidgetView::Table(airing_rows(
        "sickbeard",
        data.today.iter().chain(data.soon.iter()),
        ctx,
    ))
}

/// Missed episodes first, then today, soon and later.
pub fn render_sickrage(data: Option<NextAired>, ctx: &RenderContext) -> WidgetView {
    let Some(data) = data.and_then(|d| d.data) else {
        return WidgetView::placeholder("No connection with sickrage");
    };
    if data.missed.is_empty() && data.today.is_empty() && data.soon.is_empty() && data.later.is_empty()
    {
        return WidgetView::placeholder("No future/missing episodes found");
    }
    WidgetView::Table(airing_rows(
        "sickrage",
        data.missed
            .iter()
            .chain(data.today.iter())
            .chain(data.soon.iter())
            .chain(data.later.iter()),
        ctx,
    ))
}

// =============================================================================
// Sonarr
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tvdb_id: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub series_id: Option<String>,
    pub series: Option<Series>,
    #[serde(default)]
    pub season_number: i64,
    #[serde(default)]
    pub episode_number: i64,
    #[serde(default)]
    pub overview: String,
    pub air_date_utc: Option<DateTime<Utc>>,
}

json_loader!(SonarrCalendar, Vec<CalendarEntry>, render_calendar);

pub fn render_calendar(data: Option<Vec<CalendarEntry>>, ctx: &RenderContext) -> WidgetView {
    let entries = data.unwrap_or_default();
    let rows = entries
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|entry| {
            let (tvdb_id, title) = entry
                .series
                .as_ref()
                .map(|s| (s.tvdb_id.clone().unwrap_or_default(), s.title.clone()))
                .unwrap_or_default();
            let href = ctx.path(&format!(
                "sonarr/View/{}/{}#{}",
                entry.series_id.as_deref().unwrap_or_default(),
                tvdb_id,
                entry.season_number
            ));
            let aired = entry
                .air_date_utc
                .map(|when| from_now(when, ctx.now))
                .unwrap_or_default();

            TableRow::new(vec![
                Cell::new(CellContent::Link { href, text: title }),
                Cell::new(CellContent::Episode {
                    code: format!(
                        "S{}E{}",
                        pad(entry.season_number, 2),
                        pad(entry.episode_number, 2)
                    ),
                    overview: entry.overview.clone(),
                }),
                Cell::text(aired),
            ])
        })
        .collect();
    WidgetView::Table(rows)
}
