//! TV scheduler show detail: show header, season list and per-season
//! episode rows.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::client::ServiceClient;
use crate::error::{DashError, Result};
use crate::helpers::{status_label, StatusLabel};
use crate::widgets::lenient_string;

const SERVICE: &str = "sickbeard";

pub const SHOW_NOT_FOUND: &str = "Show not found.";
pub const SEASON_NOT_FOUND: &str = "This is not a valid season for this show";

/// `{"result": "success", "data": ...}` wrapper used by the scheduler API.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    result: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self, not_found: &str) -> Result<T> {
        match (self.result.as_str(), self.data) {
            ("success", Some(data)) => Ok(data),
            _ => Err(DashError::NotFound(not_found.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowDetail {
    #[serde(default)]
    pub show_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub airs: String,
    #[serde(default)]
    pub next_ep_airdate: String,
    #[serde(default)]
    pub season_list: Vec<i64>,
}

impl ShowDetail {
    pub fn status_label(&self) -> StatusLabel {
        status_label(&self.status)
    }

    pub fn next_air(&self) -> Option<&str> {
        Some(self.next_ep_airdate.as_str()).filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonEpisode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub airdate: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: Option<String>,
}

/// One row of the season table.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub number: i64,
    pub name: String,
    pub airdate: String,
    pub status: StatusLabel,
    pub quality: String,
}

/// Tab label of a season; season 0 holds the specials.
pub fn season_label(season: i64) -> String {
    if season == 0 {
        "Specials".to_string()
    } else {
        season.to_string()
    }
}

pub async fn get_show(client: &ServiceClient, tvdbid: &str) -> Result<ShowDetail> {
    let route = format!("GetShow?tvdbid={}", urlencoding::encode(tvdbid));
    let envelope: Option<Envelope<ShowDetail>> = client.get_json(SERVICE, &route).await?;
    envelope
        .ok_or_else(|| DashError::NotFound(SHOW_NOT_FOUND.to_string()))?
        .into_data(SHOW_NOT_FOUND)
}

pub async fn get_season(client: &ServiceClient, tvdbid: &str, season: i64) -> Result<Vec<EpisodeRow>> {
    let route = format!(
        "GetSeason?tvdbid={}&season={}",
        urlencoding::encode(tvdbid),
        season
    );
    let envelope: Option<Envelope<BTreeMap<String, SeasonEpisode>>> =
        client.get_json(SERVICE, &route).await?;
    let episodes = envelope
        .ok_or_else(|| DashError::NotFound(SEASON_NOT_FOUND.to_string()))?
        .into_data(SEASON_NOT_FOUND)?;
    Ok(episode_rows(episodes))
}

/// Season rows, latest episode first.
pub fn episode_rows(episodes: BTreeMap<String, SeasonEpisode>) -> Vec<EpisodeRow> {
    let mut rows: Vec<EpisodeRow> = episodes
        .into_iter()
        .filter_map(|(number, ep)| {
            let number = number.trim().parse::<i64>().ok()?;
            Some(EpisodeRow {
                number,
                status: status_label(&ep.status),
                name: ep.name,
                airdate: ep.airdate,
                quality: ep.quality.unwrap_or_default(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.number.cmp(&a.number));
    rows
}
