//! Download clients: usenet history (SABnzbd, NZBGet) and active torrents.

use serde::Deserialize;

use super::{Cell, CellContent, RenderContext, TableRow, WidgetView, MAX_TABLE_ROWS};
use crate::helpers::{bytes_to_speed, parse_sec};

/// qBittorrent reports this ETA for "never".
const QBIT_ETA_INFINITE: f64 = 8_640_000.0;

#[derive(Debug, Clone, Deserialize)]
pub struct SabSlot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    pub fail_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SabSlots {
    #[serde(default)]
    pub slots: Vec<SabSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SabHistory {
    pub history: Option<SabSlots>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NzbgetSlot {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "ParStatus", default)]
    pub par_status: String,
    pub fail_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Torrent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    pub eta: Option<f64>,
    /// Download rate in bytes per second
    pub dlspeed: Option<f64>,
}

json_loader!(SabnzbdHistory, SabHistory, render_sabnzbd);
json_loader!(NzbgetHistory, Vec<NzbgetSlot>, render_nzbget);
json_loader!(QbitTransfers, Vec<Torrent>, render_qbit);

fn history_row(name: &str, failed: bool, reason: Option<&str>) -> TableRow {
    TableRow::new(vec![
        Cell::text(name).with_title(name),
        Cell::new(CellContent::Status {
            failed,
            reason: if failed { reason.map(str::to_string) } else { None },
        }),
    ])
}

pub fn render_sabnzbd(data: Option<SabHistory>, _ctx: &RenderContext) -> WidgetView {
    let slots = data
        .and_then(|d| d.history)
        .map(|h| h.slots)
        .unwrap_or_default();
    if slots.is_empty() {
        return WidgetView::Hidden;
    }

    let rows = slots
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|slot| history_row(&slot.name, slot.status == "Failed", slot.fail_message.as_deref()))
        .collect();
    WidgetView::Table(rows)
}

pub fn render_nzbget(data: Option<Vec<NzbgetSlot>>, _ctx: &RenderContext) -> WidgetView {
    let slots = data.unwrap_or_default();
    if slots.is_empty() {
        return WidgetView::Table(vec![TableRow::new(vec![Cell::text("History is empty")])]);
    }

    let rows = slots
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|slot| {
            history_row(&slot.name, slot.par_status == "FAILURE", slot.fail_message.as_deref())
        })
        .collect();
    WidgetView::Table(rows)
}

fn format_eta(eta: Option<f64>) -> String {
    match eta {
        Some(eta) if eta >= QBIT_ETA_INFINITE => "\u{221e}".to_string(),
        Some(eta) => parse_sec(Some(eta)),
        None => String::new(),
    }
}

fn summary_row(text: String) -> TableRow {
    TableRow::new(vec![Cell::new(CellContent::Small(text))
        .with_class("span6 aligncenter")
        .with_colspan(2)])
}

/// Active (non-seeding) torrents. More than the row cap shows one row less
/// plus a "N more torrents" summary.
pub fn render_qbit(data: Option<Vec<Torrent>>, _ctx: &RenderContext) -> WidgetView {
    let downloads: Vec<&Torrent> = data
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|t| t.state != "uploading")
        .collect();

    if downloads.is_empty() {
        return WidgetView::Table(vec![summary_row("No active downloads".to_string())]);
    }

    let shown = if downloads.len() > MAX_TABLE_ROWS {
        MAX_TABLE_ROWS - 1
    } else {
        downloads.len()
    };

    let mut rows: Vec<TableRow> = downloads
        .iter()
        .take(shown)
        .map(|torrent| {
            let name = Cell::text(&torrent.name).with_class("span5 qbt_name");
            let name = match torrent.dlspeed {
                Some(speed) => name.with_title(bytes_to_speed(speed)),
                None => name,
            };
            TableRow::new(vec![
                name,
                Cell::text(format_eta(torrent.eta)).with_class("qbit_eta alignright"),
            ])
        })
        .collect();

    if downloads.len() > shown {
        rows.push(summary_row(format!("{} more torrents", downloads.len() - shown)));
    }

    WidgetView::Table(rows)
}
