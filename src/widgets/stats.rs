//! Host statistics: system counters, disk usage and drive health.
//!
//! These three widgets own a refresh/spinner pair on the page; every load
//! rebuilds the whole table body.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{
    lenient_string, Bar, BarKind, Cell, CellContent, Inline, RenderContext, TableRow, WidgetView,
};
use crate::helpers::{percent, readable_file_size, readable_file_size_hdd};

// =============================================================================
// System
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CpuTimes {
    #[serde(default)]
    pub user: f64,
    #[serde(default)]
    pub system: f64,
    #[serde(default)]
    pub idle: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VirtualMemory {
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub available: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkCounters {
    #[serde(default)]
    pub bytes_recv: f64,
    #[serde(default)]
    pub bytes_sent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SysInfoPayload {
    pub cpu: Option<CpuTimes>,
    #[serde(rename = "virtual")]
    pub memory: Option<VirtualMemory>,
    pub localip: Option<String>,
    pub externalip: Option<String>,
    pub network: Option<NetworkCounters>,
}

json_loader!(SysInfo, SysInfoPayload, render_sysinfo);

fn labelled_row(label: &str, content: CellContent) -> TableRow {
    TableRow::new(vec![Cell::text(label), Cell::new(content).with_class("span4")])
}

fn cpu_bars(cpu: &CpuTimes) -> Vec<Bar> {
    vec![
        Bar {
            width: format!("{:.1}", cpu.user),
            kind: BarKind::Primary,
            label: format!("User: {:.1}%", cpu.user),
        },
        Bar {
            width: format!("{:.1}", cpu.system),
            kind: BarKind::Warning,
            label: format!("System: {:.1}%", cpu.system),
        },
        Bar {
            width: format!("{:.1}", 100.0 - (cpu.user + cpu.system)),
            kind: BarKind::Success,
            label: format!("Idle: {:.1}%", cpu.idle),
        },
    ]
}

fn memory_bars(mem: &VirtualMemory) -> Vec<Bar> {
    vec![
        Bar {
            width: percent(mem.percent),
            kind: BarKind::Primary,
            label: format!("Used: {}", readable_file_size(mem.total - mem.available)),
        },
        Bar {
            width: percent(100.0 - mem.percent),
            kind: BarKind::Success,
            label: format!("Free: {}", readable_file_size(mem.available)),
        },
    ]
}

pub fn render_sysinfo(data: Option<SysInfoPayload>, _ctx: &RenderContext) -> WidgetView {
    let Some(info) = data else {
        return WidgetView::Hidden;
    };

    let mut rows = Vec::new();
    if let Some(cpu) = &info.cpu {
        rows.push(labelled_row("CPU", CellContent::Progress(cpu_bars(cpu))));
    }
    if let Some(mem) = &info.memory {
        rows.push(labelled_row("MEM", CellContent::Progress(memory_bars(mem))));
    }
    if info.localip.is_some() || info.externalip.is_some() {
        rows.push(TableRow::new(vec![
            Cell::text("IP"),
            Cell::new(CellContent::Split {
                left: Inline::text(info.localip.clone().unwrap_or_default()),
                right: Inline::text(info.externalip.clone().unwrap_or_default()),
            }),
        ]));
    }
    if let Some(net) = &info.network {
        rows.push(TableRow::new(vec![
            Cell::text("Network"),
            Cell::new(CellContent::Split {
                left: Inline::with_icon("fa fa-arrow-down", readable_file_size(net.bytes_recv)),
                right: Inline::with_icon("fa fa-arrow-up", readable_file_size(net.bytes_sent)),
            }),
        ]));
    }

    if rows.is_empty() {
        WidgetView::Hidden
    } else {
        WidgetView::Table(rows)
    }
}

// =============================================================================
// Disks
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub mountpoint: String,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub free: f64,
}

json_loader!(DiskUsage, Vec<Disk>, render_disks);

pub fn render_disks(data: Option<Vec<Disk>>, _ctx: &RenderContext) -> WidgetView {
    let rows = data
        .unwrap_or_default()
        .iter()
        .map(|disk| {
            let bars = vec![
                Bar {
                    width: percent(disk.percent),
                    kind: BarKind::Primary,
                    label: readable_file_size_hdd(disk.used),
                },
                Bar {
                    width: percent(100.0 - disk.percent),
                    kind: BarKind::Success,
                    label: readable_file_size_hdd(disk.free),
                },
            ];
            TableRow::new(vec![
                Cell::text(&disk.mountpoint).with_class("stats_disk_mountpoint"),
                Cell::new(CellContent::Progress(bars)).with_class("stats_disk_progress span4"),
                Cell::text(format!("{}%", percent(disk.percent))).with_class("stats_disk_percent"),
            ])
        })
        .collect();
    WidgetView::Table(rows)
}

// =============================================================================
// S.M.A.R.T
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Drive {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub temperature: Option<String>,
    #[serde(default)]
    pub assessment: String,
}

/// Drives arrive either as a list or keyed by device.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Drives {
    List(Vec<Drive>),
    Map(BTreeMap<String, Drive>),
}

impl Drives {
    fn into_vec(self) -> Vec<Drive> {
        match self {
            Drives::List(drives) => drives,
            Drives::Map(drives) => drives.into_values().collect(),
        }
    }
}

json_loader!(SmartInfo, Drives, render_smart);

pub fn render_smart(data: Option<Drives>, _ctx: &RenderContext) -> WidgetView {
    let drives = data.map(Drives::into_vec).unwrap_or_default();
    if drives.is_empty() {
        return WidgetView::Table(vec![TableRow::new(vec![Cell::text(
            "S.M.A.R.T not correctly configured.",
        )])]);
    }

    let rows = drives
        .iter()
        .map(|drive| {
            TableRow::new(vec![
                Cell::text(&drive.name),
                Cell::text(&drive.model).with_class("span4"),
                Cell::text(format!(
                    "{}\u{b0}",
                    drive.temperature.as_deref().unwrap_or_default()
                )),
                Cell::text(&drive.assessment),
            ])
        })
        .collect();
    WidgetView::Table(rows)
}
