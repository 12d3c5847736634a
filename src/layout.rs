//! Dashboard layout: the persisted row order, placement of enabled widgets
//! into rows, and the edit-mode state machine.
//!
//! Wire format of a saved order: `a,b;c` (rows separated by `;`, widget
//! module ids by `,`). `"0"`, `"False"` and empty mean nothing was saved.

use std::fmt;

use crate::error::{DashError, Result};
use crate::widgets::WidgetId;

pub const MAX_WIDGETS_PER_ROW: usize = 3;

// =============================================================================
// Persisted order
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashOrder {
    rows: Vec<Vec<String>>,
}

impl DashOrder {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "0" || value == "False" {
            return Self::default();
        }

        let rows = value
            .split(';')
            .map(|row| {
                row.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: &[Row]) -> Self {
        Self {
            rows: rows
                .iter()
                .filter(|row| !row.widgets.is_empty())
                .map(|row| row.widgets.iter().map(|w| w.module_id().to_string()).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_unset(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for DashOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.rows.iter().map(|row| row.join(",")).collect();
        f.write_str(&rows.join(";"))
    }
}

// =============================================================================
// Placement
// =============================================================================

/// One dashboard row; `id` becomes the `dash-row-{id}` element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: usize,
    pub widgets: Vec<WidgetId>,
}

/// Places enabled widgets into rows.
///
/// Persisted rows come first, in their saved order. Anything enabled but not
/// placed is appended in new rows of up to [`MAX_WIDGETS_PER_ROW`]. Ids that
/// are unknown or not enabled are skipped, and rows left empty are dropped.
#[derive(Debug)]
pub struct LayoutBuilder {
    row_count: usize,
    remaining: Vec<WidgetId>,
    rows: Vec<Row>,
}

impl LayoutBuilder {
    pub fn new(enabled: &[WidgetId]) -> Self {
        Self {
            row_count: 0,
            remaining: enabled.to_vec(),
            rows: Vec::new(),
        }
    }

    fn new_row(&mut self) -> &mut Row {
        self.row_count += 1;
        self.rows.push(Row {
            id: self.row_count,
            widgets: Vec::new(),
        });
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Take `widget` out of the remaining set; false if it was not there.
    fn take(&mut self, widget: WidgetId) -> bool {
        match self.remaining.iter().position(|w| *w == widget) {
            Some(pos) => {
                self.remaining.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn build(mut self, order: &DashOrder) -> Vec<Row> {
        for saved in order.rows() {
            let mut placed = Vec::new();
            for id in saved {
                if placed.len() == MAX_WIDGETS_PER_ROW {
                    // left in `remaining`, auto-placed below
                    break;
                }
                let Ok(widget) = id.parse::<WidgetId>() else {
                    tracing::debug!("Skipping unknown widget {} in saved layout", id);
                    continue;
                };
                if self.take(widget) {
                    placed.push(widget);
                }
            }
            self.new_row().widgets = placed;
        }

        let leftovers = std::mem::take(&mut self.remaining);
        for chunk in leftovers.chunks(MAX_WIDGETS_PER_ROW) {
            self.new_row().widgets = chunk.to_vec();
        }

        self.rows.retain(|row| !row.widgets.is_empty());
        self.rows
    }
}

// =============================================================================
// Editing
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    View,
    Edit,
}

/// Edit-mode state machine over a set of rows.
#[derive(Debug)]
pub struct LayoutEditor {
    mode: EditMode,
    rows: Vec<Row>,
    row_count: usize,
    webdir: String,
}

impl LayoutEditor {
    pub fn new(rows: Vec<Row>, webdir: impl Into<String>) -> Self {
        let row_count = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            mode: EditMode::View,
            rows,
            row_count,
            webdir: webdir.into(),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn begin_edit(&mut self) {
        self.mode = EditMode::Edit;
    }

    fn require_edit(&self, op: &str) -> Result<()> {
        if self.mode != EditMode::Edit {
            return Err(DashError::InvalidLayout(format!("{} outside edit mode", op)));
        }
        Ok(())
    }

    /// Append an empty row, returning its id.
    pub fn add_row(&mut self) -> Result<usize> {
        self.require_edit("add_row")?;
        self.row_count += 1;
        self.rows.push(Row {
            id: self.row_count,
            widgets: Vec::new(),
        });
        Ok(self.row_count)
    }

    /// Drop `widget` into row `to_row` at `index` (clamped to the row end).
    ///
    /// A row that already holds [`MAX_WIDGETS_PER_ROW`] widgets refuses
    /// widgets from other rows; the widget then stays where it was.
    pub fn move_widget(&mut self, widget: WidgetId, to_row: usize, index: usize) -> Result<()> {
        self.require_edit("move_widget")?;

        let target = self
            .rows
            .iter()
            .position(|r| r.id == to_row)
            .ok_or_else(|| DashError::InvalidLayout(format!("no row {}", to_row)))?;
        let origin = self.rows.iter().position(|r| r.widgets.contains(&widget));

        if origin != Some(target) && self.rows[target].widgets.len() >= MAX_WIDGETS_PER_ROW {
            return Err(DashError::RowFull {
                row: to_row,
                max: MAX_WIDGETS_PER_ROW,
            });
        }

        if let Some(origin) = origin {
            self.rows[origin].widgets.retain(|w| *w != widget);
        }
        let widgets = &mut self.rows[target].widgets;
        let index = index.min(widgets.len());
        widgets.insert(index, widget);
        Ok(())
    }

    /// Leave edit mode keeping the current arrangement, minus empty rows.
    pub fn save(&mut self) -> Result<DashOrder> {
        self.require_edit("save")?;
        self.rows.retain(|row| !row.widgets.is_empty());
        self.mode = EditMode::View;
        Ok(DashOrder::from_rows(&self.rows))
    }

    /// Leave edit mode; returns where to navigate so the saved layout reloads.
    pub fn cancel(&mut self) -> String {
        self.mode = EditMode::View;
        self.webdir.clone()
    }
}

/// Check a layout submitted by the browser by replaying it through an
/// editor: ids that are unknown or not enabled are dropped, a row holding
/// more than [`MAX_WIDGETS_PER_ROW`] widgets is rejected.
pub fn replay_order(enabled: &[WidgetId], submitted: &DashOrder) -> Result<DashOrder> {
    let mut editor = LayoutEditor::new(Vec::new(), String::new());
    editor.begin_edit();

    for saved in submitted.rows() {
        let row = editor.add_row()?;
        for id in saved {
            let Ok(widget) = id.parse::<WidgetId>() else {
                tracing::debug!("Dropping unknown widget {} from submitted layout", id);
                continue;
            };
            if !enabled.contains(&widget) {
                tracing::debug!("Dropping disabled widget {} from submitted layout", id);
                continue;
            }
            editor.move_widget(widget, row, usize::MAX)?;
        }
    }

    editor.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetId::*;

    fn ids(rows: &[Row]) -> Vec<Vec<WidgetId>> {
        rows.iter().map(|r| r.widgets.clone()).collect()
    }

    #[test]
    fn test_unset_values() {
        for value in ["0", "False", "", "  ", ";;"] {
            assert!(DashOrder::parse(value).is_unset(), "{:?} should be unset", value);
        }
    }

    #[test]
    fn test_parse_ignores_empty_segments() {
        let order = DashOrder::parse("dash_sysinfo,dash_disks;;dash_qbit;");
        assert_eq!(
            order.rows(),
            &[
                vec!["dash_sysinfo".to_string(), "dash_disks".to_string()],
                vec!["dash_qbit".to_string()],
            ]
        );
        assert_eq!(order.to_string(), "dash_sysinfo,dash_disks;dash_qbit");
    }

    #[test]
    fn test_round_trip_rows() {
        let enabled = [RecentMovies, RecentShows, SysInfo];
        let rows = vec![
            Row { id: 1, widgets: vec![RecentMovies, RecentShows] },
            Row { id: 2, widgets: vec![SysInfo] },
        ];
        let saved = DashOrder::from_rows(&rows).to_string();
        assert_eq!(saved, "dash_rec_movies,dash_rec_shows;dash_sysinfo");

        let rebuilt = LayoutBuilder::new(&enabled).build(&DashOrder::parse(&saved));
        assert_eq!(ids(&rebuilt), ids(&rows));
    }

    #[test]
    fn test_unplaced_widgets_fill_new_rows_of_three() {
        let enabled = [SysInfo, Disks, Smart, Qbittorrent, RecentMovies];
        let rows = LayoutBuilder::new(&enabled).build(&DashOrder::parse("dash_qbit"));
        assert_eq!(
            ids(&rows),
            vec![vec![Qbittorrent], vec![SysInfo, Disks, Smart], vec![RecentMovies]]
        );
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unset_order_autofills() {
        let enabled = [SysInfo, Disks, Smart, Qbittorrent];
        let rows = LayoutBuilder::new(&enabled).build(&DashOrder::parse("0"));
        assert_eq!(ids(&rows), vec![vec![SysInfo, Disks, Smart], vec![Qbittorrent]]);
    }

    #[test]
    fn test_disabled_and_unknown_ids_skipped() {
        let enabled = [SysInfo];
        let rows =
            LayoutBuilder::new(&enabled).build(&DashOrder::parse("dash_weather,dash_disks;dash_sysinfo"));
        assert_eq!(ids(&rows), vec![vec![SysInfo]]);
        assert_eq!(rows[0].id, 2);
    }

    #[test]
    fn test_overfull_saved_row_spills() {
        let enabled = [SysInfo, Disks, Smart, Qbittorrent];
        let rows = LayoutBuilder::new(&enabled)
            .build(&DashOrder::parse("dash_sysinfo,dash_disks,dash_smart,dash_qbit"));
        assert_eq!(ids(&rows), vec![vec![SysInfo, Disks, Smart], vec![Qbittorrent]]);
    }

    #[test]
    fn test_nothing_enabled() {
        assert!(LayoutBuilder::new(&[]).build(&DashOrder::parse("dash_sysinfo")).is_empty());
    }

    fn editor() -> LayoutEditor {
        LayoutEditor::new(
            vec![
                Row { id: 1, widgets: vec![SysInfo, Disks, Smart] },
                Row { id: 2, widgets: vec![Qbittorrent] },
            ],
            "/htpc/",
        )
    }

    #[test]
    fn test_operations_require_edit_mode() {
        let mut editor = editor();
        assert!(matches!(editor.add_row(), Err(DashError::InvalidLayout(_))));
        assert!(editor.move_widget(SysInfo, 2, 0).is_err());
        assert!(editor.save().is_err());
    }

    #[test]
    fn test_drop_into_full_row_reverts() {
        let mut editor = editor();
        editor.begin_edit();
        let err = editor.move_widget(Qbittorrent, 1, 0).unwrap_err();
        assert!(matches!(err, DashError::RowFull { row: 1, max: 3 }));
        assert_eq!(
            ids(editor.rows()),
            vec![vec![SysInfo, Disks, Smart], vec![Qbittorrent]]
        );
        assert!(editor.rows().iter().all(|r| r.widgets.len() <= MAX_WIDGETS_PER_ROW));
    }

    #[test]
    fn test_reorder_within_full_row() {
        let mut editor = editor();
        editor.begin_edit();
        editor.move_widget(Smart, 1, 0).unwrap();
        assert_eq!(editor.rows()[0].widgets, vec![Smart, SysInfo, Disks]);
    }

    #[test]
    fn test_save_strips_empty_rows() {
        let mut editor = editor();
        editor.begin_edit();
        let new_row = editor.add_row().unwrap();
        assert_eq!(new_row, 3);
        editor.move_widget(Qbittorrent, new_row, 0).unwrap();
        editor.move_widget(Disks, new_row, 9).unwrap();

        let order = editor.save().unwrap();
        assert_eq!(editor.mode(), EditMode::View);
        assert_eq!(order.to_string(), "dash_sysinfo,dash_smart;dash_qbit,dash_disks");
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn test_cancel_returns_webdir() {
        let mut editor = editor();
        editor.begin_edit();
        assert_eq!(editor.cancel(), "/htpc/");
        assert_eq!(editor.mode(), EditMode::View);
    }

    #[test]
    fn test_move_into_unknown_row() {
        let mut editor = editor();
        editor.begin_edit();
        assert!(matches!(
            editor.move_widget(SysInfo, 42, 0),
            Err(DashError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_replay_drops_unknown_and_disabled() {
        let enabled = [SysInfo, Disks, Qbittorrent];
        let order = replay_order(
            &enabled,
            &DashOrder::parse("dash_weather,dash_disks;dash_smart;dash_qbit,dash_sysinfo;"),
        )
        .unwrap();
        assert_eq!(order.to_string(), "dash_disks;dash_qbit,dash_sysinfo");
    }

    #[test]
    fn test_replay_rejects_overfull_row() {
        let enabled = [SysInfo, Disks, Smart, Qbittorrent];
        let err = replay_order(
            &enabled,
            &DashOrder::parse("dash_sysinfo,dash_disks,dash_smart,dash_qbit"),
        )
        .unwrap_err();
        assert!(matches!(err, DashError::RowFull { row: 1, .. }));
    }
}
