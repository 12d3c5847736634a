//! Widget containers and the fragments loaded into them.

use dioxus::prelude::*;

use crate::helpers::StatusLabel;
use crate::widgets::{
    Bar, CarouselItem, Cell, CellContent, Inline, MediaItem, TableRow, WidgetId, WidgetKind,
    WidgetView,
};

const NBSP: &str = "\u{a0}";

#[derive(Props, Clone, PartialEq)]
pub struct WidgetModuleProps {
    pub widget: WidgetId,
    pub edit: bool,
}

/// Empty module shell placed by the layout; its content arrives as a
/// fragment from `dash/widget/{module_id}`.
#[component]
pub fn WidgetModule(props: WidgetModuleProps) -> Element {
    let widget = props.widget;
    let key = widget.refresh_key();
    let title = widget.title();

    rsx! {
        div {
            id: widget.module_id(),
            class: if props.edit { "dash-module dash-module-edit" } else { "dash-module" },
            draggable: if props.edit { "true" } else { "false" },
            style: "display:none;",
            "data-target": widget.target_id(),
            h3 {
                "{title}"
                if widget.has_refresh() {
                    span { class: "refresh-btns",
                        i {
                            id: "{key}-refresh",
                            class: "fa fa-refresh",
                            title: "Refresh",
                            "data-refresh": widget.module_id(),
                        }
                        i {
                            id: "{key}-spinner",
                            class: "fa fa-spinner fa-pulse",
                            style: "display:none;",
                        }
                    }
                }
            }
            {match widget.kind() {
                WidgetKind::Carousel => rsx! {
                    div { id: widget.target_id(), class: "carousel" }
                },
                WidgetKind::MediaList => rsx! {
                    ul { id: widget.target_id(), class: "media-list" }
                },
                WidgetKind::Table => rsx! {
                    table { class: "table table-striped",
                        tbody { id: widget.target_id() }
                    }
                },
            }}
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct WidgetContentProps {
    pub view: WidgetView,
    pub kind: WidgetKind,
}

/// Inner HTML for a widget's target container.
///
/// Table targets are a `tbody` and take bare rows; any other target gets
/// the placeholder wrapped in its own table.
#[component]
pub fn WidgetContent(props: WidgetContentProps) -> Element {
    match props.view {
        WidgetView::Hidden => rsx! {},
        WidgetView::Placeholder { message, colspan } => {
            let rows = WidgetView::placeholder_rows(&message, colspan);
            if props.kind == WidgetKind::Table {
                rsx! { TableRows { rows } }
            } else {
                rsx! {
                    table { class: "table table-striped",
                        tbody { TableRows { rows } }
                    }
                }
            }
        }
        WidgetView::Table(rows) => rsx! { TableRows { rows } },
        WidgetView::Carousel(items) => rsx! {
            for item in items {
                CarouselSlide { item }
            }
        },
        WidgetView::MediaList(items) => rsx! {
            for item in items {
                MediaEntry { item }
            }
        },
    }
}

#[derive(Props, Clone, PartialEq)]
struct TableRowsProps {
    rows: Vec<TableRow>,
}

#[component]
fn TableRows(props: TableRowsProps) -> Element {
    rsx! {
        for row in props.rows {
            tr {
                for cell in row.cells {
                    TableCell { cell }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct TableCellProps {
    cell: Cell,
}

#[component]
fn TableCell(props: TableCellProps) -> Element {
    let cell = props.cell;
    let colspan = cell.colspan.map(|c| c.to_string());

    rsx! {
        td {
            class: cell.class,
            title: cell.title,
            colspan,
            CellBody { content: cell.content }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct CellBodyProps {
    content: CellContent,
}

#[component]
fn CellBody(props: CellBodyProps) -> Element {
    match props.content {
        CellContent::Text(text) => rsx! { "{text}" },
        CellContent::Blank => rsx! { "{NBSP}" },
        CellContent::Small(text) => rsx! { small { "{text}" } },
        CellContent::Link { href, text } => rsx! { a { href, "{text}" } },
        CellContent::Status { failed, reason } => {
            if failed {
                rsx! { i { class: "fa fa-times", title: reason } }
            } else {
                rsx! { i { class: "fa fa-check" } }
            }
        }
        CellContent::Episode { code, overview } => rsx! {
            "{code}{NBSP}"
            i { class: "fa fa-info-circle", title: overview }
        },
        CellContent::Progress(bars) => rsx! { ProgressBar { bars } },
        CellContent::Split { left, right } => rsx! {
            div {
                div { class: "pull-left", InlineText { inline: left } }
                div { class: "pull-right", InlineText { inline: right } }
            }
        },
        CellContent::Label(label) => rsx! { LabelBadge { label } },
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct LabelBadgeProps {
    pub label: StatusLabel,
}

/// Colored status label, icon first.
#[component]
pub fn LabelBadge(props: LabelBadgeProps) -> Element {
    let label = props.label;
    rsx! {
        span { class: label.kind.css_class(),
            if let Some(icon) = label.icon {
                i { class: icon }
                " "
            }
            "{label.text}"
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct ProgressBarProps {
    bars: Vec<Bar>,
}

#[component]
fn ProgressBar(props: ProgressBarProps) -> Element {
    rsx! {
        div { class: "progress",
            for bar in props.bars {
                div {
                    class: bar.kind.css_class(),
                    style: "width:{bar.width}%",
                    title: bar.label.clone(),
                    span { class: "sr-only", "{bar.label}" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct InlineTextProps {
    inline: Inline,
}

#[component]
fn InlineText(props: InlineTextProps) -> Element {
    rsx! {
        if let Some(icon) = props.inline.icon {
            i { class: icon }
            " "
        }
        "{props.inline.text}"
    }
}

#[derive(Props, Clone, PartialEq)]
struct CarouselSlideProps {
    item: CarouselItem,
}

#[component]
fn CarouselSlide(props: CarouselSlideProps) -> Element {
    let item = props.item;
    rsx! {
        div { class: if item.stretched { "item stretched" } else { "item" },
            img { src: item.image, alt: item.title.clone() }
            a { class: "carousel-caption", href: item.link,
                h4 { "{item.title}" }
                for (label, value) in item.details {
                    p {
                        b { "{label}: " }
                        "{value}"
                    }
                }
                if let Some(plot) = item.plot {
                    p { "{plot}" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct MediaEntryProps {
    item: MediaItem,
}

#[component]
fn MediaEntry(props: MediaEntryProps) -> Element {
    let item = props.item;
    rsx! {
        li {
            a { href: item.link.clone(),
                img { src: item.image, alt: item.heading.clone() }
            }
            div {
                a { href: item.link.clone(),
                    strong { "{item.heading}" }
                }
                br {}
                small { "{item.subtitle}" }
            }
        }
    }
}

/// Render a widget view to the HTML fragment a container of `kind` receives.
pub fn render_widget(view: &WidgetView, kind: WidgetKind) -> String {
    dioxus::ssr::render_element(rsx! { WidgetContent { view: view.clone(), kind } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::status_label;
    use crate::widgets::BarKind;

    #[test]
    fn test_placeholder_renders_five_rows() {
        let html = render_widget(&WidgetView::placeholder("No wanted albums"), WidgetKind::Table);
        assert_eq!(html.matches("<tr>").count(), 5);
        assert!(html.contains("No wanted albums"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_carousel_placeholder_brings_its_own_table() {
        let widget = WidgetId::WantedAlbums;
        let shell = dioxus::ssr::render_element(rsx! {
            WidgetModule { widget, edit: false }
        });
        assert!(shell.contains(r#"<div id="headphones-carousel" class="carousel">"#));

        let ctx = crate::widgets::RenderContext::new("/");
        let view = crate::widgets::headphones::render_wanted(Some(vec![]), &ctx);
        let html = render_widget(&view, widget.kind());
        assert!(html.contains(r#"<table class="table table-striped"><tbody><tr>"#));
        assert!(html.find("<table") < html.find("<tr>"));
        assert!(html.contains("</tbody></table>"));
        assert_eq!(html.matches("<tr>").count(), 5);
        assert!(html.contains("No wanted albums"));
    }

    #[test]
    fn test_hidden_renders_nothing() {
        assert!(render_widget(&WidgetView::Hidden, WidgetKind::Table).trim().is_empty());
    }

    #[test]
    fn test_table_cells() {
        let view = WidgetView::Table(vec![TableRow::new(vec![
            Cell::text("a <b>").with_title("full"),
            Cell::new(CellContent::Status { failed: true, reason: Some("Repair failed".into()) }),
            Cell::new(CellContent::Small("4 more torrents".into())).with_colspan(2),
        ])]);
        let html = render_widget(&view, WidgetKind::Table);
        assert!(html.contains("a &lt;b&gt;"));
        assert!(html.contains(r#"title="full""#));
        assert!(html.contains(r#"class="fa fa-times""#));
        assert!(html.contains("Repair failed"));
        assert!(html.contains(r#"colspan="2""#));
        assert!(html.contains("<small>4 more torrents</small>"));
    }

    #[test]
    fn test_progress_widths() {
        let view = WidgetView::Table(vec![TableRow::new(vec![Cell::new(CellContent::Progress(
            vec![
                Bar { width: "42".into(), kind: BarKind::Primary, label: "Used: 400.5 MB".into() },
                Bar { width: "58".into(), kind: BarKind::Success, label: "Free: 553.1 MB".into() },
            ],
        ))])]);
        let html = render_widget(&view, WidgetKind::Table);
        assert!(html.contains("width:42%"));
        assert!(html.contains("width:58%"));
        assert!(html.contains("bar bar-success"));
        assert!(html.contains("Free: 553.1 MB"));
    }

    #[test]
    fn test_carousel_caption_link() {
        let view = WidgetView::Carousel(vec![CarouselItem {
            image: "/kodi/GetThumb?h=240&w=430&thumb=x".into(),
            title: "Heat (1995)".into(),
            link: "/kodi/#movies".into(),
            details: vec![("Runtime".into(), "2:50:00".into())],
            plot: Some("Robbers.".into()),
            stretched: false,
        }]);
        let html = render_widget(&view, WidgetKind::Carousel);
        assert!(html.contains(r#"class="carousel-caption""#));
        assert!(html.contains(r#"href="/kodi/#movies""#));
        assert!(html.contains("Heat (1995)"));
        assert!(html.contains("Robbers."));
    }

    #[test]
    fn test_label_cell() {
        let view = WidgetView::Table(vec![TableRow::new(vec![Cell::new(CellContent::Label(
            status_label("Downloaded"),
        ))])]);
        let html = render_widget(&view, WidgetKind::Table);
        assert!(html.contains("label label-success"));
        assert!(html.contains("fa fa-download"));
    }

    #[test]
    fn test_module_shell() {
        let html = dioxus::ssr::render_element(rsx! {
            WidgetModule { widget: WidgetId::SysInfo, edit: false }
        });
        assert!(html.contains(r#"id="dash_sysinfo""#));
        assert!(html.contains(r#"id="dash_sysinfo_table_body""#));
        assert!(html.contains(r#"id="sysinfo-refresh""#));
        assert!(html.contains(r#"id="sysinfo-spinner""#));
    }
}
