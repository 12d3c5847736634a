//! Show detail page for the TV scheduler, plus the two fragments it loads:
//! show header with season tabs, and the episode rows of one season.

use dioxus::prelude::*;

use crate::shows::{season_label, EpisodeRow, ShowDetail};
use crate::ui::components::widget::{render_widget, LabelBadge};
use crate::ui::components::Layout;
use crate::widgets::{Cell, CellContent, TableRow, WidgetKind, WidgetView};

const SHOW_SCRIPT: &str = r#"
const title = document.querySelector('h1.page-title');
const showid = title.dataset.showid;
document.getElementById('banner').style.backgroundImage =
    'url(' + WEBDIR + 'sickbeard/GetBanner/' + encodeURIComponent(showid) + ')';

async function loadShow() {
    const info = document.getElementById('show-info');
    try {
        const r = await fetch(WEBDIR + 'sickbeard/show/' + encodeURIComponent(showid));
        const text = await r.text();
        info.removeAttribute('aria-busy');
        if (!r.ok) {
            info.innerHTML = '';
            notify('Error', text, 'error');
            return;
        }
        info.innerHTML = text;
        const name = info.querySelector('[data-show-name]');
        if (name) title.textContent = name.dataset.showName;
        const pills = info.querySelectorAll('#season-list a');
        pills.forEach(a => a.addEventListener('click', e => { e.preventDefault(); loadSeason(a); }));
        if (pills.length) loadSeason(pills[0]);
    } catch (e) {
        notify('Error', 'Error while loading show.', 'error');
    }
}

async function loadSeason(pill) {
    document.querySelectorAll('#season-list li').forEach(li => li.classList.remove('active'));
    pill.parentElement.classList.add('active');
    const content = document.getElementById('season-content');
    content.innerHTML = '';
    try {
        const r = await fetch(WEBDIR + 'sickbeard/season/' + encodeURIComponent(showid) + '/' + pill.dataset.season);
        const text = await r.text();
        if (!r.ok) {
            notify('Error', text, 'error');
            return;
        }
        content.innerHTML = text;
    } catch (e) {
        notify('Error', 'Error while loading season.', 'error');
    }
}

loadShow();
"#;

#[derive(Props, Clone, PartialEq)]
pub struct ShowPageProps {
    pub webdir: String,
    pub tvdbid: String,
}

/// Show detail page; everything below the title is filled in client-side.
#[component]
pub fn ShowPage(props: ShowPageProps) -> Element {
    rsx! {
        Layout {
            title: "Show".to_string(),
            nav_active: "show".to_string(),
            webdir: props.webdir.clone(),
            scripts: Some(SHOW_SCRIPT.to_string()),

            div { id: "banner" }
            h1 { class: "page-title", "data-showid": "{props.tvdbid}", "Show" }

            article { id: "show-info", aria_busy: "true" }

            table { class: "table table-striped",
                thead {
                    tr {
                        th { "#" }
                        th { "Name" }
                        th { "Airdate" }
                        th { "Status" }
                        th { "Quality" }
                    }
                }
                tbody { id: "season-content" }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ShowInfoProps {
    pub show: ShowDetail,
    pub tvdbid: String,
}

/// Show header table and one season tab per season, latest first as the
/// scheduler lists them.
#[component]
pub fn ShowInfo(props: ShowInfoProps) -> Element {
    let show = props.show;
    let status = show.status_label();
    let next_air = show.next_air().unwrap_or_default().to_string();
    let seasons: Vec<(i64, String)> = show
        .season_list
        .iter()
        .map(|s| (*s, season_label(*s)))
        .collect();

    rsx! {
        table { "data-show-name": "{show.show_name}",
            tbody {
                tr { th { "Status" } td { LabelBadge { label: status } } }
                tr { th { "Network" } td { "{show.network}" } }
                tr { th { "Location" } td { "{show.location}" } }
                tr { th { "Airs" } td { "{show.airs}" } }
                tr { th { "Next air" } td { "{next_air}" } }
            }
        }
        ul { id: "season-list",
            for (season, label) in seasons {
                li {
                    a {
                        href: "#{season}",
                        "data-season": "{season}",
                        "data-showid": "{props.tvdbid}",
                        "{label}"
                    }
                }
            }
        }
    }
}

pub fn render_show_info(show: &ShowDetail, tvdbid: &str) -> String {
    dioxus::ssr::render_element(rsx! {
        ShowInfo { show: show.clone(), tvdbid: tvdbid.to_string() }
    })
}

/// Episode rows of a season as table body HTML.
pub fn render_season(rows: Vec<EpisodeRow>) -> String {
    let rows = rows
        .into_iter()
        .map(|ep| {
            TableRow::new(vec![
                Cell::text(ep.number.to_string()),
                Cell::text(ep.name),
                Cell::text(ep.airdate),
                Cell::new(CellContent::Label(ep.status)),
                Cell::text(ep.quality),
            ])
        })
        .collect();
    render_widget(&WidgetView::Table(rows), WidgetKind::Table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::status_label;

    fn show() -> ShowDetail {
        ShowDetail {
            show_name: "The Expanse".to_string(),
            status: "Continuing".to_string(),
            network: "Amazon".to_string(),
            location: "/tv/The Expanse".to_string(),
            airs: "Friday 12:00 AM".to_string(),
            next_ep_airdate: "2021-12-10".to_string(),
            season_list: vec![6, 5, 0],
        }
    }

    #[test]
    fn test_show_info_seasons() {
        let html = render_show_info(&show(), "280619");
        assert!(html.contains(r#"data-show-name="The Expanse""#));
        assert!(html.contains("label label-success"));
        assert!(html.contains("2021-12-10"));
        assert!(html.contains(r##"href="#6""##));
        assert!(html.contains(r#"data-season="0""#));
        assert!(html.contains(">Specials</a>"));
        assert!(html.contains(r#"data-showid="280619""#));
    }

    #[test]
    fn test_season_rows() {
        let html = render_season(vec![
            EpisodeRow {
                number: 2,
                name: "The Big Empty".to_string(),
                airdate: "2015-12-15".to_string(),
                status: status_label("Skipped"),
                quality: String::new(),
            },
            EpisodeRow {
                number: 1,
                name: "Dulcinea".to_string(),
                airdate: "2015-12-14".to_string(),
                status: status_label("Downloaded"),
                quality: "HD".to_string(),
            },
        ]);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.find("The Big Empty") < html.find("Dulcinea"));
        assert!(html.contains("label label-warning"));
        assert!(html.contains("fa fa-fast-forward"));
    }

    #[test]
    fn test_page_skeleton() {
        let html = dioxus::ssr::render_element(rsx! {
            ShowPage { webdir: "/htpc/".to_string(), tvdbid: "280619".to_string() }
        });
        assert!(html.contains(r#"data-showid="280619""#));
        assert!(html.contains(r#"id="season-content""#));
        assert!(html.contains(r#"id="banner""#));
    }
}
