//! Layout component wrapping all pages with Pico CSS and common elements.

use dioxus::prelude::*;

use super::nav::Nav;

/// Shared JavaScript utilities: escaping, base path and notifications.
const SHARED_JS: &str = r#"
function esc(s) { return String(s || '').replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'})[c]); }
const WEBDIR = document.documentElement.dataset.webdir || '/';
function notify(title, text, type) {
    let box = document.getElementById('notifications');
    if (!box) {
        box = document.createElement('div');
        box.id = 'notifications';
        document.body.appendChild(box);
    }
    const note = document.createElement('article');
    note.className = 'notification notification-' + (type || 'info');
    note.innerHTML = '<strong>' + esc(title) + '</strong><br>' + esc(text);
    box.appendChild(note);
    setTimeout(() => note.remove(), 4000);
}
"#;

/// CSS styles for the application (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
small { color: var(--pico-muted-color); }
/* Dashboard rows */
.dash-row { display: grid; grid-template-columns: repeat(3, minmax(0, 1fr)); gap: 1rem; margin-bottom: 1rem; min-height: 2rem; }
.dash-row-edit { outline: 2px dashed var(--pico-muted-border-color); padding: 0.5rem; }
.dash-module h3 { font-size: 1.1rem; display: flex; justify-content: space-between; align-items: center; }
.dash-module-edit { cursor: move; opacity: 0.85; }
.dash-module.dragging { opacity: 0.4; }
#editButtons { display: none; gap: 0.5rem; margin-bottom: 1rem; }
#editButtons button { margin: 0; }
.refresh-btns i { cursor: pointer; margin-left: 0.5rem; }
/* Tables */
.dash-module table { font-size: 0.85rem; margin: 0; }
.dash-module td { padding: 0.3rem 0.5rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; max-width: 14rem; }
.alignright { text-align: right; }
.aligncenter { text-align: center; }
.pull-left { float: left; }
.pull-right { float: right; }
/* Progress bars */
.progress { display: flex; height: 1.1rem; border-radius: 4px; overflow: hidden; background: var(--pico-muted-border-color); margin: 0; }
.progress .bar { background: var(--pico-primary-background); }
.progress .bar-warning { background: #f0ad4e; }
.progress .bar-success { background: #5cb85c; }
.sr-only { position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0,0,0,0); }
/* Labels */
.label { font-size: 0.75rem; padding: 0.1rem 0.4rem; border-radius: 3px; background: #999; color: #fff; }
.label-success { background: #468847; }
.label-info { background: #3a87ad; }
.label-important { background: #b94a48; }
.label-warning { background: #f89406; }
/* Carousels */
.carousel { display: flex; overflow-x: auto; scroll-snap-type: x mandatory; border-radius: 6px; }
.carousel .item { position: relative; flex: 0 0 100%; scroll-snap-align: start; }
.carousel .item img { width: 100%; height: 240px; object-fit: cover; display: block; }
.carousel .item.stretched img { height: auto; aspect-ratio: 1; }
.carousel-caption { position: absolute; left: 0; right: 0; bottom: 0; padding: 0.5rem 0.75rem; background: rgba(0,0,0,.65); color: #fff; text-decoration: none; }
.carousel-caption h4 { margin: 0; font-size: 1rem; color: #fff; }
.carousel-caption p { display: none; margin: 0.25rem 0 0; font-size: 0.8rem; }
.carousel .item:hover .carousel-caption p { display: block; }
/* Album list */
.media-list { list-style: none; padding: 0; margin: 0; }
.media-list li { display: flex; gap: 0.75rem; align-items: center; margin-bottom: 0.5rem; }
.media-list img { width: 45px; height: 45px; }
/* Notifications */
#notifications { position: fixed; top: 1rem; right: 1rem; z-index: 100; max-width: 22rem; }
#notifications article { margin-bottom: 0.5rem; padding: 0.75rem 1rem; }
.notification-error { border-left: 4px solid var(--pico-del-color); }
.notification-info { border-left: 4px solid var(--pico-primary); }
/* Show detail */
#banner { height: 140px; background-size: cover; background-position: center; border-radius: 6px; margin-bottom: 1rem; }
#season-list { display: flex; flex-wrap: wrap; gap: 0.5rem; list-style: none; padding: 0; }
#season-list li { list-style: none; }
#season-list li.active a { font-weight: bold; text-decoration: underline; }
"#;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Base path the dashboard is served under
    pub webdir: String,
    /// Page content
    pub children: Element,
    /// Optional additional scripts to include
    #[props(default)]
    pub scripts: Option<String>,
}

/// Main layout component wrapping all pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("MDASH_VERSION");

    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{props.title} - Media Dashboard" }
            link {
                rel: "stylesheet",
                href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css"
            }
            link {
                rel: "stylesheet",
                href: "https://cdn.jsdelivr.net/npm/font-awesome@4.7.0/css/font-awesome.min.css"
            }
            style { {CUSTOM_STYLES} }
            script { dangerous_inner_html: SHARED_JS }
        }
        body {
            header { class: "container",
                Nav { active: props.nav_active.clone(), webdir: props.webdir.clone() }
            }
            main { class: "container",
                {props.children}
            }
            footer { class: "container",
                small { "Media Dashboard v{version}" }
            }
            if let Some(scripts) = props.scripts {
                script { dangerous_inner_html: "{scripts}" }
            }
        }
    }
}
