//! Dashboard page component.
//!
//! Renders the row/module skeleton; each module pulls its own fragment from
//! `dash/widget/{module_id}` and stays hidden until something arrives.

use dioxus::prelude::*;

use crate::layout::Row;
use crate::ui::components::{Layout, WidgetModule};

/// Client-side JavaScript for the Dashboard page.
const DASHBOARD_SCRIPT: &str = r#"
const MAX_PER_ROW = 3;

async function loadModule(module) {
    const target = document.getElementById(module.dataset.target);
    if (!target) return;
    try {
        const r = await fetch(WEBDIR + 'dash/widget/' + module.id);
        if (r.status !== 200) return;
        target.innerHTML = await r.text();
        module.style.display = '';
    } catch (e) {
        console.warn('widget ' + module.id + ' failed:', e);
    }
}

async function refreshModule(btn) {
    const module = document.getElementById(btn.dataset.refresh);
    const spinner = document.getElementById(btn.id.replace(/-refresh$/, '-spinner'));
    const target = document.getElementById(module.dataset.target);
    btn.style.display = 'none';
    if (spinner) spinner.style.display = '';
    if (target) target.innerHTML = '';
    await loadModule(module);
    if (spinner) spinner.style.display = 'none';
    btn.style.display = '';
}

document.querySelectorAll('.dash-module').forEach(loadModule);
document.querySelectorAll('[data-refresh]').forEach(btn => {
    btn.addEventListener('click', () => refreshModule(btn));
});

// Edit mode
let editing = false;
let dragged = null;
let origin = null;

function rows() { return Array.from(document.querySelectorAll('#dash-content .dash-row')); }

function nextRowId() {
    return rows().reduce((max, r) => Math.max(max, parseInt(r.id.replace('dash-row-', ''), 10) || 0), 0) + 1;
}

function bindRow(row) {
    row.addEventListener('dragover', e => { if (editing) e.preventDefault(); });
    row.addEventListener('drop', e => {
        e.preventDefault();
        if (!editing || !dragged) return;
        if (row !== origin && row.querySelectorAll('.dash-module').length >= MAX_PER_ROW) {
            notify('Dashboard', 'Row is full (' + MAX_PER_ROW + ' widgets max)', 'error');
            return;
        }
        const after = Array.from(row.querySelectorAll('.dash-module'))
            .find(m => e.clientX < m.getBoundingClientRect().left + m.offsetWidth / 2);
        row.insertBefore(dragged, after || null);
    });
}

function bindModule(module) {
    module.addEventListener('dragstart', e => {
        if (!editing) { e.preventDefault(); return; }
        dragged = module;
        origin = module.parentElement;
        module.classList.add('dragging');
    });
    module.addEventListener('dragend', () => {
        module.classList.remove('dragging');
        dragged = null;
        origin = null;
    });
}

function beginEdit() {
    editing = true;
    document.getElementById('editButtons').style.display = 'flex';
    rows().forEach(r => r.classList.add('dash-row-edit'));
    document.querySelectorAll('.dash-module').forEach(m => {
        m.classList.add('dash-module-edit');
        m.setAttribute('draggable', 'true');
    });
}

function endEdit() {
    editing = false;
    document.getElementById('editButtons').style.display = 'none';
    rows().forEach(r => r.classList.remove('dash-row-edit'));
    document.querySelectorAll('.dash-module').forEach(m => {
        m.classList.remove('dash-module-edit');
        m.setAttribute('draggable', 'false');
    });
}

function addRow() {
    const row = document.createElement('div');
    row.id = 'dash-row-' + nextRowId();
    row.className = 'dash-row dash-row-edit';
    document.getElementById('dash-content').appendChild(row);
    bindRow(row);
}

function currentOrder() {
    return rows()
        .map(r => Array.from(r.querySelectorAll('.dash-module')).map(m => m.id).join(','))
        .filter(r => r.length > 0)
        .join(';');
}

async function saveLayout() {
    rows().filter(r => !r.querySelector('.dash-module')).forEach(r => r.remove());
    try {
        const r = await fetch(WEBDIR + 'save_dash?dash_order=' + encodeURIComponent(currentOrder()));
        const text = await r.text();
        if (r.ok) {
            notify('Dashboard', text, 'info');
            endEdit();
        } else {
            notify('Dashboard', text, 'error');
        }
    } catch (e) {
        notify('Dashboard', e.message, 'error');
    }
}

function cancelEdit() {
    window.location = WEBDIR + 'dash/cancel';
}

rows().forEach(bindRow);
document.querySelectorAll('.dash-module').forEach(bindModule);
document.getElementById('saveLayout').addEventListener('click', saveLayout);
document.getElementById('cancelLayout').addEventListener('click', cancelEdit);
document.getElementById('addRow').addEventListener('click', addRow);

if (document.getElementById('editButtons').dataset.edit === 'true' || window.location.hash === '#edit') beginEdit();
"#;

#[derive(Props, Clone, PartialEq)]
pub struct DashboardPageProps {
    pub webdir: String,
    pub rows: Vec<Row>,
    #[props(default)]
    pub edit: bool,
}

/// Dashboard page component.
#[component]
pub fn DashboardPage(props: DashboardPageProps) -> Element {
    let edit = props.edit;

    rsx! {
        Layout {
            title: "Dashboard".to_string(),
            nav_active: if edit { "edit".to_string() } else { "dashboard".to_string() },
            webdir: props.webdir.clone(),
            scripts: Some(DASHBOARD_SCRIPT.to_string()),

            div {
                id: "editButtons",
                style: if edit { "display:flex;" } else { "display:none;" },
                "data-edit": if edit { "true" } else { "false" },
                button { id: "saveLayout", "Save" }
                button { id: "cancelLayout", class: "secondary", "Cancel" }
                button { id: "addRow", class: "outline", "Add row" }
            }

            if props.rows.is_empty() {
                article { id: "notConfigured",
                    h3 { "No widgets enabled" }
                    p { "Add widget module ids to the " code { "widgets" } " list in the configuration." }
                }
            }

            div { id: "dash-content",
                for row in props.rows {
                    div {
                        id: "dash-row-{row.id}",
                        class: if edit { "dash-row dash-row-edit" } else { "dash-row" },
                        for widget in row.widgets {
                            WidgetModule { widget, edit }
                        }
                    }
                }
            }
        }
    }
}
