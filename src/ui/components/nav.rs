//! Navigation component for the web UI.

use dioxus::prelude::*;

/// Navigation links, relative to the base path.
const NAV_LINKS: &[(&str, &str, &str)] = &[
    ("dashboard", "Dashboard", ""),
    ("edit", "Edit layout", "?edit#edit"),
];

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "dashboard", "edit")
    pub active: String,
    pub webdir: String,
}

/// Navigation bar component.
#[component]
pub fn Nav(props: NavProps) -> Element {
    rsx! {
        nav {
            ul {
                li {
                    strong { "Media Dashboard" }
                }
            }
            ul {
                for (id, label, href) in NAV_LINKS.iter() {
                    li {
                        if *id == props.active.as_str() {
                            a {
                                href: "{props.webdir}{href}",
                                "aria-current": "page",
                                strong { "{label}" }
                            }
                        } else {
                            a {
                                href: "{props.webdir}{href}",
                                "{label}"
                            }
                        }
                    }
                }
            }
        }
    }
}
