//! Media Dashboard
//!
//! A self-hosted HTPC dashboard: widgets backed by media-management services
//! (media centers, downloaders, schedulers, system stats) arranged in
//! drag-and-drop rows.
//!
//! This library provides:
//! - Widget loaders rendering service JSON into HTML fragments
//! - Layout placement, editing and persistence
//! - Artwork proxy with an on-disk cache
//! - Show detail pages for the TV scheduler
//! - Web UI (Pico CSS, Dioxus SSR)

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod helpers;
pub mod images;
pub mod layout;
pub mod settings;
pub mod shows;
pub mod ui;
pub mod widgets;
