//! logview-tui: Terminal UI for logview
//!
//! This crate provides a Ratatui-based TUI using the Component pattern.
//! The viewer component draws what the navigation state machine in
//! `logview-core` exposes; the ingestion task feeds records in from the side.

pub mod action;
pub mod app;
pub mod clipboard;
pub mod components;
pub mod ingest;
pub mod keymap;
pub mod render;
pub mod theme;
pub mod tui;

pub use app::App;
