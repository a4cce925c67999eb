//! Terminal kiosk for campus visitor registration.
//!
//! The interactive mode (`kiosk run`) drives a [`visitor_pass::FormController`]
//! from a ratatui event loop; `kiosk register` runs the same controller once,
//! headless, for scripted or assisted registrations.

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod errors;
pub mod headless;
pub mod style;
pub mod tui;

/// Identity used for paths and logging.
pub struct Kiosk;

impl ::app::Application for Kiosk {
    const APP_ID: &'static str = "kiosk";
    // the TUI owns stdout
    const CONSOLE_LOG: bool = false;
}
