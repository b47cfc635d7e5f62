//! Terminal UI layer for report-watch.
//!
//! Provides themes, the header, progress bar, report list and toast
//! components, markdown rendering for the latest report, the rendering
//! surfaces, and the main application event loop built on [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod markdown;
pub mod surface;
pub mod themes;

pub use watch_core as core;
