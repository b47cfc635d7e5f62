//! Core types for report-watch.
//!
//! Holds the report index parser, the derived statistics, the dashboard
//! state value, time and formatting helpers, settings, and the shared error
//! type. Nothing in this crate performs I/O beyond the settings file.

pub mod dashboard;
pub mod error;
pub mod formatting;
pub mod index_parser;
pub mod models;
pub mod settings;
pub mod stats;
pub mod time_utils;

pub use error::{Result, WatchError};
pub use index_parser::{parse_index, IndexParser};
pub use models::{ReportRecord, ReportSnapshot};
