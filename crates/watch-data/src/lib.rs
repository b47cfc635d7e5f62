//! Data access for report-watch.
//!
//! Reads the published report documents from an HTTP server or a local
//! directory and turns them into [`watch_core::ReportSnapshot`]s.

pub mod loader;
pub mod source;

pub use loader::SnapshotLoader;
pub use source::{DirSource, DocumentSource, HttpSource, Source};
pub use watch_core as core;
