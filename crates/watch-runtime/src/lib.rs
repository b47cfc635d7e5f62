//! Refresh runtime for report-watch.
//!
//! Owns the timer-driven fetch loop and the snapshot cache, and hands
//! results to the UI layer over channels.

pub mod data_manager;
pub mod orchestrator;

pub use watch_core as core;
pub use watch_data as data;
