//! Runtime layer for the Olist dashboard.
//!
//! Owns the loaded tables, memoises the last computed snapshot, and runs the
//! recompute loop that turns date-range changes into fresh snapshots for the
//! UI.

pub mod data_manager;
pub mod orchestrator;

pub use dashboard_core as core;
pub use dashboard_data as data;
