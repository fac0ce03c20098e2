//! Data layer for the Olist dashboard.
//!
//! Loads the five CSV extracts, filters them to a date range, and runs the
//! group-by summaries, RFM scoring and point projection that make up a
//! dashboard snapshot.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod geo;
pub mod reader;
pub mod rfm;

pub use dashboard_core as core;
