//! Shared types for the Olist dashboard: input records, summary rows, point
//! geometries, errors, CLI settings, and date/number helpers.

pub mod error;
pub mod formatting;
pub mod geo;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
