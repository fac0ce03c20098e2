//! Terminal UI layer for the Olist dashboard.
//!
//! Provides themes, the header, metric cards, ranking bars and the point map,
//! the four dashboard pages, and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod pages;
pub mod themes;

pub use dashboard_core as core;
