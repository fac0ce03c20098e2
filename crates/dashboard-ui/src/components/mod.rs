//! Reusable widgets shared by the dashboard pages.

pub mod header;
pub mod map;
pub mod metric;
pub mod ranking;
