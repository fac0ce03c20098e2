use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::error::{DashboardError, Result};
use crate::time_utils::parse_date;

// ── Default extract names ─────────────────────────────────────────────────────

pub const DEFAULT_ORDERS_FILE: &str = "GMV_penjualan.csv";
pub const DEFAULT_PRODUCTS_FILE: &str = "product_orders.csv";
pub const DEFAULT_REVIEWS_FILE: &str = "review_orders.csv";
pub const DEFAULT_CUSTOMERS_FILE: &str = "customer_orders.csv";
pub const DEFAULT_SELLERS_FILE: &str = "seller_orders.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Date-range analytics dashboard for the Olist e-commerce extracts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "olist-dashboard",
    about = "Date-range analytics dashboard for the Olist e-commerce extracts",
    version
)]
pub struct Settings {
    /// Directory holding the five CSV extracts
    #[arg(long, env = "OLIST_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Orders/GMV extract (relative paths resolve against --data-dir)
    #[arg(long, default_value = DEFAULT_ORDERS_FILE)]
    pub orders_file: PathBuf,

    /// Product line-item extract
    #[arg(long, default_value = DEFAULT_PRODUCTS_FILE)]
    pub products_file: PathBuf,

    /// Review extract
    #[arg(long, default_value = DEFAULT_REVIEWS_FILE)]
    pub reviews_file: PathBuf,

    /// Customer location extract
    #[arg(long, default_value = DEFAULT_CUSTOMERS_FILE)]
    pub customers_file: PathBuf,

    /// Seller location extract
    #[arg(long, default_value = DEFAULT_SELLERS_FILE)]
    pub sellers_file: PathBuf,

    /// First day of the analysed range, YYYY-MM-DD (defaults to the earliest order)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day of the analysed range, YYYY-MM-DD (defaults to the latest order)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Output mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "json"])]
    pub view: String,

    /// Number of entries in best/worst rankings
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=50))]
    pub top: u16,

    /// Display theme
    #[arg(long, default_value = "dark", value_parser = ["light", "dark", "classic"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Resolved locations of the five extracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub orders: PathBuf,
    pub product_orders: PathBuf,
    pub review_orders: PathBuf,
    pub customer_orders: PathBuf,
    pub seller_orders: PathBuf,
}

impl DataPaths {
    /// The default file names inside `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            orders: dir.join(DEFAULT_ORDERS_FILE),
            product_orders: dir.join(DEFAULT_PRODUCTS_FILE),
            review_orders: dir.join(DEFAULT_REVIEWS_FILE),
            customer_orders: dir.join(DEFAULT_CUSTOMERS_FILE),
            seller_orders: dir.join(DEFAULT_SELLERS_FILE),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Resolve the five extract paths; absolute file arguments are kept as-is.
    pub fn data_paths(&self) -> DataPaths {
        let resolve = |file: &PathBuf| {
            if file.is_absolute() {
                file.clone()
            } else {
                self.data_dir.join(file)
            }
        };
        DataPaths {
            orders: resolve(&self.orders_file),
            product_orders: resolve(&self.products_file),
            review_orders: resolve(&self.reviews_file),
            customer_orders: resolve(&self.customers_file),
            seller_orders: resolve(&self.sellers_file),
        }
    }

    /// Parse `--start-date` / `--end-date` when given.
    pub fn date_overrides(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let start = self.start_date.as_deref().map(parse_date).transpose()?;
        let end = self.end_date.as_deref().map(parse_date).transpose()?;
        Ok((start, end))
    }

    /// Fail early when the data directory is needed but missing.
    ///
    /// Only checked when at least one extract path is relative to it.
    pub fn validate(&self) -> Result<()> {
        let uses_data_dir = [
            &self.orders_file,
            &self.products_file,
            &self.reviews_file,
            &self.customers_file,
            &self.sellers_file,
        ]
        .iter()
        .any(|f| !f.is_absolute());

        if uses_data_dir && !self.data_dir.is_dir() {
            return Err(DashboardError::Config(format!(
                "data directory {} does not exist (set --data-dir or OLIST_DATA_DIR)",
                self.data_dir.display()
            )));
        }
        Ok(())
    }

    /// `true` when the interactive terminal dashboard owns the screen.
    pub fn is_interactive(&self) -> bool {
        self.view == "dashboard"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
