//! CSV loading for the five dashboard extracts.
//!
//! Each extract is read once, its two date-time columns are coerced, rows are
//! stable-sorted by purchase timestamp and given a 0-based `row_index`.
//! Any timestamp or numeric cell that fails to coerce aborts the load.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    CustomerOrderRecord, OrderRecord, ProductOrderRecord, ReviewOrderRecord, SellerOrderRecord,
};
use dashboard_core::settings::DataPaths;
use dashboard_core::time_utils::parse_timestamp;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::DashboardContext;

const PURCHASE_COLUMN: &str = "order_purchase_timestamp";
const DELIVERED_COLUMN: &str = "order_delivered_customer_date";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load all five extracts into a [`DashboardContext`].
pub fn load_context(paths: &DataPaths) -> Result<DashboardContext> {
    let start = Instant::now();
    let context = DashboardContext {
        orders: load_orders(&paths.orders)?,
        product_orders: load_product_orders(&paths.product_orders)?,
        review_orders: load_review_orders(&paths.review_orders)?,
        customer_orders: load_customer_orders(&paths.customer_orders)?,
        seller_orders: load_seller_orders(&paths.seller_orders)?,
    };
    info!(
        "Loaded {} orders, {} product lines, {} reviews, {} customer rows, {} seller rows in {:.2}s",
        context.orders.len(),
        context.product_orders.len(),
        context.review_orders.len(),
        context.customer_orders.len(),
        context.seller_orders.len(),
        start.elapsed().as_secs_f64(),
    );
    Ok(context)
}

/// Load the orders/GMV extract.
pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>> {
    load_table::<RawOrder>(path)
}

/// Load the product line-item extract.
pub fn load_product_orders(path: &Path) -> Result<Vec<ProductOrderRecord>> {
    load_table::<RawProductOrder>(path)
}

/// Load the review extract.
pub fn load_review_orders(path: &Path) -> Result<Vec<ReviewOrderRecord>> {
    load_table::<RawReviewOrder>(path)
}

/// Load the customer location extract.
pub fn load_customer_orders(path: &Path) -> Result<Vec<CustomerOrderRecord>> {
    load_table::<RawCustomerOrder>(path)
}

/// Load the seller location extract.
pub fn load_seller_orders(path: &Path) -> Result<Vec<SellerOrderRecord>> {
    load_table::<RawSellerOrder>(path)
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// Parsed date-time columns of one raw row.
struct RowTimestamps {
    purchase: NaiveDateTime,
    delivered: Option<NaiveDateTime>,
}

/// A CSV row as deserialized, before its date-time columns are coerced.
trait RawRow: DeserializeOwned {
    type Record;

    fn purchase_raw(&self) -> &str;
    fn delivered_raw(&self) -> Option<&str>;
    fn into_record(self, row_index: usize, ts: RowTimestamps) -> Self::Record;
}

#[derive(Debug, Deserialize)]
struct RawOrder {
    order_id: String,
    customer_unique_id: String,
    order_status: String,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
    payment_value: f64,
}

#[derive(Debug, Deserialize)]
struct RawProductOrder {
    order_id: String,
    product_category_name_english: String,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReviewOrder {
    order_id: String,
    product_category_name_english: String,
    review_score: u8,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCustomerOrder {
    order_id: String,
    customer_unique_id: String,
    customer_city: String,
    customer_state: String,
    #[serde(default)]
    geolocation_lat: Option<f64>,
    #[serde(default)]
    geolocation_lng: Option<f64>,
    order_status: String,
    payment_value: f64,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSellerOrder {
    order_id: String,
    seller_id: String,
    seller_city: String,
    seller_state: String,
    #[serde(default)]
    geolocation_lat: Option<f64>,
    #[serde(default)]
    geolocation_lng: Option<f64>,
    order_status: String,
    payment_value: f64,
    order_purchase_timestamp: String,
    #[serde(default)]
    order_delivered_customer_date: Option<String>,
}

macro_rules! raw_timestamps {
    () => {
        fn purchase_raw(&self) -> &str {
            &self.order_purchase_timestamp
        }

        fn delivered_raw(&self) -> Option<&str> {
            self.order_delivered_customer_date.as_deref()
        }
    };
}

impl RawRow for RawOrder {
    type Record = OrderRecord;
    raw_timestamps!();

    fn into_record(self, row_index: usize, ts: RowTimestamps) -> OrderRecord {
        OrderRecord {
            row_index,
            order_id: self.order_id,
            customer_unique_id: self.customer_unique_id,
            order_status: self.order_status,
            order_purchase_timestamp: ts.purchase,
            order_delivered_customer_date: ts.delivered,
            payment_value: self.payment_value,
        }
    }
}

impl RawRow for RawProductOrder {
    type Record = ProductOrderRecord;
    raw_timestamps!();

    fn into_record(self, row_index: usize, ts: RowTimestamps) -> ProductOrderRecord {
        ProductOrderRecord {
            row_index,
            order_id: self.order_id,
            product_category_name_english: self.product_category_name_english,
            order_purchase_timestamp: ts.purchase,
            order_delivered_customer_date: ts.delivered,
        }
    }
}

impl RawRow for RawReviewOrder {
    type Record = ReviewOrderRecord;
    raw_timestamps!();

    fn into_record(self, row_index: usize, ts: RowTimestamps) -> ReviewOrderRecord {
        ReviewOrderRecord {
            row_index,
            order_id: self.order_id,
            product_category_name_english: self.product_category_name_english,
            review_score: self.review_score,
            order_purchase_timestamp: ts.purchase,
            order_delivered_customer_date: ts.delivered,
        }
    }
}

impl RawRow for RawCustomerOrder {
    type Record = CustomerOrderRecord;
    raw_timestamps!();

    fn into_record(self, row_index: usize, ts: RowTimestamps) -> CustomerOrderRecord {
        CustomerOrderRecord {
            row_index,
            order_id: self.order_id,
            customer_unique_id: self.customer_unique_id,
            customer_city: self.customer_city,
            customer_state: self.customer_state,
            geolocation_lat: self.geolocation_lat,
            geolocation_lng: self.geolocation_lng,
            order_status: self.order_status,
            payment_value: self.payment_value,
            order_purchase_timestamp: ts.purchase,
            order_delivered_customer_date: ts.delivered,
        }
    }
}

impl RawRow for RawSellerOrder {
    type Record = SellerOrderRecord;
    raw_timestamps!();

    fn into_record(self, row_index: usize, ts: RowTimestamps) -> SellerOrderRecord {
        SellerOrderRecord {
            row_index,
            order_id: self.order_id,
            seller_id: self.seller_id,
            seller_city: self.seller_city,
            seller_state: self.seller_state,
            geolocation_lat: self.geolocation_lat,
            geolocation_lng: self.geolocation_lng,
            order_status: self.order_status,
            payment_value: self.payment_value,
            order_purchase_timestamp: ts.purchase,
            order_delivered_customer_date: ts.delivered,
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read, coerce, sort and index one extract.
fn load_table<R: RawRow>(path: &Path) -> Result<Vec<R::Record>> {
    let start = Instant::now();
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();

    let mut rows: Vec<(RowTimestamps, R)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: R = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(path, e))?;

        let purchase = parse_timestamp(raw.purchase_raw())
            .ok_or_else(|| timestamp_error(path, line, PURCHASE_COLUMN, raw.purchase_raw()))?;
        let delivered = match raw.delivered_raw() {
            Some(s) if !s.trim().is_empty() => Some(
                parse_timestamp(s).ok_or_else(|| timestamp_error(path, line, DELIVERED_COLUMN, s))?,
            ),
            _ => None,
        };

        rows.push((
            RowTimestamps {
                purchase,
                delivered,
            },
            raw,
        ));
    }

    // Stable: rows sharing a timestamp keep file order.
    rows.sort_by_key(|(ts, _)| ts.purchase);

    let records: Vec<R::Record> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (ts, raw))| raw.into_record(i, ts))
        .collect();

    debug!(
        "Loaded {} rows from {} in {:.3}s",
        records.len(),
        path.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(records)
}

fn csv_error(path: &Path, source: csv::Error) -> DashboardError {
    DashboardError::Csv {
        path: PathBuf::from(path),
        source,
    }
}

fn timestamp_error(path: &Path, line: u64, column: &'static str, value: &str) -> DashboardError {
    DashboardError::TimestampParse {
        path: PathBuf::from(path),
        line,
        column,
        value: value.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
