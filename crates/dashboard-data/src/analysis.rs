//! Range analysis pipeline.
//!
//! Filters every loaded table to the selected [`DateRange`], runs all eleven
//! aggregations and packages them with headline totals into a
//! [`DashboardSnapshot`] ready for the presentation layer.

use chrono::{NaiveDate, Utc};
use dashboard_core::models::{
    CategoryReview, CategorySales, CustomerOrderRecord, DailyOrders, LocationCount, OrderRecord,
    ProductOrderRecord, ReviewOrderRecord, RfmAverages, SellerOrderRecord, Timestamped,
};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{OrderTotals, SummaryAggregator};
use crate::filter::{filter_by_range, DateRange};
use crate::geo::{customer_geo_points, seller_geo_points, GeoPointSet};
use crate::rfm::{RfmAnalyzer, RfmTable};

// ── DashboardContext ──────────────────────────────────────────────────────────

/// The five loaded tables, each sorted by purchase timestamp.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    pub orders: Vec<OrderRecord>,
    pub product_orders: Vec<ProductOrderRecord>,
    pub review_orders: Vec<ReviewOrderRecord>,
    pub customer_orders: Vec<CustomerOrderRecord>,
    pub seller_orders: Vec<SellerOrderRecord>,
}

impl DashboardContext {
    /// Earliest and latest purchase date of the orders table.
    ///
    /// The tables are sorted, so these are the first and last rows.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.orders.first()?.purchase_date();
        let last = self.orders.last()?.purchase_date();
        Some((first, last))
    }

    /// The full orders span, or `None` when no orders were loaded.
    pub fn full_range(&self) -> Option<DateRange> {
        self.date_bounds()
            .map(|(start, end)| DateRange::new(start, end))
    }
}

// ── Snapshot types ────────────────────────────────────────────────────────────

/// How many rows of each table survived the range filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilteredCounts {
    pub orders: usize,
    pub product_orders: usize,
    pub review_orders: usize,
    pub customer_orders: usize,
    pub seller_orders: usize,
}

impl FilteredCounts {
    pub fn total(&self) -> usize {
        self.orders
            + self.product_orders
            + self.review_orders
            + self.customer_orders
            + self.seller_orders
    }
}

/// Metadata produced alongside a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMetadata {
    /// ISO-8601 timestamp when this snapshot was generated.
    pub generated_at: String,
    pub range: DateRange,
    pub filtered_rows: FilteredCounts,
    /// Wall-clock seconds spent filtering.
    pub filter_time_seconds: f64,
    /// Wall-clock seconds spent aggregating.
    pub aggregate_time_seconds: f64,
}

/// Every summary for one date range.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub metadata: SnapshotMetadata,
    pub totals: OrderTotals,
    pub daily_orders: Vec<DailyOrders>,
    pub product_sales: Vec<CategorySales>,
    pub product_reviews: Vec<CategoryReview>,
    #[serde(serialize_with = "columns::customer_states")]
    pub customers_by_state: Vec<LocationCount>,
    #[serde(serialize_with = "columns::customer_cities")]
    pub customers_by_city: Vec<LocationCount>,
    #[serde(serialize_with = "columns::seller_states")]
    pub sellers_by_state: Vec<LocationCount>,
    #[serde(serialize_with = "columns::seller_cities")]
    pub sellers_by_city: Vec<LocationCount>,
    pub customer_points: GeoPointSet<CustomerOrderRecord>,
    pub seller_points: GeoPointSet<SellerOrderRecord>,
    pub customer_rfm: RfmTable,
    pub seller_rfm: RfmTable,
    pub customer_rfm_averages: RfmAverages,
    pub seller_rfm_averages: RfmAverages,
}

impl DashboardSnapshot {
    /// `true` when the range selected no rows from any table.
    ///
    /// This is a valid state; every summary is simply empty.
    pub fn is_empty(&self) -> bool {
        self.metadata.filtered_rows.total() == 0
    }
}

/// Exported column names of the four location tables.
mod columns {
    use dashboard_core::models::{LocationColumns, LocationCount};
    use serde::{Serialize, Serializer};

    fn named<S: Serializer>(
        rows: &[LocationCount],
        location: &'static str,
        count: &'static str,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        LocationColumns {
            rows,
            location,
            count,
        }
        .serialize(serializer)
    }

    pub fn customer_states<S: Serializer>(rows: &[LocationCount], s: S) -> Result<S::Ok, S::Error> {
        named(rows, "state", "customer_count", s)
    }

    pub fn customer_cities<S: Serializer>(rows: &[LocationCount], s: S) -> Result<S::Ok, S::Error> {
        named(rows, "city", "customer_count", s)
    }

    pub fn seller_states<S: Serializer>(rows: &[LocationCount], s: S) -> Result<S::Ok, S::Error> {
        named(rows, "state", "seller_count", s)
    }

    pub fn seller_cities<S: Serializer>(rows: &[LocationCount], s: S) -> Result<S::Ok, S::Error> {
        named(rows, "city", "seller_count", s)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full filter + aggregate pipeline for `range`.
///
/// 1. Filter each loaded table to `range` (inclusive, by purchase date).
/// 2. Run the eleven aggregations over the filtered tables.
/// 3. Derive headline totals and RFM averages.
pub fn analyze_range(ctx: &DashboardContext, range: DateRange) -> DashboardSnapshot {
    // ── Step 1: Filter ────────────────────────────────────────────────────────
    let filter_start = std::time::Instant::now();
    let orders = filter_by_range(&ctx.orders, &range);
    let product_orders = filter_by_range(&ctx.product_orders, &range);
    let review_orders = filter_by_range(&ctx.review_orders, &range);
    let customer_orders = filter_by_range(&ctx.customer_orders, &range);
    let seller_orders = filter_by_range(&ctx.seller_orders, &range);
    let filter_time = filter_start.elapsed().as_secs_f64();

    let filtered_rows = FilteredCounts {
        orders: orders.len(),
        product_orders: product_orders.len(),
        review_orders: review_orders.len(),
        customer_orders: customer_orders.len(),
        seller_orders: seller_orders.len(),
    };

    // ── Step 2: Aggregate ─────────────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let daily_orders = SummaryAggregator::daily_orders(&orders);
    let product_sales = SummaryAggregator::product_sales(&product_orders);
    let product_reviews = SummaryAggregator::product_reviews(&review_orders);
    let customers_by_state = SummaryAggregator::customers_by_state(&customer_orders);
    let customers_by_city = SummaryAggregator::customers_by_city(&customer_orders);
    let sellers_by_state = SummaryAggregator::sellers_by_state(&seller_orders);
    let sellers_by_city = SummaryAggregator::sellers_by_city(&seller_orders);
    let customer_points = customer_geo_points(&customer_orders);
    let seller_points = seller_geo_points(&seller_orders);
    let customer_rfm = RfmAnalyzer::customer_rfm(&customer_orders);
    let seller_rfm = RfmAnalyzer::seller_rfm(&seller_orders);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    // ── Step 3: Derived figures ───────────────────────────────────────────────
    let totals = SummaryAggregator::calculate_totals(&daily_orders);
    let customer_rfm_averages = customer_rfm.averages();
    let seller_rfm_averages = seller_rfm.averages();

    debug!(
        "Analysed {} to {}: {} rows in range, {} days, {} categories ({:.3}s filter, {:.3}s aggregate)",
        range.start,
        range.end,
        filtered_rows.total(),
        daily_orders.len(),
        product_sales.len(),
        filter_time,
        aggregate_time,
    );

    DashboardSnapshot {
        metadata: SnapshotMetadata {
            generated_at: Utc::now().to_rfc3339(),
            range,
            filtered_rows,
            filter_time_seconds: filter_time,
            aggregate_time_seconds: aggregate_time,
        },
        totals,
        daily_orders,
        product_sales,
        product_reviews,
        customers_by_state,
        customers_by_city,
        sellers_by_state,
        sellers_by_city,
        customer_points,
        seller_points,
        customer_rfm,
        seller_rfm,
        customer_rfm_averages,
        seller_rfm_averages,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
