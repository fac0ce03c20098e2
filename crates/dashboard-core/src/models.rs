use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Order status that qualifies a row for RFM analysis.
pub const DELIVERED_STATUS: &str = "delivered";

/// A loaded row that carries a purchase timestamp and its post-sort position.
pub trait Timestamped {
    /// When the order was placed.
    fn purchase_timestamp(&self) -> NaiveDateTime;

    /// Stable 0-based index assigned after the load-time sort.
    fn row_index(&self) -> usize;

    /// Calendar day of [`Timestamped::purchase_timestamp`].
    fn purchase_date(&self) -> NaiveDate {
        self.purchase_timestamp().date()
    }
}

/// A row whose latitude/longitude can be turned into a point geometry.
pub trait Located {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    /// Human-readable identity used when reporting rejected rows.
    fn entity_label(&self) -> String;
}

macro_rules! impl_timestamped {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Timestamped for $ty {
                fn purchase_timestamp(&self) -> NaiveDateTime {
                    self.order_purchase_timestamp
                }

                fn row_index(&self) -> usize {
                    self.row_index
                }
            }
        )+
    };
}

// ── Input records ─────────────────────────────────────────────────────────────

/// One paid order line from the GMV extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub row_index: usize,
    pub order_id: String,
    pub customer_unique_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    /// Payment amount in BRL.
    pub payment_value: f64,
}

/// One order item joined with its English product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOrderRecord {
    pub row_index: usize,
    pub order_id: String,
    pub product_category_name_english: String,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
}

/// One order review joined with its product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOrderRecord {
    pub row_index: usize,
    pub order_id: String,
    pub product_category_name_english: String,
    /// Star rating, 1–5.
    pub review_score: u8,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
}

/// One order joined with the buying customer's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerOrderRecord {
    pub row_index: usize,
    pub order_id: String,
    pub customer_unique_id: String,
    pub customer_city: String,
    pub customer_state: String,
    pub geolocation_lat: Option<f64>,
    pub geolocation_lng: Option<f64>,
    pub order_status: String,
    pub payment_value: f64,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
}

/// One order item joined with the fulfilling seller's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerOrderRecord {
    pub row_index: usize,
    pub order_id: String,
    pub seller_id: String,
    pub seller_city: String,
    pub seller_state: String,
    pub geolocation_lat: Option<f64>,
    pub geolocation_lng: Option<f64>,
    pub order_status: String,
    pub payment_value: f64,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
}

impl_timestamped!(
    OrderRecord,
    ProductOrderRecord,
    ReviewOrderRecord,
    CustomerOrderRecord,
    SellerOrderRecord,
);

impl Located for CustomerOrderRecord {
    fn latitude(&self) -> Option<f64> {
        self.geolocation_lat
    }

    fn longitude(&self) -> Option<f64> {
        self.geolocation_lng
    }

    fn entity_label(&self) -> String {
        format!("customer {}", self.customer_unique_id)
    }
}

impl Located for SellerOrderRecord {
    fn latitude(&self) -> Option<f64> {
        self.geolocation_lat
    }

    fn longitude(&self) -> Option<f64> {
        self.geolocation_lng
    }

    fn entity_label(&self) -> String {
        format!("seller {}", self.seller_id)
    }
}

/// RFM rows are keyed on the delivered orders of either customers or sellers.
pub trait RfmSource: Timestamped {
    fn entity_id(&self) -> &str;
    fn order_id(&self) -> &str;
    fn order_status(&self) -> &str;
    fn payment_value(&self) -> f64;

    fn is_delivered(&self) -> bool {
        self.order_status() == DELIVERED_STATUS
    }
}

impl RfmSource for CustomerOrderRecord {
    fn entity_id(&self) -> &str {
        &self.customer_unique_id
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn order_status(&self) -> &str {
        &self.order_status
    }

    fn payment_value(&self) -> f64 {
        self.payment_value
    }
}

impl RfmSource for SellerOrderRecord {
    fn entity_id(&self) -> &str {
        &self.seller_id
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn order_status(&self) -> &str {
        &self.order_status
    }

    fn payment_value(&self) -> f64 {
        self.payment_value
    }
}

// ── Summary rows ──────────────────────────────────────────────────────────────

/// Orders and gross merchandise value for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    /// Distinct order ids purchased that day.
    pub order_count: u64,
    /// Sum of `payment_value` for that day's rows.
    #[serde(rename = "GMV")]
    pub gmv: f64,
}

/// Distinct order count for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub order_count: u64,
}

/// Mean review score for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReview {
    pub category: String,
    pub mean_score: f64,
}

/// Distinct entity count for one state or city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCount {
    /// The state code or city name.
    pub location: String,
    pub count: u64,
}

/// Recency / frequency / monetary scores for one customer or seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRow {
    /// `customer_unique_id` or `seller_id`.
    pub id: String,
    /// Distinct delivered orders.
    pub frequency: u64,
    /// Sum of delivered `payment_value`.
    pub monetary: f64,
    /// Days between the range's latest purchase date and this entity's latest
    /// delivered purchase date.
    pub recency: i64,
}

/// Mean recency / frequency / monetary over an RFM table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RfmAverages {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

// ── Table column names ────────────────────────────────────────────────────────

/// Serializes location counts under the column names of one specific table,
/// e.g. `{"state": "SP", "customer_count": 3}`.
pub struct LocationColumns<'a> {
    pub rows: &'a [LocationCount],
    /// `"state"` or `"city"`.
    pub location: &'static str,
    /// `"customer_count"` or `"seller_count"`.
    pub count: &'static str,
}

impl Serialize for LocationColumns<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&LocationEntry {
                row,
                location: self.location,
                count: self.count,
            })?;
        }
        seq.end()
    }
}

struct LocationEntry<'a> {
    row: &'a LocationCount,
    location: &'static str,
    count: &'static str,
}

impl Serialize for LocationEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.location, &self.row.location)?;
        map.serialize_entry(self.count, &self.row.count)?;
        map.end()
    }
}

/// Serializes RFM rows with the id under `id_column` (`customer_id` or
/// `seller_id`), followed by frequency, monetary and recency.
pub struct RfmColumns<'a> {
    pub rows: &'a [RfmRow],
    pub id_column: &'static str,
}

impl Serialize for RfmColumns<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&RfmEntry {
                row,
                id_column: self.id_column,
            })?;
        }
        seq.end()
    }
}

struct RfmEntry<'a> {
    row: &'a RfmRow,
    id_column: &'static str,
}

impl Serialize for RfmEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(self.id_column, &self.row.id)?;
        map.serialize_entry("frequency", &self.row.frequency)?;
        map.serialize_entry("monetary", &self.row.monetary)?;
        map.serialize_entry("recency", &self.row.recency)?;
        map.end()
    }
}

/// A source record paired with its point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature<T> {
    pub record: T,
    pub geometry: GeoPoint,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
