//! Recency / frequency / monetary scoring for customers and sellers.
//!
//! Only delivered orders are scored. Recency is measured in whole days from
//! the latest purchase date of the *whole* range-filtered table (any status)
//! back to the entity's latest delivered purchase date.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use dashboard_core::models::{
    CustomerOrderRecord, RfmAverages, RfmColumns, RfmRow, RfmSource, SellerOrderRecord,
    Timestamped,
};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Which entity an [`RfmTable`] is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfmEntity {
    Customer,
    Seller,
}

impl RfmEntity {
    /// Column the entity id is exported under.
    pub fn id_column(&self) -> &'static str {
        match self {
            RfmEntity::Customer => "customer_id",
            RfmEntity::Seller => "seller_id",
        }
    }
}

/// Scores for every entity with at least one delivered order in range.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmTable {
    pub entity: RfmEntity,
    /// Latest purchase date in the scored input, if it was non-empty.
    pub reference_date: Option<NaiveDate>,
    /// One row per entity, ordered by id.
    pub rows: Vec<RfmRow>,
}

impl RfmTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean recency, frequency and monetary over this table's own rows.
    ///
    /// Returns zeros for an empty table.
    pub fn averages(&self) -> RfmAverages {
        if self.rows.is_empty() {
            return RfmAverages::default();
        }
        let n = self.rows.len() as f64;
        let (recency, frequency, monetary) =
            self.rows.iter().fold((0.0, 0.0, 0.0), |(r, f, m), row| {
                (
                    r + row.recency as f64,
                    f + row.frequency as f64,
                    m + row.monetary,
                )
            });
        RfmAverages {
            recency: recency / n,
            frequency: frequency / n,
            monetary: monetary / n,
        }
    }

    /// The `n` most recent entities (smallest recency first).
    pub fn top_by_recency(&self, n: usize) -> Vec<RfmRow> {
        self.ranked(n, |a, b| a.recency.cmp(&b.recency))
    }

    /// The `n` entities with the most delivered orders.
    pub fn top_by_frequency(&self, n: usize) -> Vec<RfmRow> {
        self.ranked(n, |a, b| b.frequency.cmp(&a.frequency))
    }

    /// The `n` entities with the highest delivered payment total.
    pub fn top_by_monetary(&self, n: usize) -> Vec<RfmRow> {
        self.ranked(n, |a, b| {
            b.monetary
                .partial_cmp(&a.monetary)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    fn ranked(
        &self,
        n: usize,
        cmp: impl Fn(&RfmRow, &RfmRow) -> std::cmp::Ordering,
    ) -> Vec<RfmRow> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| cmp(a, b));
        rows.truncate(n);
        rows
    }
}

impl Serialize for RfmTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut table = serializer.serialize_struct("RfmTable", 3)?;
        table.serialize_field("entity", &self.entity)?;
        table.serialize_field("reference_date", &self.reference_date)?;
        table.serialize_field(
            "rows",
            &RfmColumns {
                rows: &self.rows,
                id_column: self.entity.id_column(),
            },
        )?;
        table.end()
    }
}

// ── RfmAnalyzer ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct EntityAccumulator<'a> {
    latest: Option<NaiveDate>,
    order_ids: HashSet<&'a str>,
    monetary: f64,
}

/// Stateless RFM scorer.
pub struct RfmAnalyzer;

impl RfmAnalyzer {
    /// Score customers on their delivered orders.
    pub fn customer_rfm(rows: &[CustomerOrderRecord]) -> RfmTable {
        Self::score(rows, RfmEntity::Customer)
    }

    /// Score sellers on their delivered orders.
    pub fn seller_rfm(rows: &[SellerOrderRecord]) -> RfmTable {
        Self::score(rows, RfmEntity::Seller)
    }

    fn score<T: RfmSource>(rows: &[T], entity: RfmEntity) -> RfmTable {
        // Reference date comes from every row, delivered or not.
        let reference_date = rows.iter().map(|r| r.purchase_date()).max();

        let mut entities: HashMap<&str, EntityAccumulator<'_>> = HashMap::new();
        for row in rows.iter().filter(|r| r.is_delivered()) {
            let acc = entities.entry(row.entity_id()).or_default();
            let date = row.purchase_date();
            acc.latest = Some(acc.latest.map_or(date, |d| d.max(date)));
            acc.order_ids.insert(row.order_id());
            acc.monetary += row.payment_value();
        }

        let mut scored: Vec<RfmRow> = match reference_date {
            Some(reference) => entities
                .into_iter()
                .filter_map(|(id, acc)| {
                    let latest = acc.latest?;
                    Some(RfmRow {
                        id: id.to_string(),
                        frequency: acc.order_ids.len() as u64,
                        monetary: acc.monetary,
                        recency: (reference - latest).num_days(),
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        scored.sort_by(|a, b| a.id.cmp(&b.id));

        RfmTable {
            entity,
            reference_date,
            rows: scored,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn customer(id: &str, order: &str, status: &str, when: &str, pay: f64) -> CustomerOrderRecord {
        CustomerOrderRecord {
            row_index: 0,
            order_id: order.to_string(),
            customer_unique_id: id.to_string(),
            customer_city: "sao paulo".to_string(),
            customer_state: "SP".to_string(),
            geolocation_lat: None,
            geolocation_lng: None,
            order_status: status.to_string(),
            payment_value: pay,
            order_purchase_timestamp: ts(when),
            order_delivered_customer_date: None,
        }
    }

    fn seller(id: &str, order: &str, status: &str, when: &str, pay: f64) -> SellerOrderRecord {
        SellerOrderRecord {
            row_index: 0,
            order_id: order.to_string(),
            seller_id: id.to_string(),
            seller_city: "curitiba".to_string(),
            seller_state: "PR".to_string(),
            geolocation_lat: None,
            geolocation_lng: None,
            order_status: status.to_string(),
            payment_value: pay,
            order_purchase_timestamp: ts(when),
            order_delivered_customer_date: None,
        }
    }

    #[test]
    fn test_customer_rfm_scores() {
        let rows = vec![
            customer("c1", "o1", "delivered", "2021-01-01 10:00:00", 100.0),
            customer("c1", "o2", "delivered", "2021-01-05 10:00:00", 50.0),
            customer("c2", "o3", "delivered", "2021-01-03 23:00:00", 20.0),
        ];
        let table = RfmAnalyzer::customer_rfm(&rows);

        assert_eq!(table.entity, RfmEntity::Customer);
        assert_eq!(table.rows.len(), 2);
        let c1 = &table.rows[0];
        assert_eq!(c1.id, "c1");
        assert_eq!(c1.frequency, 2);
        assert!((c1.monetary - 150.0).abs() < 1e-9);
        assert_eq!(c1.recency, 0);
        assert_eq!(table.rows[1].recency, 2);
    }

    #[test]
    fn test_recency_measured_from_latest_order_of_any_status() {
        let rows = vec![
            customer("c1", "o1", "delivered", "2021-01-01 10:00:00", 10.0),
            customer("c2", "o2", "canceled", "2021-01-11 10:00:00", 10.0),
        ];
        let table = RfmAnalyzer::customer_rfm(&rows);

        assert_eq!(table.reference_date, NaiveDate::from_ymd_opt(2021, 1, 11));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].recency, 10);
    }

    #[test]
    fn test_entity_without_delivered_orders_is_absent() {
        let rows = vec![
            customer("c1", "o1", "delivered", "2021-01-01 10:00:00", 10.0),
            customer("c2", "o2", "shipped", "2021-01-02 10:00:00", 10.0),
            customer("c2", "o3", "canceled", "2021-01-03 10:00:00", 10.0),
        ];
        let table = RfmAnalyzer::customer_rfm(&rows);

        assert!(table.rows.iter().all(|r| r.id != "c2"));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_recency_never_negative() {
        let rows = vec![
            seller("s1", "o1", "delivered", "2021-01-01 10:00:00", 10.0),
            seller("s2", "o2", "delivered", "2021-02-10 10:00:00", 10.0),
            seller("s3", "o3", "invoiced", "2021-03-01 10:00:00", 10.0),
            seller("s3", "o4", "delivered", "2021-01-20 10:00:00", 10.0),
        ];
        let table = RfmAnalyzer::seller_rfm(&rows);
        assert!(table.rows.iter().all(|r| r.recency >= 0));
    }

    #[test]
    fn test_seller_frequency_counts_distinct_orders() {
        // Two line items of the same order for one seller.
        let rows = vec![
            seller("s1", "o1", "delivered", "2021-01-01 10:00:00", 30.0),
            seller("s1", "o1", "delivered", "2021-01-01 10:00:00", 30.0),
            seller("s1", "o2", "delivered", "2021-01-04 10:00:00", 15.0),
        ];
        let table = RfmAnalyzer::seller_rfm(&rows);

        assert_eq!(table.entity, RfmEntity::Seller);
        assert_eq!(table.rows[0].frequency, 2);
        assert!((table.rows[0].monetary - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = RfmAnalyzer::customer_rfm(&[]);
        assert!(table.is_empty());
        assert!(table.reference_date.is_none());
        assert_eq!(table.averages(), RfmAverages::default());
    }

    #[test]
    fn test_averages_use_own_rows() {
        let customers = vec![
            customer("c1", "o1", "delivered", "2021-01-01 10:00:00", 100.0),
            customer("c2", "o2", "delivered", "2021-01-03 10:00:00", 300.0),
        ];
        let sellers = vec![seller("s1", "o1", "delivered", "2021-01-03 10:00:00", 40.0)];

        let c = RfmAnalyzer::customer_rfm(&customers).averages();
        let s = RfmAnalyzer::seller_rfm(&sellers).averages();

        assert!((c.monetary - 200.0).abs() < 1e-9);
        assert!((c.recency - 1.0).abs() < 1e-9);
        assert!((c.frequency - 1.0).abs() < 1e-9);
        assert!((s.monetary - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_rankings() {
        let rows = vec![
            customer("c1", "o1", "delivered", "2021-01-01 10:00:00", 500.0),
            customer("c2", "o2", "delivered", "2021-01-10 10:00:00", 10.0),
            customer("c2", "o3", "delivered", "2021-01-09 10:00:00", 10.0),
            customer("c3", "o4", "delivered", "2021-01-05 10:00:00", 70.0),
        ];
        let table = RfmAnalyzer::customer_rfm(&rows);

        assert_eq!(table.top_by_recency(1)[0].id, "c2");
        assert_eq!(table.top_by_frequency(1)[0].id, "c2");
        let monetary: Vec<String> = table
            .top_by_monetary(2)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(monetary, vec!["c1", "c3"]);
    }

    #[test]
    fn test_tables_serialize_entity_id_column() {
        let sellers = RfmAnalyzer::seller_rfm(&[seller(
            "s1",
            "o1",
            "delivered",
            "2021-01-01 10:00:00",
            30.0,
        )]);
        let customers = RfmAnalyzer::customer_rfm(&[customer(
            "c1",
            "o1",
            "delivered",
            "2021-01-01 10:00:00",
            30.0,
        )]);

        let sellers = serde_json::to_value(&sellers).unwrap();
        assert_eq!(sellers["entity"], "seller");
        assert_eq!(sellers["reference_date"], "2021-01-01");
        assert_eq!(sellers["rows"][0]["seller_id"], "s1");
        assert!(sellers["rows"][0].get("id").is_none());

        let customers = serde_json::to_value(&customers).unwrap();
        assert_eq!(customers["rows"][0]["customer_id"], "c1");
        assert_eq!(customers["rows"][0]["recency"], 0);
    }
}
