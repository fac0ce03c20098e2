//! Group-by summaries over range-filtered tables.
//!
//! Every function makes one pass over its input with a key → accumulator map
//! and returns a small summary table. Empty input gives an empty table.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use dashboard_core::models::{
    CategoryReview, CategorySales, CustomerOrderRecord, DailyOrders, LocationCount, OrderRecord,
    ProductOrderRecord, ReviewOrderRecord, SellerOrderRecord, Timestamped,
};
use serde::{Deserialize, Serialize};

// ── OrderTotals ───────────────────────────────────────────────────────────────

/// Scalar headline figures for the selected range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub total_orders: u64,
    #[serde(rename = "total_GMV")]
    pub total_gmv: f64,
}

// ── DayAccumulator ────────────────────────────────────────────────────────────

#[derive(Default)]
struct DayAccumulator<'a> {
    order_ids: HashSet<&'a str>,
    gmv: f64,
}

// ── SummaryAggregator ─────────────────────────────────────────────────────────

/// Stateless helper holding the order, product and location summaries.
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Distinct orders and summed payment value per calendar day.
    ///
    /// Only days with at least one order appear; rows are chronological.
    pub fn daily_orders(orders: &[OrderRecord]) -> Vec<DailyOrders> {
        let mut days: BTreeMap<NaiveDate, DayAccumulator<'_>> = BTreeMap::new();

        for order in orders {
            let day = days.entry(order.purchase_date()).or_default();
            day.order_ids.insert(order.order_id.as_str());
            day.gmv += order.payment_value;
        }

        days.into_iter()
            .map(|(date, acc)| DailyOrders {
                date,
                order_count: acc.order_ids.len() as u64,
                gmv: acc.gmv,
            })
            .collect()
    }

    /// Distinct orders per product category, most-sold first.
    ///
    /// Ties are broken by category name so repeated runs are identical.
    pub fn product_sales(items: &[ProductOrderRecord]) -> Vec<CategorySales> {
        let mut categories: HashMap<&str, HashSet<&str>> = HashMap::new();
        for item in items {
            categories
                .entry(item.product_category_name_english.as_str())
                .or_default()
                .insert(item.order_id.as_str());
        }

        let mut sales: Vec<CategorySales> = categories
            .into_iter()
            .map(|(category, orders)| CategorySales {
                category: category.to_string(),
                order_count: orders.len() as u64,
            })
            .collect();
        sales.sort_by(|a, b| {
            b.order_count
                .cmp(&a.order_count)
                .then_with(|| a.category.cmp(&b.category))
        });
        sales
    }

    /// Mean review score per product category, best-rated first.
    pub fn product_reviews(reviews: &[ReviewOrderRecord]) -> Vec<CategoryReview> {
        let mut scores: HashMap<&str, (u64, u64)> = HashMap::new();
        for review in reviews {
            let (sum, count) = scores
                .entry(review.product_category_name_english.as_str())
                .or_default();
            *sum += u64::from(review.review_score);
            *count += 1;
        }

        let mut means: Vec<CategoryReview> = scores
            .into_iter()
            .map(|(category, (sum, count))| CategoryReview {
                category: category.to_string(),
                mean_score: sum as f64 / count as f64,
            })
            .collect();
        means.sort_by(|a, b| {
            b.mean_score
                .partial_cmp(&a.mean_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        means
    }

    /// Distinct customers per state, in order of first appearance.
    pub fn customers_by_state(rows: &[CustomerOrderRecord]) -> Vec<LocationCount> {
        count_distinct_by(rows, |r| &r.customer_state, |r| &r.customer_unique_id)
    }

    /// Distinct customers per city, in order of first appearance.
    pub fn customers_by_city(rows: &[CustomerOrderRecord]) -> Vec<LocationCount> {
        count_distinct_by(rows, |r| &r.customer_city, |r| &r.customer_unique_id)
    }

    /// Distinct sellers per state, in order of first appearance.
    pub fn sellers_by_state(rows: &[SellerOrderRecord]) -> Vec<LocationCount> {
        count_distinct_by(rows, |r| &r.seller_state, |r| &r.seller_id)
    }

    /// Distinct sellers per city, in order of first appearance.
    pub fn sellers_by_city(rows: &[SellerOrderRecord]) -> Vec<LocationCount> {
        count_distinct_by(rows, |r| &r.seller_city, |r| &r.seller_id)
    }

    /// Sum the daily rows into headline totals.
    pub fn calculate_totals(daily: &[DailyOrders]) -> OrderTotals {
        daily.iter().fold(OrderTotals::default(), |mut totals, day| {
            totals.total_orders += day.order_count;
            totals.total_gmv += day.gmv;
            totals
        })
    }
}

// ── Ranking helpers ───────────────────────────────────────────────────────────

/// The first `n` rows of a table already sorted best-first.
pub fn best<T: Clone>(sorted: &[T], n: usize) -> Vec<T> {
    sorted.iter().take(n).cloned().collect()
}

/// The last `n` rows of a table sorted best-first, worst first.
pub fn worst<T: Clone>(sorted: &[T], n: usize) -> Vec<T> {
    sorted.iter().rev().take(n).cloned().collect()
}

/// The `n` locations with the highest count; ties keep table order.
pub fn top_by_count(rows: &[LocationCount], n: usize) -> Vec<LocationCount> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Count distinct `value`s per `key`, keeping keys in first-seen order.
fn count_distinct_by<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a String,
    value: impl Fn(&'a T) -> &'a String,
) -> Vec<LocationCount> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, HashSet<&'a str>)> = Vec::new();

    for row in rows {
        let k = key(row).as_str();
        let slot = *slots.entry(k).or_insert_with(|| {
            groups.push((k, HashSet::new()));
            groups.len() - 1
        });
        groups[slot].1.insert(value(row).as_str());
    }

    groups
        .into_iter()
        .map(|(location, values)| LocationCount {
            location: location.to_string(),
            count: values.len() as u64,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn order(id: &str, when: &str, pay: f64) -> OrderRecord {
        OrderRecord {
            row_index: 0,
            order_id: id.to_string(),
            customer_unique_id: format!("cust-{id}"),
            order_status: "delivered".to_string(),
            order_purchase_timestamp: ts(when),
            order_delivered_customer_date: None,
            payment_value: pay,
        }
    }

    fn item(id: &str, category: &str) -> ProductOrderRecord {
        ProductOrderRecord {
            row_index: 0,
            order_id: id.to_string(),
            product_category_name_english: category.to_string(),
            order_purchase_timestamp: ts("2021-01-01 10:00:00"),
            order_delivered_customer_date: None,
        }
    }

    fn review(category: &str, score: u8) -> ReviewOrderRecord {
        ReviewOrderRecord {
            row_index: 0,
            order_id: format!("{category}-{score}"),
            product_category_name_english: category.to_string(),
            review_score: score,
            order_purchase_timestamp: ts("2021-01-01 10:00:00"),
            order_delivered_customer_date: None,
        }
    }

    fn customer(id: &str, city: &str, state: &str) -> CustomerOrderRecord {
        CustomerOrderRecord {
            row_index: 0,
            order_id: format!("order-{id}"),
            customer_unique_id: id.to_string(),
            customer_city: city.to_string(),
            customer_state: state.to_string(),
            geolocation_lat: Some(-23.5),
            geolocation_lng: Some(-46.6),
            order_status: "delivered".to_string(),
            payment_value: 10.0,
            order_purchase_timestamp: ts("2021-01-01 10:00:00"),
            order_delivered_customer_date: None,
        }
    }

    fn seller(id: &str, city: &str, state: &str) -> SellerOrderRecord {
        SellerOrderRecord {
            row_index: 0,
            order_id: format!("order-{id}"),
            seller_id: id.to_string(),
            seller_city: city.to_string(),
            seller_state: state.to_string(),
            geolocation_lat: Some(-25.4),
            geolocation_lng: Some(-49.2),
            order_status: "delivered".to_string(),
            payment_value: 10.0,
            order_purchase_timestamp: ts("2021-01-01 10:00:00"),
            order_delivered_customer_date: None,
        }
    }

    // ── daily_orders ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_orders_groups_by_day() {
        let orders = vec![
            order("1", "2021-01-01 10:00:00", 100.0),
            order("2", "2021-01-05 08:00:00", 50.0),
        ];
        let daily = SummaryAggregator::daily_orders(&orders);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(daily[1].order_count, 1);
        let gmv: f64 = daily.iter().map(|d| d.gmv).sum();
        assert!((gmv - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_orders_counts_distinct_and_sums_all_rows() {
        // Two payment rows for the same order on one day.
        let orders = vec![
            order("1", "2021-01-01 10:00:00", 30.0),
            order("1", "2021-01-01 10:00:00", 20.0),
            order("2", "2021-01-01 18:00:00", 5.0),
        ];
        let daily = SummaryAggregator::daily_orders(&orders);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].order_count, 2);
        assert!((daily[0].gmv - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_order_count_sums_to_distinct_orders() {
        let orders = vec![
            order("a", "2021-01-01 10:00:00", 1.0),
            order("b", "2021-01-01 11:00:00", 1.0),
            order("b", "2021-01-01 11:00:00", 1.0),
            order("c", "2021-01-03 09:00:00", 1.0),
            order("d", "2021-01-09 09:00:00", 1.0),
        ];
        let daily = SummaryAggregator::daily_orders(&orders);

        let total: u64 = daily.iter().map(|d| d.order_count).sum();
        let distinct: HashSet<&str> = orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(total, distinct.len() as u64);
    }

    #[test]
    fn test_daily_orders_chronological() {
        let orders = vec![
            order("3", "2021-03-01 10:00:00", 1.0),
            order("1", "2021-01-01 10:00:00", 1.0),
            order("2", "2021-02-01 10:00:00", 1.0),
        ];
        let daily = SummaryAggregator::daily_orders(&orders);
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_daily_orders_empty() {
        assert!(SummaryAggregator::daily_orders(&[]).is_empty());
    }

    // ── totals ────────────────────────────────────────────────────────────────

    #[test]
    fn test_calculate_totals() {
        let orders = vec![
            order("1", "2021-01-01 10:00:00", 100.0),
            order("2", "2021-01-05 08:00:00", 50.0),
        ];
        let totals = SummaryAggregator::calculate_totals(&SummaryAggregator::daily_orders(&orders));
        assert_eq!(totals.total_orders, 2);
        assert!((totals.total_gmv - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_totals_empty() {
        assert_eq!(SummaryAggregator::calculate_totals(&[]), OrderTotals::default());
    }

    // ── product_sales ─────────────────────────────────────────────────────────

    #[test]
    fn test_product_sales_sorted_descending() {
        let items = vec![
            item("1", "toys"),
            item("2", "bed_bath_table"),
            item("3", "bed_bath_table"),
            item("3", "bed_bath_table"),
            item("4", "health_beauty"),
            item("5", "health_beauty"),
            item("6", "health_beauty"),
        ];
        let sales = SummaryAggregator::product_sales(&items);

        assert!(sales.windows(2).all(|w| w[0].order_count >= w[1].order_count));
        assert_eq!(sales[0].category, "health_beauty");
        assert_eq!(sales[0].order_count, 3);
        // Repeated item lines of one order count once.
        assert_eq!(sales[1].category, "bed_bath_table");
        assert_eq!(sales[1].order_count, 2);
    }

    #[test]
    fn test_product_sales_category_set_matches_input() {
        let items = vec![item("1", "toys"), item("2", "auto"), item("3", "toys")];
        let sales = SummaryAggregator::product_sales(&items);

        let got: HashSet<&str> = sales.iter().map(|s| s.category.as_str()).collect();
        let want: HashSet<&str> = items
            .iter()
            .map(|i| i.product_category_name_english.as_str())
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_product_sales_is_deterministic() {
        let items = vec![item("1", "b"), item("2", "a"), item("3", "c")];
        let first = SummaryAggregator::product_sales(&items);
        let second = SummaryAggregator::product_sales(&items);
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    // ── product_reviews ───────────────────────────────────────────────────────

    #[test]
    fn test_product_reviews_mean_descending() {
        let reviews = vec![
            review("toys", 5),
            review("toys", 4),
            review("auto", 1),
            review("auto", 2),
            review("books", 5),
        ];
        let means = SummaryAggregator::product_reviews(&reviews);

        assert_eq!(means.len(), 3);
        assert_eq!(means[0].category, "books");
        assert!((means[0].mean_score - 5.0).abs() < 1e-9);
        assert!((means[1].mean_score - 4.5).abs() < 1e-9);
        assert!((means[2].mean_score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_product_reviews_no_rounding() {
        let reviews = vec![review("toys", 5), review("toys", 4), review("toys", 4)];
        let means = SummaryAggregator::product_reviews(&reviews);
        assert!((means[0].mean_score - 13.0 / 3.0).abs() < 1e-12);
    }

    // ── location counts ───────────────────────────────────────────────────────

    #[test]
    fn test_customers_by_state_distinct_in_first_seen_order() {
        let rows = vec![
            customer("c1", "campinas", "SP"),
            customer("c2", "rio de janeiro", "RJ"),
            customer("c1", "campinas", "SP"),
            customer("c3", "sao paulo", "SP"),
        ];
        let by_state = SummaryAggregator::customers_by_state(&rows);

        assert_eq!(
            by_state,
            vec![
                LocationCount {
                    location: "SP".to_string(),
                    count: 2
                },
                LocationCount {
                    location: "RJ".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_customers_by_city() {
        let rows = vec![
            customer("c1", "campinas", "SP"),
            customer("c2", "campinas", "SP"),
            customer("c3", "sao paulo", "SP"),
        ];
        let by_city = SummaryAggregator::customers_by_city(&rows);
        assert_eq!(by_city[0].location, "campinas");
        assert_eq!(by_city[0].count, 2);
        assert_eq!(by_city[1].count, 1);
    }

    #[test]
    fn test_sellers_by_state_and_city() {
        let rows = vec![
            seller("s1", "curitiba", "PR"),
            seller("s1", "curitiba", "PR"),
            seller("s2", "sao paulo", "SP"),
            seller("s3", "curitiba", "PR"),
        ];
        let by_state = SummaryAggregator::sellers_by_state(&rows);
        let by_city = SummaryAggregator::sellers_by_city(&rows);

        assert_eq!(by_state[0].location, "PR");
        assert_eq!(by_state[0].count, 2);
        assert_eq!(by_city[1].location, "sao paulo");
        assert_eq!(by_city[1].count, 1);
    }

    #[test]
    fn test_location_counts_empty() {
        assert!(SummaryAggregator::customers_by_state(&[]).is_empty());
        assert!(SummaryAggregator::sellers_by_city(&[]).is_empty());
    }

    // ── ranking helpers ───────────────────────────────────────────────────────

    #[test]
    fn test_best_and_worst() {
        let items = vec![
            item("1", "a"),
            item("2", "a"),
            item("3", "a"),
            item("4", "b"),
            item("5", "b"),
            item("6", "c"),
        ];
        let sales = SummaryAggregator::product_sales(&items);

        let top: Vec<String> = best(&sales, 2).into_iter().map(|s| s.category).collect();
        let bottom: Vec<String> = worst(&sales, 2).into_iter().map(|s| s.category).collect();
        assert_eq!(top, vec!["a", "b"]);
        assert_eq!(bottom, vec!["c", "b"]);
        assert_eq!(best(&sales, 10).len(), 3);
    }

    #[test]
    fn test_top_by_count_keeps_ties_in_table_order() {
        let rows = vec![
            LocationCount {
                location: "MG".to_string(),
                count: 3,
            },
            LocationCount {
                location: "SP".to_string(),
                count: 9,
            },
            LocationCount {
                location: "RJ".to_string(),
                count: 3,
            },
        ];
        let top = top_by_count(&rows, 2);
        let names: Vec<&str> = top.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["SP", "MG"]);
    }
}
