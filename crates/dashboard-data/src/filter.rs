//! Inclusive date-range filtering over loaded tables.

use chrono::NaiveDate;
use dashboard_core::models::Timestamped;
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` window of calendar days.
///
/// An inverted range (`start > end`) is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `true` when `start > end`; such a range selects no rows.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Whether `date` falls inside the window, both ends included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both ends into `[min, max]`.
    pub fn clamp_to(self, min: NaiveDate, max: NaiveDate) -> Self {
        Self {
            start: self.start.clamp(min, max),
            end: self.end.clamp(min, max),
        }
    }
}

/// Return the rows whose purchase date lies inside `range`, in input order.
///
/// The input slice is never modified; an inverted range yields an empty table.
pub fn filter_by_range<T>(rows: &[T], range: &DateRange) -> Vec<T>
where
    T: Timestamped + Clone,
{
    if range.is_inverted() {
        return Vec::new();
    }
    rows.iter()
        .filter(|row| range.contains(row.purchase_date()))
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_core::models::ProductOrderRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(i: usize, ts: &str) -> ProductOrderRecord {
        ProductOrderRecord {
            row_index: i,
            order_id: format!("o{i}"),
            product_category_name_english: "toys".to_string(),
            order_purchase_timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            order_delivered_customer_date: None,
        }
    }

    fn table() -> Vec<ProductOrderRecord> {
        vec![
            row(0, "2020-12-31 23:59:59"),
            row(1, "2021-01-01 00:00:00"),
            row(2, "2021-01-15 12:00:00"),
            row(3, "2021-01-31 23:30:00"),
            row(4, "2021-02-01 00:00:00"),
        ]
    }

    #[test]
    fn test_bounds_are_inclusive_whole_days() {
        let range = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let out = filter_by_range(&table(), &range);
        let idx: Vec<usize> = out.iter().map(|r| r.row_index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
    }

    #[test]
    fn test_output_is_ordered_subsequence_within_bounds() {
        let rows = table();
        let range = DateRange::new(date(2020, 12, 31), date(2021, 1, 15));
        let out = filter_by_range(&rows, &range);

        assert!(out.windows(2).all(|w| w[0].row_index < w[1].row_index));
        assert!(out.iter().all(|r| rows.contains(r)));
        assert!(out
            .iter()
            .all(|r| range.contains(r.order_purchase_timestamp.date())));
    }

    #[test]
    fn test_input_is_untouched() {
        let rows = table();
        let before = rows.clone();
        let _ = filter_by_range(&rows, &DateRange::new(date(2021, 1, 2), date(2021, 1, 3)));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(date(2021, 1, 31), date(2021, 1, 1));
        assert!(range.is_inverted());
        assert!(filter_by_range(&table(), &range).is_empty());
    }

    #[test]
    fn test_range_outside_data_is_empty() {
        let range = DateRange::new(date(2019, 1, 1), date(2019, 12, 31));
        assert!(filter_by_range(&table(), &range).is_empty());
    }

    #[test]
    fn test_same_parameters_same_output() {
        let rows = table();
        let range = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        assert_eq!(filter_by_range(&rows, &range), filter_by_range(&rows, &range));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let range = DateRange::new(date(2016, 1, 1), date(2030, 1, 1))
            .clamp_to(date(2016, 9, 4), date(2018, 10, 17));
        assert_eq!(range, DateRange::new(date(2016, 9, 4), date(2018, 10, 17)));
    }
}
