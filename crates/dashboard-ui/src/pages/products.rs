//! Products page: best and worst categories by sales and by review score.

use dashboard_core::formatting::format_number;
use dashboard_core::models::{CategoryReview, CategorySales};
use dashboard_data::aggregator::{best, worst};
use dashboard_data::analysis::DashboardSnapshot;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::components::ranking::{render_ranking, RankingEntry};
use crate::themes::Theme;

pub fn sales_entries(rows: &[CategorySales]) -> Vec<RankingEntry> {
    rows.iter()
        .map(|r| {
            RankingEntry::new(
                r.category.clone(),
                r.order_count as f64,
                format_number(r.order_count as f64, 0),
            )
        })
        .collect()
}

pub fn review_entries(rows: &[CategoryReview]) -> Vec<RankingEntry> {
    rows.iter()
        .map(|r| RankingEntry::new(r.category.clone(), r.mean_score, format_number(r.mean_score, 2)))
        .collect()
}

pub fn render_products_page(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
    top: usize,
) {
    let [sales_row, review_row] =
        Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(area);
    let [best_sales, worst_sales] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(sales_row);
    let [best_reviews, worst_reviews] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(review_row);

    render_ranking(
        frame,
        best_sales,
        "Best Selling Categories",
        &sales_entries(&best(&snapshot.product_sales, top)),
        theme,
    );
    render_ranking(
        frame,
        worst_sales,
        "Worst Selling Categories",
        &sales_entries(&worst(&snapshot.product_sales, top)),
        theme,
    );
    render_ranking(
        frame,
        best_reviews,
        "Best Reviewed Categories",
        &review_entries(&best(&snapshot.product_reviews, top)),
        theme,
    );
    render_ranking(
        frame,
        worst_reviews,
        "Worst Reviewed Categories",
        &review_entries(&worst(&snapshot.product_reviews, top)),
        theme,
    );
}
