//! Customers and Sellers pages.
//!
//! Both pages share one layout: RFM averages across the top, state and city
//! rankings beside a point map, and the three RFM top-N charts at the bottom.
//! [`EntityView`] borrows the parts of a snapshot that belong to one side.

use dashboard_core::formatting::{format_brl, format_number};
use dashboard_core::models::{LocationCount, RfmAverages, RfmRow};
use dashboard_data::aggregator::top_by_count;
use dashboard_data::analysis::DashboardSnapshot;
use dashboard_data::rfm::RfmTable;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Color,
    Frame,
};

use crate::components::map::render_point_map;
use crate::components::metric::{render_metric_cards, MetricCard};
use crate::components::ranking::{render_ranking, RankingEntry};
use crate::themes::Theme;

/// The slice of a snapshot shown on one entity page.
pub struct EntityView<'a> {
    /// Plural noun used in titles, e.g. `"Customers"`.
    pub noun: &'static str,
    pub by_state: &'a [LocationCount],
    pub by_city: &'a [LocationCount],
    /// `(lng, lat)` of every mappable row.
    pub points: Vec<(f64, f64)>,
    /// Rows left off the map for missing coordinates.
    pub rejected: usize,
    pub rfm: &'a RfmTable,
    pub averages: RfmAverages,
    pub point_color: fn(&Theme) -> Color,
}

pub fn customers_view(snapshot: &DashboardSnapshot) -> EntityView<'_> {
    EntityView {
        noun: "Customers",
        by_state: &snapshot.customers_by_state,
        by_city: &snapshot.customers_by_city,
        points: snapshot
            .customer_points
            .features
            .iter()
            .map(|f| (f.geometry.x, f.geometry.y))
            .collect(),
        rejected: snapshot.customer_points.rejected.len(),
        rfm: &snapshot.customer_rfm,
        averages: snapshot.customer_rfm_averages,
        point_color: |t| t.customer_point,
    }
}

pub fn sellers_view(snapshot: &DashboardSnapshot) -> EntityView<'_> {
    EntityView {
        noun: "Sellers",
        by_state: &snapshot.sellers_by_state,
        by_city: &snapshot.sellers_by_city,
        points: snapshot
            .seller_points
            .features
            .iter()
            .map(|f| (f.geometry.x, f.geometry.y))
            .collect(),
        rejected: snapshot.seller_points.rejected.len(),
        rfm: &snapshot.seller_rfm,
        averages: snapshot.seller_rfm_averages,
        point_color: |t| t.seller_point,
    }
}

pub fn rfm_cards(averages: &RfmAverages) -> Vec<MetricCard> {
    vec![
        MetricCard::new(
            "Avg Recency (days)",
            format_number(averages.recency, 1),
        ),
        MetricCard::new("Avg Frequency", format_number(averages.frequency, 2)),
        MetricCard::new("Avg Monetary", format_brl(averages.monetary)),
    ]
}

pub fn location_entries(rows: &[LocationCount]) -> Vec<RankingEntry> {
    rows.iter()
        .map(|r| {
            RankingEntry::new(
                r.location.clone(),
                r.count as f64,
                format_number(r.count as f64, 0),
            )
        })
        .collect()
}

fn rfm_entries(rows: &[RfmRow], value: impl Fn(&RfmRow) -> (f64, String)) -> Vec<RankingEntry> {
    rows.iter()
        .map(|r| {
            let (v, display) = value(r);
            RankingEntry::new(r.id.clone(), v, display)
        })
        .collect()
}

pub fn render_entity_page(
    frame: &mut Frame,
    area: Rect,
    view: &EntityView<'_>,
    theme: &Theme,
    top: usize,
) {
    let [cards_area, middle, bottom] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Percentage(55),
        Constraint::Min(0),
    ])
    .areas(area);
    let [lists, map_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(middle);
    let [states_area, cities_area] =
        Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(lists);
    let [recency_area, frequency_area, monetary_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(bottom);

    render_metric_cards(frame, cards_area, &rfm_cards(&view.averages), theme);

    render_ranking(
        frame,
        states_area,
        &format!("{} by State", view.noun),
        &location_entries(&top_by_count(view.by_state, top)),
        theme,
    );
    render_ranking(
        frame,
        cities_area,
        &format!("{} by City", view.noun),
        &location_entries(&top_by_count(view.by_city, top)),
        theme,
    );

    let map_title = if view.rejected > 0 {
        format!("{} Map ({} without coordinates)", view.noun, view.rejected)
    } else {
        format!("{} Map", view.noun)
    };
    render_point_map(
        frame,
        map_area,
        &map_title,
        &view.points,
        (view.point_color)(theme),
        theme,
    );

    render_ranking(
        frame,
        recency_area,
        "Most Recent (days)",
        &rfm_entries(&view.rfm.top_by_recency(top), |r| {
            (r.recency as f64, format_number(r.recency as f64, 0))
        }),
        theme,
    );
    render_ranking(
        frame,
        frequency_area,
        "Most Frequent",
        &rfm_entries(&view.rfm.top_by_frequency(top), |r| {
            (r.frequency as f64, format_number(r.frequency as f64, 0))
        }),
        theme,
    );
    render_ranking(
        frame,
        monetary_area,
        "Highest Monetary",
        &rfm_entries(&view.rfm.top_by_monetary(top), |r| {
            (r.monetary, format_brl(r.monetary))
        }),
        theme,
    );
}
