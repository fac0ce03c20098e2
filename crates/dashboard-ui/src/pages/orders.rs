//! Orders page: headline totals and the daily order chart.

use dashboard_core::formatting::{format_brl, format_number};
use dashboard_core::models::DailyOrders;
use dashboard_data::analysis::DashboardSnapshot;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::components::metric::{render_metric_cards, MetricCard};
use crate::themes::Theme;

/// `(day offset, order count)` pairs, x measured from the first day.
pub fn order_series(daily: &[DailyOrders]) -> Vec<(f64, f64)> {
    let Some(first) = daily.first().map(|d| d.date) else {
        return Vec::new();
    };
    daily
        .iter()
        .map(|d| ((d.date - first).num_days() as f64, d.order_count as f64))
        .collect()
}

pub fn headline_cards(snapshot: &DashboardSnapshot) -> Vec<MetricCard> {
    let days = snapshot.daily_orders.len();
    let per_day = if days > 0 {
        snapshot.totals.total_orders as f64 / days as f64
    } else {
        0.0
    };
    vec![
        MetricCard::new(
            "Total Orders",
            format_number(snapshot.totals.total_orders as f64, 0),
        ),
        MetricCard::new("Total GMV", format_brl(snapshot.totals.total_gmv)),
        MetricCard::new("Orders / Active Day", format_number(per_day, 1)),
    ]
}

pub fn render_orders_page(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    let [cards_area, chart_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    render_metric_cards(frame, cards_area, &headline_cards(snapshot), theme);

    let series = order_series(&snapshot.daily_orders);
    let max_x = series.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
    let max_y = series.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(1.0);

    let x_labels: Vec<Span> = match (snapshot.daily_orders.first(), snapshot.daily_orders.last()) {
        (Some(first), Some(last)) => vec![
            Span::styled(first.date.to_string(), theme.chart_axis),
            Span::styled(last.date.to_string(), theme.chart_axis),
        ],
        _ => Vec::new(),
    };
    let y_labels = vec![
        Span::styled("0", theme.chart_axis),
        Span::styled(format_number(max_y / 2.0, 0), theme.chart_axis),
        Span::styled(format_number(max_y, 0), theme.chart_axis),
    ];

    let dataset = Dataset::default()
        .name("orders")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&series);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(" Daily Orders ", theme.header)),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, max_y])
                .labels(y_labels),
        );

    frame.render_widget(chart, chart_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::tests::{buffer_text, date, sample_snapshot};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_order_series_offsets_days() {
        let daily = vec![
            DailyOrders {
                date: date(2021, 1, 1),
                order_count: 3,
                gmv: 10.0,
            },
            DailyOrders {
                date: date(2021, 1, 5),
                order_count: 1,
                gmv: 5.0,
            },
        ];
        assert_eq!(order_series(&daily), vec![(0.0, 3.0), (4.0, 1.0)]);
        assert!(order_series(&[]).is_empty());
    }

    #[test]
    fn test_headline_cards() {
        let cards = headline_cards(&sample_snapshot());

        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].label, "Total GMV");
        assert_eq!(cards[1].value, "R$ 225,50");
        assert_eq!(cards[2].value, "1.0");
    }

    #[test]
    fn test_render_orders_page_shows_totals() {
        let snapshot = sample_snapshot();
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_orders_page(frame, area, &snapshot, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Total Orders"));
        assert!(text.contains("R$ 225,50"));
        assert!(text.contains("Daily Orders"));
    }
}
