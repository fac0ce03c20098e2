//! Point map on a world basemap.
//!
//! Coordinates are plotted in degrees (`x` = longitude, `y` = latitude) on a
//! ratatui [`Canvas`], zoomed to the points with a small margin.

use ratatui::{
    layout::Rect,
    style::Color,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders,
    },
    Frame,
};

use crate::themes::Theme;

/// Default viewport: mainland Brazil.
pub const BRAZIL_LNG: [f64; 2] = [-75.0, -33.0];
pub const BRAZIL_LAT: [f64; 2] = [-34.0, 6.0];

/// Degrees of padding around the fitted points.
const MARGIN_DEG: f64 = 2.0;

/// `(x_bounds, y_bounds)` enclosing `points` plus a margin.
///
/// Falls back to the Brazil viewport when there are no points.
pub fn fit_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    if points.is_empty() {
        return (BRAZIL_LNG, BRAZIL_LAT);
    }
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (
        [
            (min_x - MARGIN_DEG).max(-180.0),
            (max_x + MARGIN_DEG).min(180.0),
        ],
        [
            (min_y - MARGIN_DEG).max(-90.0),
            (max_y + MARGIN_DEG).min(90.0),
        ],
    )
}

pub fn render_point_map(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[(f64, f64)],
    color: Color,
    theme: &Theme,
) {
    let (x_bounds, y_bounds) = fit_bounds(points);
    let land = theme.map_land;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(format!(" {title} "), theme.header)),
        )
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: land,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: points,
                color,
            });
        });

    frame.render_widget(canvas, area);
}
