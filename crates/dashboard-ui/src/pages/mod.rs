//! Dashboard pages and the dispatcher that renders the active one.

pub mod entities;
pub mod orders;
pub mod products;

use dashboard_data::analysis::DashboardSnapshot;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

// ── Page ──────────────────────────────────────────────────────────────────────

/// Which page the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Orders,
    Products,
    Customers,
    Sellers,
}

impl Page {
    /// Tab order.
    pub const ALL: [Page; 4] = [Page::Orders, Page::Products, Page::Customers, Page::Sellers];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Orders => "Orders",
            Page::Products => "Products",
            Page::Customers => "Customers",
            Page::Sellers => "Sellers",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    /// The next tab, wrapping around.
    pub fn next(&self) -> Page {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// The previous tab, wrapping around.
    pub fn previous(&self) -> Page {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render `page` for `snapshot` into `area`.
pub fn render_page(
    frame: &mut Frame,
    area: Rect,
    page: Page,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
    top: usize,
) {
    match page {
        Page::Orders => orders::render_orders_page(frame, area, snapshot, theme),
        Page::Products => products::render_products_page(frame, area, snapshot, theme, top),
        Page::Customers => {
            entities::render_entity_page(frame, area, &entities::customers_view(snapshot), theme, top)
        }
        Page::Sellers => {
            entities::render_entity_page(frame, area, &entities::sellers_view(snapshot), theme, top)
        }
    }
}

/// Placeholder shown before the first snapshot arrives.
pub fn render_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Computing summaries…", theme.info)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(" Olist Dashboard "),
        ),
        area,
    );
}

/// Placeholder for a range that selected no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let range = snapshot.metadata.range;
    let hint = if range.is_inverted() {
        "The start date is after the end date."
    } else {
        "Widen the range with '[' / ']' and '{' / '}', or press 'r' to reset."
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No orders between {} and {}", range.start, range.end),
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled(hint, theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(" Olist Dashboard "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
