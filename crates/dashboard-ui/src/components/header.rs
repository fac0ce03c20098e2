use chrono::NaiveDate;
use dashboard_data::filter::DateRange;
use ratatui::text::{Line, Span};

use crate::pages::Page;
use crate::themes::Theme;

/// Dashboard header, four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Selected range and data bounds, `[ start → end | data min → max ]`.
/// 4. Page tabs with the active one highlighted.
pub struct Header<'a> {
    pub range: DateRange,
    /// Purchase-date span of the loaded orders, if any were loaded.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    pub active: Page,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        range: DateRange,
        bounds: Option<(NaiveDate, NaiveDate)>,
        active: Page,
        theme: &'a Theme,
    ) -> Self {
        Self {
            range,
            bounds,
            active,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        let bounds = match self.bounds {
            Some((min, max)) => format!("{min} → {max}"),
            None => "empty".to_string(),
        };
        let range_style = if self.range.is_inverted() {
            self.theme.warning
        } else {
            self.theme.value
        };

        let mut tabs: Vec<Span<'a>> = Vec::new();
        for (i, page) in Page::ALL.iter().enumerate() {
            if i > 0 {
                tabs.push(Span::styled(" ", self.theme.dim));
            }
            let style = if *page == self.active {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            tabs.push(Span::styled(format!(" {} ", page.title()), style));
        }

        vec![
            Line::from(Span::styled("OLIST E-COMMERCE DASHBOARD", self.theme.header)),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    format!("{} → {}", self.range.start, self.range.end),
                    range_style,
                ),
                Span::styled(" | data ", self.theme.label),
                Span::styled(bounds, self.theme.dim),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(tabs),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
