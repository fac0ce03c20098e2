//! Horizontal ranking bars built from styled spans.
//!
//! Used for every best/worst and top-N view: one line per entry with a
//! fixed-width label, a bar proportional to the largest value in the list,
//! and the formatted value.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

const BAR_CHAR: char = '\u{2588}'; // █  FULL BLOCK

/// One bar of a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub label: String,
    /// Drives the bar length; never drawn directly.
    pub value: f64,
    /// Text printed after the bar.
    pub display: String,
}

impl RankingEntry {
    pub fn new(label: impl Into<String>, value: f64, display: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            display: display.into(),
        }
    }
}

pub struct RankingBars<'a> {
    pub entries: &'a [RankingEntry],
    pub theme: &'a Theme,
    /// Columns reserved for the label.
    pub label_width: usize,
    /// Columns available to the longest bar.
    pub bar_width: usize,
}

impl<'a> RankingBars<'a> {
    pub fn new(entries: &'a [RankingEntry], theme: &'a Theme) -> Self {
        Self {
            entries,
            theme,
            label_width: 20,
            bar_width: 30,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let max = self
            .entries
            .iter()
            .map(|e| e.value)
            .fold(0.0_f64, f64::max);

        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let filled = if max > 0.0 {
                    ((entry.value.max(0.0) / max) * self.bar_width as f64).round() as usize
                } else {
                    0
                };
                // Non-zero values always get at least one cell.
                let filled = if entry.value > 0.0 { filled.max(1) } else { 0 };
                let bar: String = std::iter::repeat_n(BAR_CHAR, filled).collect();

                Line::from(vec![
                    Span::styled(fit_label(&entry.label, self.label_width), self.theme.label),
                    Span::raw(" "),
                    Span::styled(bar, self.theme.bar_style(i)),
                    Span::raw(" "),
                    Span::styled(entry.display.clone(), self.theme.bar_value),
                ])
            })
            .collect()
    }
}

/// Render a titled, bordered ranking into `area`, sizing bars to fit.
pub fn render_ranking(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[RankingEntry],
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {title} "), theme.header));

    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No data in range", theme.dim)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let value_width = entries
        .iter()
        .map(|e| e.display.width())
        .max()
        .unwrap_or(0);
    let label_width = (inner_width / 3).clamp(6, 28);
    let bar_width = inner_width
        .saturating_sub(label_width + value_width + 2)
        .max(1);

    let bars = RankingBars {
        entries,
        theme,
        label_width,
        bar_width,
    };
    frame.render_widget(Paragraph::new(Text::from(bars.to_lines())).block(block), area);
}

/// Pad or truncate `label` to exactly `width` display columns.
///
/// Truncated labels end in `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    let current = label.width();
    if current <= width {
        let mut out = label.to_string();
        out.push_str(&" ".repeat(width - current));
        return out;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
