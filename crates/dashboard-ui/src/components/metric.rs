use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// A single headline figure.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn to_text(&self, theme: &Theme) -> Text<'static> {
        Text::from(vec![
            Line::from(Span::styled(self.label.clone(), theme.label)),
            Line::from(Span::styled(self.value.clone(), theme.value)),
        ])
    }
}

/// Lay `cards` out side by side in equal columns.
pub fn render_metric_cards(frame: &mut Frame, area: Rect, cards: &[MetricCard], theme: &Theme) {
    if cards.is_empty() {
        return;
    }
    let columns = Layout::horizontal(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let widget = Paragraph::new(card.to_text(theme))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border),
            );
        frame.render_widget(widget, *column);
    }
}
