use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Guess the terminal background from `COLORFGBG`, defaulting to dark.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| parse_colorfgbg(&v))
        .unwrap_or(BackgroundType::Dark)
}

/// `COLORFGBG` is `"fg;bg"` (sometimes `"fg;default;bg"`); ANSI background
/// colours 0 to 6 are dark.
fn parse_colorfgbg(value: &str) -> Option<BackgroundType> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if bg < 7 {
        BackgroundType::Dark
    } else {
        BackgroundType::Light
    })
}

/// Every style the dashboard pages draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub warning: Style,
    pub error: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Line of the daily orders / revenue charts.
    pub chart_line: Style,
    pub chart_axis: Style,
    /// Highlighted bar (best entry of a ranking).
    pub bar_highlight: Style,
    /// Remaining bars of a ranking.
    pub bar_muted: Style,
    pub bar_value: Style,

    // ── Map ──────────────────────────────────────────────────────────────────
    pub map_land: Color,
    pub customer_point: Color,
    pub seller_point: Color,

    // ── Border ───────────────────────────────────────────────────────────────
    pub border: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_line: Style::default().fg(Color::LightBlue),
            chart_axis: Style::default().fg(Color::Gray),
            bar_highlight: Style::default().fg(Color::LightBlue),
            bar_muted: Style::default().fg(Color::DarkGray),
            bar_value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            map_land: Color::DarkGray,
            customer_point: Color::LightBlue,
            seller_point: Color::LightRed,

            border: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Dark text and saturated accents for white or light-grey terminals.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_line: Style::default().fg(Color::Blue),
            chart_axis: Style::default().fg(Color::DarkGray),
            bar_highlight: Style::default().fg(Color::Blue),
            bar_muted: Style::default().fg(Color::Gray),
            bar_value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            map_land: Color::Gray,
            customer_point: Color::Blue,
            seller_point: Color::Red,

            border: Style::default().fg(Color::Gray),
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            chart_line: Style::default().fg(Color::Cyan),
            chart_axis: Style::default().fg(Color::White),
            bar_highlight: Style::default().fg(Color::Cyan),
            bar_muted: Style::default().fg(Color::White),
            bar_value: Style::default().fg(Color::Black),

            map_land: Color::White,
            customer_point: Color::Cyan,
            seller_point: Color::Red,

            border: Style::default().fg(Color::DarkGray),
        }
    }

    /// Choose a theme from the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar style for the `index`-th entry of a ranking; only the first is
    /// highlighted.
    pub fn bar_style(&self, index: usize) -> Style {
        if index == 0 {
            self.bar_highlight
        } else {
            self.bar_muted
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
