//! Severity themes and the JSON colorizer
//!
//! A theme maps each scanner [`Role`] to a style. Which theme a record gets
//! is decided by its level in the render module, never here.

use logview_core::scan::{self, Role};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

/// Role-to-style mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub key: Style,
    pub value: Style,
    pub bracket: Style,
}

const BRACKET: Style = Style::new().fg(Color::Gray).add_modifier(Modifier::BOLD);
const FAINT: Style = Style::new().fg(Color::White).add_modifier(Modifier::DIM);

impl Theme {
    /// Red keys, used for error-class records
    pub const ERROR: Theme = Theme {
        key: Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
        value: Style::new().fg(Color::Green),
        bracket: BRACKET,
    };

    /// Blue keys
    pub const STANDARD: Theme = Theme {
        key: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
        value: Style::new().fg(Color::Green),
        bracket: BRACKET,
    };

    /// Everything faint
    pub const DEBUG: Theme = Theme {
        key: FAINT,
        value: FAINT,
        bracket: FAINT,
    };

    pub fn style(&self, role: Role) -> Style {
        match role {
            Role::Key => self.key,
            Role::Value => self.value,
            Role::Bracket => self.bracket,
            Role::Plain => Style::default(),
        }
    }

    /// Style `text` for `role`
    pub fn paint(&self, role: Role, text: impl Into<String>) -> Span<'static> {
        Span::styled(text.into(), self.style(role))
    }
}

/// Colorize serialized JSON, one [`Line`] per input line
pub fn colorize(json: &str, theme: &Theme) -> Text<'static> {
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];

    for (role, segment) in scan::segments(json) {
        for (idx, part) in segment.split('\n').enumerate() {
            if idx > 0 {
                lines.push(Vec::new());
            }
            if part.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.push(theme.paint(role, part));
            }
        }
    }

    Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>())
}

/// Colorize single-line JSON into spans
pub fn colorize_spans(json: &str, theme: &Theme) -> Vec<Span<'static>> {
    scan::segments(json)
        .into_iter()
        .map(|(role, segment)| theme.paint(role, segment))
        .collect()
}
