//! Record rendering
//!
//! Packed rows go in the main list: error-class records show every field,
//! anything else shows `{level, msg}` plus a count of what was left out.
//! The expanded form is the pretty-printed record shown when zoomed.

use crate::theme::{Theme, colorize, colorize_spans};
use logview_core::{LogRecord, RenderError, scan};
use ratatui::text::{Line, Span, Text};

/// Theme for a packed row
pub fn packed_theme(record: &LogRecord) -> &'static Theme {
    if record.level.is_error() {
        &Theme::ERROR
    } else if record.level.is_verbose() {
        &Theme::DEBUG
    } else {
        &Theme::STANDARD
    }
}

/// Theme for the zoomed view
pub fn expanded_theme(record: &LogRecord) -> &'static Theme {
    if record.level.is_error() {
        &Theme::ERROR
    } else {
        &Theme::STANDARD
    }
}

/// Suffix appended to packed non-error rows
pub fn hidden_suffix(count: usize) -> String {
    format!(" ... {} hidden fields", count)
}

/// One list row
pub fn render_packed(record: &LogRecord) -> Result<Line<'static>, RenderError> {
    let theme = packed_theme(record);

    if record.level.is_error() {
        let json = serde_json::to_string(&record.fields)?;
        return Ok(Line::from(colorize_spans(&json, theme)));
    }

    let json = serde_json::to_string(&record.promoted())?;
    let mut spans = colorize_spans(&json, theme);
    spans.push(Span::styled(
        hidden_suffix(record.hidden_field_count()),
        Theme::DEBUG.value,
    ));
    Ok(Line::from(spans))
}

/// Every field, indented one space per level
pub fn render_expanded(record: &LogRecord) -> Result<Text<'static>, RenderError> {
    let json = pretty_fields(record)?;
    Ok(colorize(&json, expanded_theme(record)))
}

/// Pretty-printed field mapping
///
/// Indents the compact serialization lexically, so every value is shown
/// exactly as it arrived and key order is kept throughout.
pub fn pretty_fields(record: &LogRecord) -> Result<String, RenderError> {
    let compact = serde_json::to_string(&record.fields)?;
    Ok(scan::reindent(&compact, " "))
}
