//! Log viewer component
//!
//! Draws the record list, the search input and the zoom overlay from a
//! [`ViewerState`]. Keys are resolved through the [`Keymap`] and the state
//! machine decides what they mean; this component only turns the result
//! into actions for the app loop.

use crate::action::Action;
use crate::components::Component;
use crate::ingest::IngestEvent;
use crate::keymap::Keymap;
use crate::render::{render_expanded, render_packed};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use logview_core::{Feed, KeymapConfig, LogRecord, Mode, Outcome, UiConfig, ViewerState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};

/// State of the input stream, as far as the UI knows
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputState {
    Streaming,
    Ended,
    Failed(String),
}

pub struct ViewerComponent {
    state: ViewerState,
    keymap: Keymap,
    /// Chords as configured, for footer hints
    keys: KeymapConfig,
    ui: UiConfig,
    /// Shown in the header
    source: String,
    input: InputState,
}

impl ViewerComponent {
    pub fn new(
        feed: Feed,
        keymap: Keymap,
        keys: KeymapConfig,
        ui: UiConfig,
        source: impl Into<String>,
    ) -> Self {
        Self {
            state: ViewerState::new(feed),
            keymap,
            keys,
            ui,
            source: source.into(),
            input: InputState::Streaming,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Apply a notification from the ingestion task, returning whether a
    /// redraw is needed
    pub fn on_ingest(&mut self, event: IngestEvent) -> bool {
        match event {
            IngestEvent::Appended(_) => matches!(self.state.on_append(), Outcome::Redraw),
            IngestEvent::Closed => {
                self.input = InputState::Ended;
                true
            }
            IngestEvent::Failed(error) => {
                self.input = InputState::Failed(error);
                true
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let badge = match self.state.mode() {
            Mode::Live => Span::styled(" ● LIVE ", Style::default().fg(Color::Green).bold()),
            Mode::Filtered => {
                Span::styled(" ◆ FILTERED ", Style::default().fg(Color::Yellow).bold())
            }
            Mode::Searching => Span::styled(" ? SEARCH ", Style::default().fg(Color::Cyan).bold()),
            Mode::Zoomed => Span::styled(" ◎ ZOOM ", Style::default().fg(Color::Magenta).bold()),
        };

        let mut spans = vec![
            Span::raw(" logview: ").bold().fg(Color::Cyan),
            Span::raw(self.source.clone()).fg(Color::White),
            Span::raw(" "),
            badge,
            Span::raw(format!(
                "[{}/{} records]",
                self.state.active_len(),
                self.state.feed().len()
            ))
            .dim(),
        ];

        if let Some(pattern) = self.state.pattern() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("filter: \"{}\"", pattern),
                Style::default().fg(Color::Yellow),
            ));
        }

        match &self.input {
            InputState::Streaming => {}
            InputState::Ended => {
                spans.push(Span::raw("  "));
                spans.push(Span::raw("[EOF]").dim());
            }
            InputState::Failed(error) => {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("[read error: {}]", error),
                    Style::default().fg(Color::Red),
                ));
            }
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = area.height as usize;
        let rows = self.state.visible(height);
        if rows.total == 0 {
            let msg = match (self.state.pattern(), &self.input) {
                (Some(pattern), _) => format!(" No records match \"{}\"", pattern),
                (None, InputState::Streaming) => " Waiting for log records...".to_string(),
                (None, _) => " No log records in input".to_string(),
            };
            frame.render_widget(Paragraph::new(Line::from(Span::raw(msg).dim())), area);
            return Ok(());
        }

        let mut lines = Vec::with_capacity(rows.records.len());
        for (offset, record) in rows.records.iter().enumerate() {
            let mut line = render_packed(record)?;
            let marker = if rows.selected == Some(rows.start + offset) {
                Span::styled("> ", Style::default().fg(Color::Yellow).bold())
            } else {
                Span::raw("  ")
            };
            line.spans.insert(0, marker);
            lines.push(line);
        }
        frame.render_widget(Paragraph::new(lines), area);

        if self.ui.show_scrollbar && rows.total > height {
            render_scrollbar(frame, area, rows.total, rows.start, height);
        }

        Ok(())
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" Search Pattern: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.state.search_buffer().to_string()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_zoom(&mut self, frame: &mut Frame, area: Rect, record: &LogRecord) -> Result<()> {
        let popup = centered_rect(self.ui.zoom_percent, area);
        let body = Paragraph::new(render_expanded(record)?).wrap(Wrap { trim: false });

        // Wrapped height decides how far the record can scroll
        let viewport = popup.height.saturating_sub(2) as usize;
        let content = body.line_count(popup.width.saturating_sub(2));
        self.state
            .set_zoom_scroll_max(content.saturating_sub(viewport));
        let scroll = self.state.zoom_scroll();

        let border = if record.level.is_error() {
            Color::Red
        } else {
            Color::Cyan
        };
        let block = Block::default()
            .title(format!(
                " {} · {} ",
                record.message,
                record.received_at.format("%H:%M:%S%.3f")
            ))
            .title_bottom(Line::from(format!(" {} ", record.level)).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            body.block(block)
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            popup,
        );

        if content > viewport {
            let track = popup.inner(Margin {
                vertical: 1,
                horizontal: 0,
            });
            render_scrollbar(frame, track, content, scroll, viewport);
        }
        Ok(())
    }

    fn footer_spans(&self) -> Vec<Span<'static>> {
        let k = &self.keys;
        let hints: Vec<(String, &str)> = match self.state.mode() {
            Mode::Live => vec![
                (pair(&k.move_up, &k.move_down), "scroll"),
                (hint(&k.confirm), "zoom"),
                (hint(&k.search), "search"),
                (pair(&k.jump_oldest, &k.jump_newest), "oldest/newest"),
                (hint(&k.quit), "quit"),
            ],
            Mode::Filtered => vec![
                (pair(&k.move_up, &k.move_down), "scroll"),
                (hint(&k.confirm), "zoom"),
                (hint(&k.search), "new search"),
                (hint(&k.dismiss), "clear filter"),
                (hint(&k.quit), "quit"),
            ],
            Mode::Searching => vec![
                (hint(&k.confirm), "apply"),
                (hint(&k.dismiss), "cancel"),
            ],
            Mode::Zoomed => vec![
                (pair(&k.move_up, &k.move_down), "scroll"),
                (hint(&k.copy), "copy"),
                (hint(&k.dismiss), "close"),
                (hint(&k.quit), "quit"),
            ],
        };

        let mut spans = Vec::new();
        if self.state.mode() == Mode::Searching {
            spans.push(Span::raw(" Type to search").dim());
        }
        for (key, label) in hints {
            spans.push(Span::raw(" "));
            spans.push(Span::raw(key).fg(Color::Yellow));
            spans.push(Span::raw(format!(" {} ", label)).dim());
        }
        spans
    }
}

/// First configured chord for a command, e.g. `[enter]`
fn hint(chords: &[String]) -> String {
    chords
        .first()
        .map(|chord| format!("[{}]", chord))
        .unwrap_or_default()
}

fn pair(a: &[String], b: &[String]) -> String {
    match (a.first(), b.first()) {
        (Some(a), Some(b)) => format!("[{}/{}]", a, b),
        _ => String::new(),
    }
}

fn render_scrollbar(frame: &mut Frame, area: Rect, total: usize, position: usize, viewport: usize) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");
    let mut scrollbar_state = ScrollbarState::new(total)
        .position(position)
        .viewport_content_length(viewport);
    frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
}

/// A rectangle covering `percent` of `area` in both directions
fn centered_rect(percent: u16, area: Rect) -> Rect {
    let margin = (100 - percent.min(100)) / 2;
    let vertical = Layout::vertical([
        Constraint::Percentage(margin),
        Constraint::Percentage(percent),
        Constraint::Percentage(margin),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage(margin),
        Constraint::Percentage(percent),
        Constraint::Percentage(margin),
    ])
    .split(vertical[1])[1]
}

impl Component for ViewerComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(command) = self.keymap.resolve(key, self.state.mode()) else {
            return Ok(None);
        };

        let action = match self.state.handle(command) {
            Outcome::Ignored => None,
            Outcome::Redraw => Some(Action::Render),
            Outcome::Quit => Some(Action::Quit),
            Outcome::Copy(text) => Some(Action::Copy(text)),
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let searching = self.state.mode() == Mode::Searching;

        let layout = if searching {
            Layout::vertical([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Records
                Constraint::Length(1), // Search bar
                Constraint::Length(2), // Footer
            ])
            .split(area)
        } else {
            Layout::vertical([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Records
                Constraint::Length(2), // Footer
            ])
            .split(area)
        };

        self.draw_header(frame, layout[0]);
        self.draw_list(frame, layout[1])?;

        if searching {
            self.draw_search_bar(frame, layout[2]);
        }

        let footer_area = if searching { layout[3] } else { layout[2] };
        let footer = Paragraph::new(Line::from(self.footer_spans())).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(footer, footer_area);

        if let Some(record) = self.state.zoomed().cloned() {
            self.draw_zoom(frame, area, &record)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for ViewerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerComponent")
            .field("mode", &self.state.mode())
            .field("cursor", &self.state.cursor())
            .field("source", &self.source)
            .finish()
    }
}
