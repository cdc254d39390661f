//! Navigation state machine
//!
//! [`ViewerState`] owns the interaction mode, the cursor and the active list.
//! It is driven one [`Command`] at a time from the UI loop; the match on
//! `(mode, command)` in [`ViewerState::handle`] is the whole transition table.
//!
//! The cursor counts from the newest record of the active list, so cursor 0
//! is always the bottom row of the list.

use crate::feed::Feed;
use crate::types::LogRecord;
use std::sync::Arc;

/// Rows moved by a page up/down
pub const PAGE_SIZE: usize = 10;

/// Interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Following the full feed
    Live,
    /// Navigating a confirmed search result
    Filtered,
    /// Typing a search pattern
    Searching,
    /// Showing one record expanded
    Zoomed,
}

/// A keystroke after keymap resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Towards older records
    MoveUp,
    /// Towards newer records
    MoveDown,
    PageUp,
    PageDown,
    JumpNewest,
    JumpOldest,
    OpenSearch,
    Confirm,
    Dismiss,
    Copy,
    /// Character typed into the search input
    Input(char),
    Backspace,
}

/// What the UI has to do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// State changed, draw again
    Redraw,
    /// Leave the application
    Quit,
    /// Put this text on the clipboard
    Copy(String),
}

/// One frame's worth of the active list, read at a single point in time
#[derive(Debug, Clone)]
pub struct VisibleRows {
    /// Active list length the rows were cut from
    pub total: usize,
    /// Oldest-first index of `records[0]`
    pub start: usize,
    /// Oldest-first index of the record under the cursor
    pub selected: Option<usize>,
    pub records: Vec<Arc<LogRecord>>,
}

/// Rows `[start, end)` of a `total`-long list to show in `height` lines
///
/// The newest rows stay pinned to the bottom until the cursor moves past
/// the first screen; after that the selected row is the top line.
pub fn visible_range(total: usize, cursor: usize, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    let cursor = cursor.min(total - 1);
    let end = if cursor < height {
        total
    } else {
        total - cursor + height - 1
    };
    (end.saturating_sub(height), end)
}

/// Records currently navigable
#[derive(Debug, Clone)]
enum ActiveList {
    /// The shared feed, growing underneath us
    Live,
    /// A frozen list owned by the view
    Snapshot(Vec<Arc<LogRecord>>),
}

/// All view state, mutated only by the UI loop
#[derive(Debug)]
pub struct ViewerState {
    feed: Feed,
    mode: Mode,
    cursor: usize,
    active: ActiveList,
    search_buffer: String,
    /// Mode restored when a search is cancelled or a zoom dismissed
    return_mode: Mode,
    zoomed: Option<Arc<LogRecord>>,
    /// First visible line of the zoomed record
    zoom_scroll: usize,
    /// Largest useful `zoom_scroll`, known once the overlay has been laid out
    zoom_scroll_max: usize,
    /// Pattern behind the current filtered list
    pattern: Option<String>,
}

impl ViewerState {
    pub fn new(feed: Feed) -> Self {
        Self {
            feed,
            mode: Mode::Live,
            cursor: 0,
            active: ActiveList::Live,
            search_buffer: String::new(),
            return_mode: Mode::Live,
            zoomed: None,
            zoom_scroll: 0,
            zoom_scroll_max: 0,
            pattern: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn search_buffer(&self) -> &str {
        &self.search_buffer
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn zoomed(&self) -> Option<&Arc<LogRecord>> {
        self.zoomed.as_ref()
    }

    pub fn zoom_scroll(&self) -> usize {
        self.zoom_scroll
    }

    /// Tell the state how far the zoomed record can scroll
    ///
    /// Called by whoever lays out the overlay: `max` is the number of
    /// expanded lines that do not fit. The current offset is clamped to it.
    pub fn set_zoom_scroll_max(&mut self, max: usize) {
        self.zoom_scroll_max = max;
        self.zoom_scroll = self.zoom_scroll.min(max);
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Mode the list underneath an overlay belongs to
    pub fn base_mode(&self) -> Mode {
        match self.mode {
            Mode::Searching | Mode::Zoomed => self.return_mode,
            mode => mode,
        }
    }

    pub fn active_len(&self) -> usize {
        match &self.active {
            ActiveList::Live => self.feed.len(),
            ActiveList::Snapshot(records) => records.len(),
        }
    }

    /// Active records in `start..end`, oldest first
    pub fn window(&self, start: usize, end: usize) -> Vec<Arc<LogRecord>> {
        match &self.active {
            ActiveList::Live => self.feed.window(start, end),
            ActiveList::Snapshot(records) => {
                let end = end.min(records.len());
                let start = start.min(end);
                records[start..end].to_vec()
            }
        }
    }

    /// The rows to draw in `height` lines
    ///
    /// The list length is read once, and the window and selection are both
    /// derived from it. The feed only grows, so an append racing with this
    /// call cannot shift rows that were already counted.
    pub fn visible(&self, height: usize) -> VisibleRows {
        let total = self.active_len();
        let (start, end) = visible_range(total, self.cursor, height);
        VisibleRows {
            total,
            start,
            selected: total.checked_sub(self.cursor + 1),
            records: self.window(start, end),
        }
    }

    /// Oldest-first index of the record under the cursor
    pub fn selected_index(&self) -> Option<usize> {
        self.active_len().checked_sub(self.cursor + 1)
    }

    /// The ingestion task appended a record
    pub fn on_append(&self) -> Outcome {
        if self.mode == Mode::Live {
            Outcome::Redraw
        } else {
            Outcome::Ignored
        }
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Outcome {
        let before = self.mode;
        let outcome = match (self.mode, command) {
            (_, Command::Quit) => Outcome::Quit,

            (Mode::Searching, Command::Input(c)) => {
                self.search_buffer.push(c);
                Outcome::Redraw
            }
            (Mode::Searching, Command::Backspace) => {
                if self.search_buffer.pop().is_some() {
                    Outcome::Redraw
                } else {
                    Outcome::Ignored
                }
            }
            (Mode::Searching, Command::Confirm) => self.confirm_search(),
            (Mode::Searching, Command::Dismiss) => self.cancel_search(),

            (Mode::Live | Mode::Filtered, Command::MoveUp) => self.move_to(self.cursor + 1),
            (Mode::Live | Mode::Filtered, Command::MoveDown) => {
                self.move_to(self.cursor.saturating_sub(1))
            }
            (Mode::Live | Mode::Filtered, Command::PageUp) => {
                self.move_to(self.cursor + PAGE_SIZE)
            }
            (Mode::Live | Mode::Filtered, Command::PageDown) => {
                self.move_to(self.cursor.saturating_sub(PAGE_SIZE))
            }
            (Mode::Live | Mode::Filtered, Command::JumpNewest) => self.move_to(0),
            (Mode::Live | Mode::Filtered, Command::JumpOldest) => self.move_to(usize::MAX),
            (Mode::Live | Mode::Filtered, Command::OpenSearch) => self.open_search(),
            (Mode::Live | Mode::Filtered, Command::Confirm) => self.zoom(),
            (Mode::Live, Command::Dismiss) => self.move_to(0),
            (Mode::Filtered, Command::Dismiss) => self.clear_filter(),

            (Mode::Zoomed, Command::Dismiss) => self.close_zoom(),
            (Mode::Zoomed, Command::MoveDown) => self.scroll_zoom_to(self.zoom_scroll + 1),
            (Mode::Zoomed, Command::MoveUp) => {
                self.scroll_zoom_to(self.zoom_scroll.saturating_sub(1))
            }
            (Mode::Zoomed, Command::PageDown) => {
                self.scroll_zoom_to(self.zoom_scroll + PAGE_SIZE)
            }
            (Mode::Zoomed, Command::PageUp) => {
                self.scroll_zoom_to(self.zoom_scroll.saturating_sub(PAGE_SIZE))
            }
            (Mode::Zoomed, Command::JumpOldest) => self.scroll_zoom_to(0),
            (Mode::Zoomed, Command::JumpNewest) => self.scroll_zoom_to(usize::MAX),
            (Mode::Zoomed, Command::Copy) => match &self.zoomed {
                Some(record) => Outcome::Copy(record.raw.clone()),
                None => Outcome::Ignored,
            },

            _ => Outcome::Ignored,
        };

        if self.mode != before {
            tracing::debug!("Mode {:?} -> {:?}", before, self.mode);
        }
        outcome
    }

    /// Clamp `target` into the active list and move there
    fn move_to(&mut self, target: usize) -> Outcome {
        let max = self.active_len().saturating_sub(1);
        let target = target.min(max);
        if target == self.cursor {
            return Outcome::Ignored;
        }
        self.cursor = target;
        Outcome::Redraw
    }

    /// Scroll the zoomed record so `target` is its first visible line
    fn scroll_zoom_to(&mut self, target: usize) -> Outcome {
        let target = target.min(self.zoom_scroll_max);
        if target == self.zoom_scroll {
            return Outcome::Ignored;
        }
        self.zoom_scroll = target;
        Outcome::Redraw
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.active_len().saturating_sub(1));
    }

    fn open_search(&mut self) -> Outcome {
        if self.mode == Mode::Live {
            self.active = ActiveList::Snapshot(self.feed.snapshot());
        }
        self.return_mode = self.mode;
        self.search_buffer.clear();
        self.mode = Mode::Searching;
        Outcome::Redraw
    }

    fn confirm_search(&mut self) -> Outcome {
        let pattern = self.search_buffer.trim().to_string();
        let base = match std::mem::replace(&mut self.active, ActiveList::Live) {
            ActiveList::Snapshot(records) => records,
            ActiveList::Live => self.feed.snapshot(),
        };
        let total = base.len();
        let matched: Vec<Arc<LogRecord>> = base
            .into_iter()
            .filter(|record| record.matches(&pattern))
            .collect();

        tracing::debug!(
            "Search {:?} matched {} of {} records",
            pattern,
            matched.len(),
            total
        );

        self.active = ActiveList::Snapshot(matched);
        self.search_buffer.clear();
        self.pattern = Some(pattern);
        self.mode = Mode::Filtered;
        self.clamp_cursor();
        Outcome::Redraw
    }

    fn cancel_search(&mut self) -> Outcome {
        self.search_buffer.clear();
        self.mode = self.return_mode;
        if self.mode == Mode::Live {
            self.active = ActiveList::Live;
        }
        self.clamp_cursor();
        Outcome::Redraw
    }

    fn zoom(&mut self) -> Outcome {
        if self.mode == Mode::Live {
            // Freeze the list underneath the overlay
            self.active = ActiveList::Snapshot(self.feed.snapshot());
        }

        let record = match (&self.active, self.selected_index()) {
            (ActiveList::Snapshot(records), Some(index)) => records.get(index).cloned(),
            _ => None,
        };

        let Some(record) = record else {
            if self.mode == Mode::Live {
                self.active = ActiveList::Live;
            }
            return Outcome::Ignored;
        };

        self.zoomed = Some(record);
        self.zoom_scroll = 0;
        self.zoom_scroll_max = 0;
        self.return_mode = self.mode;
        self.mode = Mode::Zoomed;
        Outcome::Redraw
    }

    fn close_zoom(&mut self) -> Outcome {
        self.zoomed = None;
        self.zoom_scroll = 0;
        self.mode = self.return_mode;
        if self.mode == Mode::Live {
            self.active = ActiveList::Live;
        }
        Outcome::Redraw
    }

    fn clear_filter(&mut self) -> Outcome {
        self.active = ActiveList::Live;
        self.pattern = None;
        self.cursor = 0;
        self.mode = Mode::Live;
        Outcome::Redraw
    }
}
