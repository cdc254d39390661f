//! UI components

pub mod viewer;

pub use viewer::ViewerComponent;

use crate::action::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

/// A drawable piece of the UI that reacts to key presses
pub trait Component {
    /// Handle a key press, optionally asking the app loop to do something
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>>;

    /// Draw into `area`
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
