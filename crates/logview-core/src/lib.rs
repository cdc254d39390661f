//! logview-core: Record model, feed store and navigation state for logview
//!
//! Nothing in this crate touches the terminal. The TUI crate drives the
//! navigation state machine with keystrokes and draws whatever it exposes.

pub mod config;
pub mod error;
pub mod feed;
pub mod navigation;
pub mod scan;
pub mod types;

pub use config::{Config, KeymapConfig, UiConfig};
pub use error::{ConfigError, ParseError, RenderError};
pub use feed::Feed;
pub use navigation::{Command, Mode, Outcome, ViewerState, VisibleRows};
pub use scan::{JsonScanner, Role};
pub use types::{Level, LogRecord};
