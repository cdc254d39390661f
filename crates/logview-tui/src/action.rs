//! Actions passed from components back to the app loop

/// Something the app loop has to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the application
    Quit,
    /// Draw the next frame
    Render,
    /// Terminal was resized
    Resize(u16, u16),
    /// Copy text to the system clipboard
    Copy(String),
}
