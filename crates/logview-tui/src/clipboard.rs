//! Copying a zoomed record to the system clipboard
//!
//! On Linux the clipboard contents vanish once the owning `Clipboard` is
//! dropped, so the handle lives on a short-lived background thread.

use std::thread;
#[cfg(target_os = "linux")]
use std::time::Duration;

/// How long the background thread keeps the selection alive on Linux
#[cfg(target_os = "linux")]
const LINGER: Duration = Duration::from_secs(2);

/// Copy `text` without blocking the UI loop
///
/// Failures are logged, never surfaced: the viewer keeps working without a
/// clipboard.
pub fn copy_record(text: String) {
    thread::spawn(move || {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                tracing::warn!("Failed to access clipboard: {}", e);
                return;
            }
        };

        if let Err(e) = clipboard.set_text(&text) {
            tracing::warn!("Failed to copy record: {}", e);
            return;
        }
        tracing::debug!("Copied {} bytes to clipboard", text.len());

        #[cfg(target_os = "linux")]
        thread::sleep(LINGER);
    });
}
