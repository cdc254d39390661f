//! Key chord parsing and command lookup
//!
//! Chords like `"ctrl+c"`, `"k"` or `"pagedown"` come from the config and are
//! matched against crossterm key events. Single characters keep their case,
//! so `"g"` and `"G"` are different bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use logview_core::{Command, ConfigError, KeymapConfig, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // "+" on its own is the plus key, not a separator
    let parts: Vec<&str> = if trimmed == "+" {
        vec!["+"]
    } else {
        trimmed
            .split('+')
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect()
    };
    if parts.is_empty() {
        return None;
    }

    let mut chord = KeyChord {
        key: KeyCode::Null,
        ctrl: false,
        alt: false,
        shift: false,
    };

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            _ => {
                if chord.key != KeyCode::Null {
                    return None;
                }
                chord.key = parse_key(part)?;
            }
        }
    }

    if chord.key == KeyCode::Null {
        return None;
    }

    Some(chord)
}

fn parse_key(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        return Some(KeyCode::Char(first));
    }

    match key.to_lowercase().as_str() {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "space" | "spacebar" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        _ => None,
    }
}

pub fn matches_chord(event: KeyEvent, chord: &KeyChord) -> bool {
    let code_ok = match (event.code, chord.key) {
        // Terminals may report ctrl+letter in either case
        (KeyCode::Char(a), KeyCode::Char(b)) if chord.ctrl => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    };
    if !code_ok {
        return false;
    }

    let modifiers = event.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    // The case of a character already carries shift
    let shift_ok = matches!(chord.key, KeyCode::Char(_)) || shift == chord.shift;

    ctrl == chord.ctrl && alt == chord.alt && shift_ok
}

/// Resolved bindings
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyChord, Command)>,
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Result<Self, ConfigError> {
        let table: [(&str, &[String], Command); 11] = [
            ("quit", config.quit.as_slice(), Command::Quit),
            ("move_up", config.move_up.as_slice(), Command::MoveUp),
            ("move_down", config.move_down.as_slice(), Command::MoveDown),
            ("page_up", config.page_up.as_slice(), Command::PageUp),
            ("page_down", config.page_down.as_slice(), Command::PageDown),
            ("jump_newest", config.jump_newest.as_slice(), Command::JumpNewest),
            ("jump_oldest", config.jump_oldest.as_slice(), Command::JumpOldest),
            ("search", config.search.as_slice(), Command::OpenSearch),
            ("confirm", config.confirm.as_slice(), Command::Confirm),
            ("dismiss", config.dismiss.as_slice(), Command::Dismiss),
            ("copy", config.copy.as_slice(), Command::Copy),
        ];

        let mut bindings = Vec::new();
        for (action, chords, command) in table {
            for chord in chords {
                let parsed = parse_key_chord(chord).ok_or_else(|| ConfigError::InvalidKey {
                    action: action.to_string(),
                    chord: chord.clone(),
                })?;
                bindings.push((parsed, command.clone()));
            }
        }

        Ok(Self { bindings })
    }

    fn lookup(&self, event: KeyEvent) -> Option<&Command> {
        self.bindings
            .iter()
            .find(|(chord, _)| matches_chord(event, chord))
            .map(|(_, command)| command)
    }

    /// Translate a key press into a command for the given mode
    ///
    /// While typing a search, unmodified characters are always text, even
    /// when a binding claims them. Other confirm and dismiss chords and
    /// modified quit chords (e.g. ctrl+c) keep their meaning, and Enter and
    /// Esc always confirm or cancel the search.
    pub fn resolve(&self, event: KeyEvent, mode: Mode) -> Option<Command> {
        if mode != Mode::Searching {
            return self.lookup(event).cloned();
        }

        let text = is_text_input(event);
        match self.lookup(event) {
            Some(Command::Confirm) if !text => return Some(Command::Confirm),
            Some(Command::Dismiss) if !text => return Some(Command::Dismiss),
            Some(Command::Quit)
                if event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                return Some(Command::Quit);
            }
            _ => {}
        }

        match event.code {
            KeyCode::Char(c) if text => Some(Command::Input(c)),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Enter => Some(Command::Confirm),
            KeyCode::Esc => Some(Command::Dismiss),
            _ => None,
        }
    }
}

/// A plain character with no ctrl or alt held
fn is_text_input(event: KeyEvent) -> bool {
    matches!(event.code, KeyCode::Char(_))
        && !event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

impl Default for Keymap {
    fn default() -> Self {
        let config = KeymapConfig::default();
        let bindings = Self::from_config(&config).map(|k| k.bindings).unwrap_or_default();
        Self { bindings }
    }
}
