//! Configuration loading
//!
//! Config is read from `<config_dir>/logview/config.yaml` unless a path is
//! given on the command line. Every key is optional; anything missing falls
//! back to the defaults below.
//!
//! ```yaml
//! keymap:
//!   quit: [q, ctrl+c]
//!   search: ["/"]
//! ui:
//!   show_scrollbar: false
//!   zoom_percent: 80
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_ZOOM_PERCENT: u16 = 50;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keymap: KeymapConfig,
    pub ui: UiConfig,
}

/// Key chords per command, e.g. `"ctrl+c"`, `"k"`, `"up"`
#[derive(Debug, Clone, PartialEq)]
pub struct KeymapConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub jump_newest: Vec<String>,
    pub jump_oldest: Vec<String>,
    pub search: Vec<String>,
    pub confirm: Vec<String>,
    pub dismiss: Vec<String>,
    pub copy: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub show_scrollbar: bool,
    /// Zoom overlay size as a percentage of the screen
    pub zoom_percent: u16,
}

fn chords(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: chords(&["q", "ctrl+c"]),
            move_up: chords(&["k", "up"]),
            move_down: chords(&["j", "down"]),
            page_up: chords(&["pageup"]),
            page_down: chords(&["pagedown"]),
            jump_newest: chords(&["G", "end"]),
            jump_oldest: chords(&["g", "home"]),
            search: chords(&["?", "/"]),
            confirm: chords(&["enter"]),
            dismiss: chords(&["esc"]),
            copy: chords(&["y"]),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            zoom_percent: DEFAULT_ZOOM_PERCENT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    keymap: Option<RawKeymap>,
    ui: Option<RawUi>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKeymap {
    quit: Option<Vec<String>>,
    move_up: Option<Vec<String>>,
    move_down: Option<Vec<String>>,
    page_up: Option<Vec<String>>,
    page_down: Option<Vec<String>>,
    jump_newest: Option<Vec<String>>,
    jump_oldest: Option<Vec<String>>,
    search: Option<Vec<String>>,
    confirm: Option<Vec<String>>,
    dismiss: Option<Vec<String>>,
    copy: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUi {
    show_scrollbar: Option<bool>,
    zoom_percent: Option<u16>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("logview").join("config.yaml"))
    }

    /// Load from an explicit path, or from the default location if present
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        tracing::info!("Loading config from {}", path.display());
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(contents)?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let keymap = raw.keymap.unwrap_or_default();
        let ui = raw.ui.unwrap_or_default();
        let d = defaults.keymap;

        let zoom_percent = ui.zoom_percent.unwrap_or(defaults.ui.zoom_percent);
        if !(10..=100).contains(&zoom_percent) {
            return Err(ConfigError::InvalidZoom(zoom_percent));
        }

        Ok(Self {
            keymap: KeymapConfig {
                quit: keymap.quit.unwrap_or(d.quit),
                move_up: keymap.move_up.unwrap_or(d.move_up),
                move_down: keymap.move_down.unwrap_or(d.move_down),
                page_up: keymap.page_up.unwrap_or(d.page_up),
                page_down: keymap.page_down.unwrap_or(d.page_down),
                jump_newest: keymap.jump_newest.unwrap_or(d.jump_newest),
                jump_oldest: keymap.jump_oldest.unwrap_or(d.jump_oldest),
                search: keymap.search.unwrap_or(d.search),
                confirm: keymap.confirm.unwrap_or(d.confirm),
                dismiss: keymap.dismiss.unwrap_or(d.dismiss),
                copy: keymap.copy.unwrap_or(d.copy),
            },
            ui: UiConfig {
                show_scrollbar: ui.show_scrollbar.unwrap_or(defaults.ui.show_scrollbar),
                zoom_percent,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = Config::from_yaml("   \n").unwrap();
        assert_eq!(config.keymap, KeymapConfig::default());
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_partial_keymap_overrides_only_given_keys() {
        let config = Config::from_yaml("keymap:\n  search: [\"/\"]\n  quit: [ctrl+q]\n").unwrap();
        assert_eq!(config.keymap.search, vec!["/".to_string()]);
        assert_eq!(config.keymap.quit, vec!["ctrl+q".to_string()]);
        assert_eq!(config.keymap.move_up, KeymapConfig::default().move_up);
    }

    #[test]
    fn test_ui_options() {
        let config = Config::from_yaml("ui:\n  show_scrollbar: false\n  zoom_percent: 80\n").unwrap();
        assert!(!config.ui.show_scrollbar);
        assert_eq!(config.ui.zoom_percent, 80);
    }

    #[test]
    fn test_zoom_percent_out_of_range() {
        let err = Config::from_yaml("ui:\n  zoom_percent: 150\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoom(150)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_yaml("keymap:\n  explode: [x]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keymap:\n  copy: [c]").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.keymap.copy, vec!["c".to_string()]);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
