//! Error types for logview-core

use thiserror::Error;

/// Reasons an input line is rejected by the record model
#[derive(Error, Debug)]
pub enum ParseError {
    /// Line is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Line is valid JSON but not an object
    #[error("Log line is not a JSON object")]
    NotAnObject,

    /// A promoted field is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// `level` is not a recognised severity
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// `msg` is not a JSON string
    #[error("Field `msg` is not a string")]
    InvalidMessage,
}

/// Errors raised while re-serializing a record for display
///
/// A record that parsed must always re-serialize, so this indicates a
/// broken invariant rather than bad input.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Field mapping could not be serialized
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A key binding could not be understood
    #[error("Invalid key binding for `{action}`: {chord:?}")]
    InvalidKey { action: String, chord: String },

    /// Zoom overlay size outside 10..=100
    #[error("Invalid zoom_percent: {0} (expected 10..=100)")]
    InvalidZoom(u16),
}
