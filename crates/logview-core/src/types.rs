//! Domain types for logview
//!
//! A [`LogRecord`] is one accepted input line. It keeps every original field
//! as unparsed JSON so that rendering can reproduce values exactly, and
//! promotes `level` and `msg` for theming and titles.

use crate::error::ParseError;
use chrono::{DateTime, Local};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::value::RawValue;
use std::fmt;

/// Field carrying the severity
pub const LEVEL_KEY: &str = "level";
/// Field carrying the human readable message
pub const MESSAGE_KEY: &str = "msg";

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Case-insensitive lookup of a severity name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" | "panic" => Some(Level::Fatal),
            _ => None,
        }
    }

    /// Error and Fatal records are shown in full, everything else is packed
    pub fn is_error(&self) -> bool {
        matches!(self, Level::Error | Level::Fatal)
    }

    /// Records rendered with the faint theme
    pub fn is_verbose(&self) -> bool {
        matches!(self, Level::Trace | Level::Debug)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Trace => write!(f, "TRACE"),
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
            Level::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Ordered mapping of field name to raw JSON value
///
/// Insertion order is the order keys appeared on the input line. A repeated
/// key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default)]
pub struct Fields(Vec<(String, Box<RawValue>)>);

impl Fields {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Copy of the named fields, in the order given
    pub fn project(&self, keys: &[&str]) -> Fields {
        Fields(
            keys.iter()
                .filter_map(|key| {
                    self.0
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(k, v)| (k.clone(), v.clone()))
                })
                .collect(),
        )
    }

    fn insert(&mut self, key: String, value: Box<RawValue>) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
                let mut fields = Fields(Vec::with_capacity(access.size_hint().unwrap_or(8)));
                while let Some((key, value)) = access.next_entry::<String, Box<RawValue>>()? {
                    fields.insert(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// One decoded log line
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Decoded `level`
    pub level: Level,
    /// Decoded `msg`
    pub message: String,
    /// Every field on the line, `level` and `msg` included
    pub fields: Fields,
    /// The line as received, used for searching
    pub raw: String,
    /// When the line was ingested
    pub received_at: DateTime<Local>,
}

impl LogRecord {
    /// Decode one input line
    ///
    /// Fails unless the line is a JSON object carrying a known string
    /// `level` and a string `msg`.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Fields = serde_json::from_str(line).map_err(|e| match e.classify() {
            Category::Data => ParseError::NotAnObject,
            _ => ParseError::Json(e),
        })?;

        let level_raw = fields
            .get(LEVEL_KEY)
            .ok_or(ParseError::MissingField(LEVEL_KEY))?;
        let level = serde_json::from_str::<String>(level_raw.get())
            .ok()
            .and_then(|name| Level::parse(&name))
            .ok_or_else(|| ParseError::InvalidLevel(level_raw.get().to_string()))?;

        let message_raw = fields
            .get(MESSAGE_KEY)
            .ok_or(ParseError::MissingField(MESSAGE_KEY))?;
        let message = serde_json::from_str::<String>(message_raw.get())
            .map_err(|_| ParseError::InvalidMessage)?;

        Ok(Self {
            level,
            message,
            fields,
            raw: line.to_string(),
            received_at: Local::now(),
        })
    }

    /// Literal, case-sensitive substring test against the raw line
    pub fn matches(&self, pattern: &str) -> bool {
        self.raw.contains(pattern)
    }

    /// The `{level, msg}` projection shown in packed rows
    pub fn promoted(&self) -> Fields {
        self.fields.project(&[LEVEL_KEY, MESSAGE_KEY])
    }

    /// Number of fields left out of a packed row
    pub fn hidden_field_count(&self) -> usize {
        self.fields.len().saturating_sub(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_keeps_all_fields_in_order() {
        let record =
            LogRecord::parse(r#"{"time":"12:00","level":"error","msg":"boom","code":500}"#)
                .unwrap();

        assert_eq!(record.level, Level::Error);
        assert_eq!(record.message, "boom");
        let keys: Vec<&str> = record.fields.keys().collect();
        assert_eq!(keys, vec!["time", "level", "msg", "code"]);
        assert_eq!(record.fields.get("code").unwrap().get(), "500");
    }

    #[test]
    fn test_parse_retains_raw_line() {
        let line = r#"{"level":"info", "msg":"ok"}"#;
        let record = LogRecord::parse(line).unwrap();
        assert_eq!(record.raw, line);
    }

    #[test]
    fn test_parse_level_aliases_case_insensitive() {
        let cases = [
            ("debug", Level::Debug),
            ("INFO", Level::Info),
            ("Warn", Level::Warn),
            ("warning", Level::Warn),
            ("ERROR", Level::Error),
            ("fatal", Level::Fatal),
            ("panic", Level::Fatal),
            ("trace", Level::Trace),
        ];
        for (name, expected) in cases {
            let line = format!(r#"{{"level":"{}","msg":"x"}}"#, name);
            assert_eq!(LogRecord::parse(&line).unwrap().level, expected, "{}", name);
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        let err = LogRecord::parse(r#"{"level":"loud","msg":"x"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLevel(_)));
    }

    #[test]
    fn test_parse_rejects_non_string_level() {
        let err = LogRecord::parse(r#"{"level":3,"msg":"x"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLevel(_)));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = LogRecord::parse(r#"{"msg":"x"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("level")));

        let err = LogRecord::parse(r#"{"level":"info"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("msg")));
    }

    #[test]
    fn test_parse_rejects_non_string_message() {
        let err = LogRecord::parse(r#"{"level":"info","msg":{"a":1}}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMessage));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(
            LogRecord::parse(r#"["level","msg"]"#).unwrap_err(),
            ParseError::NotAnObject
        ));
        assert!(matches!(
            LogRecord::parse("42").unwrap_err(),
            ParseError::NotAnObject
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            LogRecord::parse(r#"{"level":"info","msg":"#).unwrap_err(),
            ParseError::Json(_)
        ));
        assert!(matches!(
            LogRecord::parse("plain text line").unwrap_err(),
            ParseError::Json(_)
        ));
    }

    #[test]
    fn test_duplicate_key_keeps_position_takes_last_value() {
        let record = LogRecord::parse(r#"{"a":1,"level":"info","msg":"x","a":2}"#).unwrap();
        let keys: Vec<&str> = record.fields.keys().collect();
        assert_eq!(keys, vec!["a", "level", "msg"]);
        assert_eq!(record.fields.get("a").unwrap().get(), "2");
    }

    #[test]
    fn test_matches_is_literal_and_case_sensitive() {
        let record = LogRecord::parse(r#"{"level":"info","msg":"Request done (200)"}"#).unwrap();
        assert!(record.matches("done (200)"));
        assert!(record.matches(""));
        assert!(!record.matches("request"));
        assert!(!record.matches("done.*"));
    }

    #[test]
    fn test_promoted_projection_and_hidden_count() {
        let record =
            LogRecord::parse(r#"{"msg":"ok","user":"bob","level":"info","id":7}"#).unwrap();
        let promoted = record.promoted();
        let keys: Vec<&str> = promoted.keys().collect();
        assert_eq!(keys, vec!["level", "msg"]);
        assert_eq!(record.hidden_field_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_parse_keeps_every_key(extra in proptest::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..6)) {
            let mut line = String::from(r#"{"level":"info","msg":"hello""#);
            for (key, value) in &extra {
                if key == "level" || key == "msg" {
                    continue;
                }
                line.push_str(&format!(r#","{}":{}"#, key, value));
            }
            line.push('}');

            let record = LogRecord::parse(&line).unwrap();
            prop_assert!(record.fields.contains_key("level"));
            prop_assert!(record.fields.contains_key("msg"));
            for key in extra.keys() {
                prop_assert!(record.fields.contains_key(key));
            }
        }
    }
}
