//! Append-only record feed shared between ingestion and the UI
//!
//! The ingestion task is the only writer. A record is wrapped in an `Arc`
//! before the write lock is taken, so readers only ever see complete
//! records, and nothing hands out mutable access once a record is in.

use crate::types::LogRecord;
use std::sync::{Arc, PoisonError, RwLock};

/// Ordered record sequence, index 0 is the oldest
#[derive(Debug, Clone, Default)]
pub struct Feed {
    records: Arc<RwLock<Vec<Arc<LogRecord>>>>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; returns the new length
    pub fn append(&self, record: LogRecord) -> usize {
        let record = Arc::new(record);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.push(record);
        records.len()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time copy of every record appended so far
    pub fn snapshot(&self) -> Vec<Arc<LogRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, index: usize) -> Option<Arc<LogRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    /// Records in `start..end`, clamped to the current length
    pub fn window(&self, start: usize, end: usize) -> Vec<Arc<LogRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let end = end.min(records.len());
        let start = start.min(end);
        records[start..end].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn record(msg: &str) -> LogRecord {
        LogRecord::parse(&format!(r#"{{"level":"info","msg":"{}"}}"#, msg)).unwrap()
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let feed = Feed::new();
        assert!(feed.is_empty());
        assert_eq!(feed.append(record("a")), 1);
        assert_eq!(feed.append(record("b")), 2);

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].message, "a");
        assert_eq!(snapshot[1].message, "b");
    }

    #[test]
    fn test_snapshot_is_independent_of_later_appends() {
        let feed = Feed::new();
        feed.append(record("a"));
        let snapshot = feed.snapshot();
        feed.append(record("b"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_window_clamps_to_length() {
        let feed = Feed::new();
        for msg in ["a", "b", "c"] {
            feed.append(record(msg));
        }

        let window = feed.window(1, 10);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].message, "b");
        assert!(feed.window(5, 9).is_empty());
        assert!(feed.get(3).is_none());
        assert_eq!(feed.get(2).unwrap().message, "c");
    }

    #[test]
    fn test_concurrent_reader_sees_prefix() {
        let feed = Feed::new();
        let writer = feed.clone();

        let handle = thread::spawn(move || {
            for i in 0..500 {
                writer.append(record(&format!("m{}", i)));
            }
        });

        let mut last_len = 0;
        while last_len < 500 {
            let snapshot = feed.snapshot();
            assert!(snapshot.len() >= last_len);
            if let Some(newest) = snapshot.last() {
                assert_eq!(newest.message, format!("m{}", snapshot.len() - 1));
            }
            last_len = snapshot.len();
        }

        handle.join().unwrap();
        assert_eq!(feed.len(), 500);
    }
}
