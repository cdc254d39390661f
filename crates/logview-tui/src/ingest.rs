//! Ingestion task
//!
//! Reads newline-delimited JSON, appends every accepted record to the feed
//! and tells the UI loop about it. Lines that are not valid UTF-8 or do not
//! decode as a log record are dropped here and never reach the UI.

use logview_core::{Feed, LogRecord};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::SplitStream;

/// Where log lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Open the source for line reading
    pub async fn open(&self) -> std::io::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
            InputSource::File(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// Notifications from the ingestion task to the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    /// A record was appended; carries the new feed length
    Appended(usize),
    /// Input reached its end
    Closed,
    /// Reading failed; no more input will arrive
    Failed(String),
}

/// Line counts for one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub discarded: usize,
}

/// Run ingestion on its own task
pub fn spawn<R>(
    reader: R,
    feed: Feed,
    tx: mpsc::UnboundedSender<IngestEvent>,
) -> JoinHandle<IngestStats>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(ingest(reader, feed, tx))
}

/// Read `reader` to the end, appending records to `feed`
pub async fn ingest<R>(reader: R, feed: Feed, tx: mpsc::UnboundedSender<IngestEvent>) -> IngestStats
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = IngestStats::default();
    let mut lines = SplitStream::new(reader.split(b'\n'));

    while let Some(line) = lines.next().await {
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                let _ = tx.send(IngestEvent::Failed(e.to_string()));
                return stats;
            }
        };

        let Some(record) = decode(&bytes) else {
            stats.discarded += 1;
            continue;
        };

        let len = feed.append(record);
        stats.accepted += 1;

        if tx.send(IngestEvent::Appended(len)).is_err() {
            // UI is gone; nobody is left to read the feed
            tracing::debug!("UI loop closed, stopping ingestion");
            return stats;
        }
    }

    tracing::info!(
        "End of input: {} records accepted, {} lines discarded",
        stats.accepted,
        stats.discarded
    );
    let _ = tx.send(IngestEvent::Closed);
    stats
}

fn decode(bytes: &[u8]) -> Option<LogRecord> {
    let line = std::str::from_utf8(bytes).ok()?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }

    match LogRecord::parse(line) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!("Discarding line: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &'static [u8]) -> (Feed, IngestStats, Vec<IngestEvent>) {
        let feed = Feed::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stats = ingest(BufReader::new(input), feed.clone(), tx).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        (feed, stats, events)
    }

    #[tokio::test]
    async fn test_accepts_records_in_order() {
        let input = b"{\"level\":\"error\",\"msg\":\"boom\",\"code\":500}\n{\"level\":\"info\",\"msg\":\"ok\"}\n";
        let (feed, stats, events) = run(input).await;

        assert_eq!(stats, IngestStats { accepted: 2, discarded: 0 });
        assert_eq!(
            events,
            vec![
                IngestEvent::Appended(1),
                IngestEvent::Appended(2),
                IngestEvent::Closed
            ]
        );
        let records = feed.snapshot();
        assert_eq!(records[0].message, "boom");
        assert_eq!(records[1].message, "ok");
    }

    #[tokio::test]
    async fn test_discards_bad_lines_silently() {
        let input = b"not json\n{\"level\":\"info\"}\n\n[1,2]\n{\"level\":\"info\",\"msg\":\"kept\"}\n\xff\xfe\n";
        let (feed, stats, events) = run(input).await;

        assert_eq!(stats, IngestStats { accepted: 1, discarded: 5 });
        assert_eq!(feed.len(), 1);
        assert_eq!(events, vec![IngestEvent::Appended(1), IngestEvent::Closed]);
    }

    #[tokio::test]
    async fn test_handles_crlf_and_missing_final_newline() {
        let input = b"{\"level\":\"info\",\"msg\":\"a\"}\r\n{\"level\":\"warn\",\"msg\":\"b\"}";
        let (feed, stats, _) = run(input).await;

        assert_eq!(stats.accepted, 2);
        let records = feed.snapshot();
        assert_eq!(records[0].raw, r#"{"level":"info","msg":"a"}"#);
        assert_eq!(records[1].message, "b");
    }

    #[tokio::test]
    async fn test_stops_when_ui_is_gone() {
        let feed = Feed::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let input: &[u8] = b"{\"level\":\"info\",\"msg\":\"a\"}\n{\"level\":\"info\",\"msg\":\"b\"}\n";
        let stats = ingest(BufReader::new(input), feed.clone(), tx).await;
        assert_eq!(stats.accepted, 1);
    }

    #[tokio::test]
    async fn test_spawned_task_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.jsonl");
        std::fs::write(&path, "{\"level\":\"info\",\"msg\":\"from file\"}\n").unwrap();

        let reader = InputSource::File(path).open().await.unwrap();
        let feed = Feed::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let stats = spawn(reader, feed.clone(), tx).await.unwrap();

        assert_eq!(stats.accepted, 1);
        assert_eq!(feed.get(0).unwrap().message, "from file");
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_open() {
        let source = InputSource::File(PathBuf::from("/definitely/not/here.jsonl"));
        assert!(source.open().await.is_err());
    }
}
