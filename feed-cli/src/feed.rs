//! Recorded relay feeds.
//!
//! Each feed file is read by its own task and decoded events are sent to the
//! single task that owns the event holder. Relays re-broadcast the same
//! events, so the channel carries duplicates by design.

use anyhow::{Context, Result};
use holdback_feed_types::FeedEvent;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Line counts for one feed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Events decoded and sent.
    pub sent: usize,
    /// Lines that failed to decode.
    pub malformed: usize,
}

/// Read `path` line by line, sending every decodable event to `tx`.
///
/// Blank lines are skipped; malformed lines are logged and counted. Stops
/// early if the receiver is gone.
pub async fn read_feed(path: PathBuf, tx: mpsc::Sender<FeedEvent>) -> Result<FeedStats> {
    let file = File::open(&path)
        .await
        .with_context(|| format!("failed to open feed {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut stats = FeedStats::default();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .with_context(|| format!("failed to read feed {}", path.display()))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let decoded = std::str::from_utf8(&buf)
            .map_err(anyhow::Error::from)
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    FeedEvent::from_json_line(line)
                        .map(Some)
                        .map_err(anyhow::Error::from)
                }
            });

        match decoded {
            Ok(None) => {}
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    tracing::debug!(feed = %path.display(), "receiver closed, stopping");
                    break;
                }
                stats.sent += 1;
            }
            Err(e) => {
                tracing::warn!(
                    feed = %path.display(),
                    line = line_no,
                    error = %e,
                    "skipping malformed event"
                );
                stats.malformed += 1;
            }
        }
    }

    tracing::debug!(feed = %path.display(), sent = stats.sent, "feed finished");
    Ok(stats)
}

/// Start one reader task per feed, all sending into `tx`.
///
/// The caller's `tx` is consumed so the channel closes once every reader
/// finishes.
pub fn spawn_readers(
    paths: &[PathBuf],
    tx: mpsc::Sender<FeedEvent>,
) -> Vec<JoinHandle<Result<FeedStats>>> {
    paths
        .iter()
        .map(|path| tokio::spawn(read_feed(path.clone(), tx.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line(tag: u8, created_at: u64) -> String {
        format!(
            r#"{{"id":"{}","pubkey":"pk","created_at":{},"content":"n{}"}}"#,
            hex_tag(tag),
            created_at,
            tag
        )
    }

    fn hex_tag(tag: u8) -> String {
        format!("{:02x}", tag).repeat(32)
    }

    #[tokio::test]
    async fn reads_events_and_skips_junk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line(1, 10)).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{}", line(2, 20)).unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let stats = read_feed(file.path().to_path_buf(), tx).await.unwrap();

        assert_eq!(stats, FeedStats { sent: 2, malformed: 1 });
        assert_eq!(rx.recv().await.unwrap().content, "n1");
        assert_eq!(rx.recv().await.unwrap().content, "n2");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line(1, 10)).unwrap();
        file.write_all(b"\xff\xfe garbage\n").unwrap();
        writeln!(file, "{}", line(2, 20)).unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let stats = read_feed(file.path().to_path_buf(), tx).await.unwrap();

        assert_eq!(stats, FeedStats { sent: 2, malformed: 1 });
        assert_eq!(rx.recv().await.unwrap().content, "n1");
        assert_eq!(rx.recv().await.unwrap().content, "n2");
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", line(1, 10)).unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let stats = read_feed(file.path().to_path_buf(), tx).await.unwrap();

        assert_eq!(stats.sent, 1);
        assert_eq!(rx.recv().await.unwrap().content, "n1");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel(1);

        let err = read_feed(dir.path().join("absent.jsonl"), tx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.jsonl"));
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        for tag in 0..4 {
            writeln!(file, "{}", line(tag, tag as u64)).unwrap();
        }

        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let stats = read_feed(file.path().to_path_buf(), tx).await.unwrap();
        assert_eq!(stats.sent, 0);
    }
}
