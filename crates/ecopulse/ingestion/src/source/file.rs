//! JSON-lines file tail

use super::pump::{Pump, PumpItem};
use super::EventSource;
use crate::error::SourceError;
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;

/// How often the tail checks for new data at end of file.
const TAIL_INTERVAL: Duration = Duration::from_millis(100);

/// Follows a file and yields each complete, non-blank line. A file that
/// shrinks below the read position is treated as rotated and re-read from
/// the start.
#[derive(Debug)]
pub struct JsonLinesFileSource {
    pump: Pump,
}

impl JsonLinesFileSource {
    /// Open `path`. Unless `from_start` is set, only lines written after
    /// opening are yielded.
    pub async fn open(path: impl AsRef<Path>, from_start: bool) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let refused = |e: std::io::Error| SourceError::Connect {
            target: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut file = File::open(&path).await.map_err(refused)?;
        let offset = if from_start {
            0
        } else {
            file.seek(SeekFrom::End(0)).await.map_err(refused)?
        };

        tracing::info!(path = %path.display(), from_start, "tailing file");

        let reader = BufReader::new(file);
        let pump = Pump::spawn(move |tx| tail_lines(path, reader, offset, tx));
        Ok(Self { pump })
    }
}

#[async_trait]
impl EventSource for JsonLinesFileSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, SourceError> {
        self.pump.poll(timeout).await
    }

    async fn close(&mut self) {
        self.pump.stop();
    }
}

async fn tail_lines(
    path: PathBuf,
    mut reader: BufReader<File>,
    mut offset: u64,
    tx: mpsc::Sender<PumpItem>,
) {
    let mut line = Vec::new();
    loop {
        let read = reader.read_until(b'\n', &mut line).await;
        if let Ok(n) = read {
            offset += n as u64;
        }
        match read {
            Ok(0) => {
                if tx.is_closed() {
                    break;
                }
                let len = match reader.get_ref().metadata().await {
                    Ok(metadata) => metadata.len(),
                    Err(_) => offset,
                };
                if len < offset {
                    tracing::warn!(
                        path = %path.display(),
                        len,
                        offset,
                        "file truncated, reading from start"
                    );
                    if let Err(e) = reader.seek(SeekFrom::Start(0)).await {
                        let _ = tx.send(Err(SourceError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                    offset = 0;
                    line.clear();
                    continue;
                }
                tokio::time::sleep(TAIL_INTERVAL).await;
            }
            // A trailing fragment stays buffered until its newline arrives.
            Ok(_) if !line.ends_with(b"\n") => {}
            Ok(_) => {
                let payload = line.trim_ascii().to_vec();
                line.clear();
                if payload.is_empty() {
                    continue;
                }
                if tx.send(Ok(payload)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(SourceError::ConnectionLost(e.to_string()))).await;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn reads_existing_lines_from_start() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"timestamp":"a"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"timestamp":"b"}}"#).unwrap();
        file.flush().unwrap();

        let mut source = JsonLinesFileSource::open(file.path(), true).await.unwrap();
        assert_eq!(source.poll(WAIT).await.unwrap(), Some(br#"{"timestamp":"a"}"#.to_vec()));
        assert_eq!(source.poll(WAIT).await.unwrap(), Some(br#"{"timestamp":"b"}"#.to_vec()));
        assert_eq!(source.poll(Duration::from_millis(50)).await.unwrap(), None);
        source.close().await;
    }

    #[tokio::test]
    async fn follows_appends_and_joins_partial_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"timestamp":"old"}}"#).unwrap();
        file.flush().unwrap();

        let mut source = JsonLinesFileSource::open(file.path(), false).await.unwrap();

        write!(file, r#"{{"timestamp":"#).unwrap();
        file.flush().unwrap();
        tokio::time::sleep(TAIL_INTERVAL * 2).await;
        writeln!(file, r#""new"}}"#).unwrap();
        file.flush().unwrap();

        assert_eq!(source.poll(WAIT).await.unwrap(), Some(br#"{"timestamp":"new"}"#.to_vec()));
        source.close().await;
    }

    #[tokio::test]
    async fn truncated_file_is_reread_from_start() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"timestamp":"before-rotation","aqi":120.0}}"#).unwrap();
        file.flush().unwrap();

        let mut source = JsonLinesFileSource::open(file.path(), true).await.unwrap();
        assert_eq!(
            source.poll(WAIT).await.unwrap(),
            Some(br#"{"timestamp":"before-rotation","aqi":120.0}"#.to_vec())
        );

        file.as_file().set_len(0).unwrap();
        file.as_file_mut().seek(SeekFrom::Start(0)).unwrap();
        writeln!(file, r#"{{"timestamp":"after"}}"#).unwrap();
        file.flush().unwrap();

        assert_eq!(source.poll(WAIT).await.unwrap(), Some(br#"{"timestamp":"after"}"#.to_vec()));
        source.close().await;
    }

    #[tokio::test]
    async fn missing_file_is_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonLinesFileSource::open(dir.path().join("absent.jsonl"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Connect { .. }));
    }
}
