//! Replay source: newline-delimited status JSON from a file or stdin
//!
//! Each non-blank line is one status document. Lines that fail to parse are
//! surfaced as `StreamEvent::Error` and reading continues.

use crate::pipeline::types::{Post, StreamEvent};
use crate::streamer_core::event_source::EventSource;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct JsonlSource<R> {
    lines: Lines<R>,
    line_number: u64,
    finished: bool,
}

impl<R: AsyncBufRead + Unpin + Send> JsonlSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            finished: false,
        }
    }
}

impl JsonlSource<BufReader<File>> {
    /// Open a replay file
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path.as_ref()).await?;
        log::info!("📖 Replaying statuses from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl JsonlSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        log::info!("📖 Reading statuses from stdin");
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for JsonlSource<R> {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    self.line_number += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(match Post::from_json(line) {
                        Ok(post) => StreamEvent::Update(post),
                        Err(e) => StreamEvent::Error(format!(
                            "malformed status on line {}: {}",
                            self.line_number, e
                        )),
                    });
                }
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(StreamEvent::Error(format!("read error: {}", e)));
                }
            }
        }
    }

    fn source_type(&self) -> &'static str {
        "jsonl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_statuses_and_reports_bad_lines() {
        let input = concat!(
            r#"{"content":"<p>hello</p>","account":{"acct":"alice","bot":false}}"#,
            "\n\n",
            "not json\n",
            r#"{"content":"beep","account":{"acct":"robot","bot":true}}"#,
            "\n"
        );
        let mut source = JsonlSource::new(BufReader::new(input.as_bytes()));

        match source.next_event().await {
            Some(StreamEvent::Update(post)) => assert_eq!(post.account.acct, "alice"),
            other => panic!("unexpected event: {:?}", other),
        }
        match source.next_event().await {
            Some(StreamEvent::Error(message)) => assert!(message.contains("line 3")),
            other => panic!("unexpected event: {:?}", other),
        }
        match source.next_event().await {
            Some(StreamEvent::Update(post)) => assert!(post.account.bot),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(source.next_event().await.is_none());
        assert!(source.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"content":"from file","account":{{"acct":"carol"}}}}"#).unwrap();

        let mut source = JsonlSource::open(file.path()).await.unwrap();
        match source.next_event().await {
            Some(StreamEvent::Update(post)) => assert_eq!(post.content, "from file"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(source.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlSource::open(dir.path().join("missing.jsonl")).await.is_err());
    }
}
