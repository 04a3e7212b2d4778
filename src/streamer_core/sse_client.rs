//! Live timeline source over the server-sent-events streaming API
//!
//! `GET {server}/api/v1/streaming/public` (or `/public/local`) with a bearer
//! token. The server sends blocks of `event:` / `data:` lines separated by a
//! blank line; `update` events carry a status JSON payload. Heartbeat comments
//! (lines starting with `:`) and other event types are ignored.
//!
//! Connection policy:
//! - the first connection is made by `TimelineStream::connect`; failure there
//!   is a startup error
//! - later disconnects reconnect with exponential backoff; once retries are
//!   exhausted the source ends
//! - a connection that sends nothing (not even heartbeats) for the idle
//!   timeout is treated as dead and reconnected

use crate::pipeline::types::{Post, StreamEvent};
use crate::streamer_core::config::StreamingConfig;
use crate::streamer_core::error_handler::{ExponentialBackoff, MaxRetriesExceeded};
use crate::streamer_core::event_source::EventSource;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::collections::VecDeque;
use std::time::Duration;

/// Longest silence tolerated on an open stream; servers send heartbeats well within this
pub const STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub enum ClientError {
    Connection(String),
    Status(u16),
    MaxRetries,
}

impl From<MaxRetriesExceeded> for ClientError {
    fn from(_: MaxRetriesExceeded) -> Self {
        ClientError::MaxRetries
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ClientError::Status(code) => write!(f, "Streaming endpoint returned HTTP {}", code),
            ClientError::MaxRetries => write!(f, "Maximum retry attempts exceeded"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Incremental parser for a server-sent-events byte stream
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns every event completed by this chunk
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }
        events
    }

    fn dispatch(&mut self) -> Option<StreamEvent> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data).join("\n");

        match event.as_deref() {
            Some("update") => Some(match Post::from_json(&data) {
                Ok(post) => StreamEvent::Update(post),
                Err(e) => StreamEvent::Error(format!("malformed update payload: {}", e)),
            }),
            Some("error") => Some(StreamEvent::Error(data)),
            _ => None,
        }
    }
}

/// Connected timeline stream
pub struct TimelineStream {
    client: reqwest::Client,
    config: StreamingConfig,
    response: Option<reqwest::Response>,
    parser: SseParser,
    pending: VecDeque<StreamEvent>,
    backoff: ExponentialBackoff,
    idle_timeout: Duration,
    exhausted: bool,
}

impl TimelineStream {
    /// Open the stream; an error here should abort startup
    pub async fn connect(config: StreamingConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        log::info!("🔌 Connecting to timeline stream: {}", config.timeline_url());
        let response = open_stream(&client, &config).await?;
        log::info!("✅ Connected to timeline stream");

        Ok(Self {
            client,
            config,
            response: Some(response),
            parser: SseParser::new(),
            pending: VecDeque::new(),
            backoff: ExponentialBackoff::for_stream(),
            idle_timeout: STREAM_IDLE_TIMEOUT,
            exhausted: false,
        })
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    async fn reconnect(&mut self) -> Result<(), ClientError> {
        loop {
            self.backoff.sleep().await?;
            match open_stream(&self.client, &self.config).await {
                Ok(response) => {
                    log::info!("✅ Reconnected to timeline stream");
                    self.backoff.reset();
                    self.parser = SseParser::new();
                    self.response = Some(response);
                    return Ok(());
                }
                Err(e) => log::error!("❌ Reconnect failed: {}", e),
            }
        }
    }
}

async fn open_stream(
    client: &reqwest::Client,
    config: &StreamingConfig,
) -> Result<reqwest::Response, ClientError> {
    let response = client
        .get(config.timeline_url())
        .bearer_auth(&config.access_token)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ClientError::Status(response.status().as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl EventSource for TimelineStream {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.exhausted {
                return None;
            }

            let Some(response) = self.response.as_mut() else {
                if let Err(e) = self.reconnect().await {
                    log::error!("❌ Giving up on timeline stream: {}", e);
                    self.exhausted = true;
                }
                continue;
            };

            let chunk = match tokio::time::timeout(self.idle_timeout, response.chunk()).await {
                Ok(chunk) => chunk,
                Err(_) => {
                    self.response = None;
                    return Some(StreamEvent::Error(format!(
                        "timeline stream idle for {:?}, reconnecting",
                        self.idle_timeout
                    )));
                }
            };

            match chunk {
                Ok(Some(bytes)) => {
                    let events = self.parser.feed(&bytes);
                    self.pending.extend(events);
                }
                Ok(None) => {
                    self.response = None;
                    return Some(StreamEvent::Error("timeline stream closed by server".to_string()));
                }
                Err(e) => {
                    self.response = None;
                    return Some(StreamEvent::Error(format!("timeline stream error: {}", e)));
                }
            }
        }
    }

    fn source_type(&self) -> &'static str {
        "streaming"
    }
}
