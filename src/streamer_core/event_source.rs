//! Event source boundary and the forwarding task that feeds the pipeline

use crate::pipeline::types::StreamEvent;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

/// Producer of timeline events
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the source is exhausted for good
    async fn next_event(&mut self) -> Option<StreamEvent>;

    /// Source name for logging
    fn source_type(&self) -> &'static str;
}

/// In-memory source that replays a fixed list of events
#[derive(Debug, Default)]
pub struct VecSource {
    events: std::collections::VecDeque<StreamEvent>,
}

impl VecSource {
    pub fn new(events: Vec<StreamEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

#[async_trait]
impl EventSource for VecSource {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.pop_front()
    }

    fn source_type(&self) -> &'static str {
        "memory"
    }
}

/// Pull events from `source` and push them into the ingestion channel
///
/// Stops when the source is exhausted, the channel closes, or `shutdown`
/// fires. Returns the number of events forwarded.
pub async fn forward_events(
    mut source: Box<dyn EventSource>,
    tx: mpsc::Sender<StreamEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    log::info!("📡 Forwarding events from {} source", source.source_type());

    let mut forwarded = 0u64;
    loop {
        let event = tokio::select! {
            event = source.next_event() => event,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        };

        let Some(event) = event else {
            log::info!("Event source exhausted");
            break;
        };

        if tx.send(event).await.is_err() {
            log::warn!("⚠️  Ingestion channel closed, stopping event source");
            break;
        }
        forwarded += 1;
    }

    log::info!("✅ Event source stopped after {} events", forwarded);
    forwarded
}
