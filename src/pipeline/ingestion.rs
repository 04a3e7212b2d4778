//! Pipeline ingestion - async channel processor for timeline events
//!
//! Event sources push `StreamEvent`s into an mpsc channel; this loop applies
//! each post to the engine. Posts are processed sequentially here, but the
//! engine's store is lock-guarded so other producers (or the window scheduler)
//! may touch it concurrently.

use super::engine::{PipelineEngine, PostOutcome};
use super::types::StreamEvent;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

/// Seconds between throughput log lines
const THROUGHPUT_LOG_SECS: u64 = 10;

/// Totals reported when ingestion stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub accepted: u64,
    pub rejected: u64,
    pub source_errors: u64,
}

/// Consume events until the channel closes or `shutdown` is signalled
///
/// Arguments:
/// - `rx`: receiver end of the event channel
/// - `engine`: shared engine (filter chain + store)
/// - `shutdown`: stop signal; increments already applied are kept
pub async fn start_ingestion(
    mut rx: mpsc::Receiver<StreamEvent>,
    engine: Arc<PipelineEngine>,
    mut shutdown: watch::Receiver<bool>,
) -> IngestionStats {
    log::info!("🚀 Starting ingestion");
    log::info!("   └─ Waiting for posts...");

    let mut stats = IngestionStats::default();
    let mut posts_since_log = 0u64;
    let mut last_log_time = Instant::now();
    let channel_capacity = rx.max_capacity();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(StreamEvent::Update(post)) => {
                        match engine.process_post(&post) {
                            PostOutcome::Accepted(_) => stats.accepted += 1,
                            PostOutcome::Rejected(_) => stats.rejected += 1,
                        }
                        posts_since_log += 1;
                    }
                    Some(StreamEvent::Error(message)) => {
                        stats.source_errors += 1;
                        log::warn!("⚠️  Error in timeline stream: {}", message);
                    }
                    None => {
                        log::warn!("⚠️  Event channel closed, stopping ingestion");
                        break;
                    }
                }

                if last_log_time.elapsed().as_secs() >= THROUGHPUT_LOG_SECS {
                    let posts_per_sec =
                        posts_since_log as f64 / last_log_time.elapsed().as_secs_f64();
                    log::info!(
                        "📊 Ingestion rate: {:.1} posts/sec | channel: {}/{}",
                        posts_per_sec,
                        rx.len(),
                        channel_capacity
                    );
                    last_log_time = Instant::now();
                    posts_since_log = 0;
                }
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    log::info!("🛑 Ingestion received shutdown signal");
                    break;
                }
            }
        }
    }

    log::info!(
        "✅ Ingestion stopped ({} accepted, {} rejected, {} source errors)",
        stats.accepted,
        stats.rejected,
        stats.source_errors
    );
    stats
}
