//! Window scheduler - closes a window once per configured interval
//!
//! Timer semantics:
//! - first firing is one interval after start (no immediate tick)
//! - a late firing pushes the schedule back; missed ticks are never replayed
//!   back-to-back (`MissedTickBehavior::Delay`)
//!
//! Each firing drains the store, builds the report and, when a report queue is
//! attached, queues it for the emitter task. Queueing never waits, so delivery
//! problems cannot delay the next window.

use super::emitter::ReportSender;
use super::engine::PipelineEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Run the window timer until `shutdown` flips to `true` (or its sender is dropped)
///
/// Arguments:
/// - `engine`: shared engine whose store is drained each window
/// - `window`: fixed window length
/// - `reports`: report queue, or `None` to drain without reporting
/// - `shutdown`: stop signal; the window in progress is abandoned
///
/// Returns the number of windows closed.
pub async fn window_scheduler_task(
    engine: Arc<PipelineEngine>,
    window: Duration,
    reports: Option<ReportSender>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    log::info!("⏰ Starting window scheduler (interval: {:?})", window);

    let mut timer = interval_at(Instant::now() + window, window);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut windows_closed = 0u64;

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let report = engine.close_window();
                windows_closed += 1;

                if let Some(sender) = &reports {
                    if let Err(e) = sender.submit(report) {
                        log::error!("❌ Could not queue report: {}", e);
                    }
                }
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    log::info!("🛑 Window scheduler stopping, abandoning window in progress");
                    break;
                }
            }
        }
    }

    log::info!("✅ Window scheduler stopped after {} windows", windows_closed);
    windows_closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::blocklist::{BlockSet, IgnoreSet};
    use crate::pipeline::emitter::report_channel;
    use crate::pipeline::engine::EngineOptions;
    use crate::pipeline::filter::FilterChain;
    use crate::pipeline::types::Post;

    fn make_engine() -> Arc<PipelineEngine> {
        Arc::new(PipelineEngine::new(
            FilterChain::new(IgnoreSet::new(["the"]), BlockSet::default()),
            EngineOptions::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_interval() {
        let engine = make_engine();
        let (sender, mut rx) = report_channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(window_scheduler_task(
            engine.clone(),
            Duration::from_secs(60),
            Some(sender),
            stop_rx,
        ));

        // Nothing before the first interval elapses
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(rx.try_recv().is_err());

        engine.process_post(&Post::new("alice", false, "hello"));
        tokio::time::sleep(Duration::from_secs(2)).await;
        let first = rx.recv().await.unwrap();
        assert_eq!(first.ranked[0].word, "hello");
        assert_eq!(first.posts_received, 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        let second = rx.recv().await.unwrap();
        assert!(second.ranked.is_empty());

        stop_tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_window_still_reports() {
        let engine = make_engine();
        let (sender, mut rx) = report_channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(window_scheduler_task(
            engine,
            Duration::from_secs(1),
            Some(sender),
            stop_rx,
        ));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let report = rx.recv().await.unwrap();
        assert!(report.ranked.is_empty());
        assert_eq!(report.posts_received, 0);
        assert_eq!(report.text, "Trending words on the Fediverse:");

        drop(stop_tx);
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_queue_still_drains() {
        let engine = make_engine();
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(window_scheduler_task(
            engine.clone(),
            Duration::from_secs(10),
            None,
            stop_rx,
        ));

        engine.process_post(&Post::new("alice", false, "word"));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(engine.store().is_empty());

        stop_tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_abandons_window() {
        let engine = make_engine();
        let (sender, mut rx) = report_channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(window_scheduler_task(
            engine.clone(),
            Duration::from_secs(30),
            Some(sender),
            stop_rx,
        ));

        engine.process_post(&Post::new("alice", false, "pending"));
        tokio::time::sleep(Duration::from_secs(5)).await;
        stop_tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), 0);
        // No report emitted, counts left in place
        assert!(rx.recv().await.is_none());
        assert_eq!(engine.store().count("pending"), 1);
    }
}
