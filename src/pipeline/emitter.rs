//! Report delivery boundary
//!
//! The scheduler never calls an emitter directly. Reports go through a bounded
//! FIFO channel to a single delivery task, so:
//! - a slow or failing emitter cannot stall the window timer
//! - reports are delivered one at a time, in the order windows closed
//!
//! If the channel is full the newest report is dropped with a warning.

use super::types::Report;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Reports waiting for delivery before new ones are dropped
pub const REPORT_QUEUE_SIZE: usize = 16;

#[derive(Debug)]
pub enum EmitError {
    Http(String),
    Rejected { status: u16, body: String },
    Closed,
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::Http(msg) => write!(f, "HTTP error: {}", msg),
            EmitError::Rejected { status, body } => {
                write!(f, "Report rejected with status {}: {}", status, body)
            }
            EmitError::Closed => write!(f, "Report queue closed"),
        }
    }
}

impl std::error::Error for EmitError {}

#[async_trait]
pub trait ReportEmitter: Send + Sync {
    /// Deliver one report
    async fn emit(&self, report: &Report) -> Result<(), EmitError>;

    /// Emitter name for logging
    fn emitter_type(&self) -> &'static str;
}

/// Emitter that only writes the report to the log
#[derive(Debug, Default, Clone)]
pub struct LogEmitter;

#[async_trait]
impl ReportEmitter for LogEmitter {
    async fn emit(&self, report: &Report) -> Result<(), EmitError> {
        log::info!(
            "📝 Report for window closed at {} (publishing disabled):\n{}",
            report.closed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.text
        );
        Ok(())
    }

    fn emitter_type(&self) -> &'static str {
        "log"
    }
}

/// Producer side of the report queue
#[derive(Debug, Clone)]
pub struct ReportSender {
    tx: mpsc::Sender<Report>,
}

impl ReportSender {
    /// Queue a report without waiting
    pub fn submit(&self, report: Report) -> Result<(), EmitError> {
        match self.tx.try_send(report) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(report)) => {
                log::warn!(
                    "⚠️  Report queue full, dropping report for window closed at {}",
                    report.closed_at
                );
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(EmitError::Closed),
        }
    }
}

/// Create the report queue
pub fn report_channel(capacity: usize) -> (ReportSender, mpsc::Receiver<Report>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ReportSender { tx }, rx)
}

/// Delivery task: hands queued reports to the emitter one by one
///
/// Runs until every `ReportSender` is dropped. Failures are logged and the
/// next report is still delivered.
pub async fn emitter_task(mut rx: mpsc::Receiver<Report>, emitter: Arc<dyn ReportEmitter>) {
    log::info!("📤 Report emitter started (backend: {})", emitter.emitter_type());

    let mut delivered = 0u64;
    while let Some(report) = rx.recv().await {
        match emitter.emit(&report).await {
            Ok(()) => {
                delivered += 1;
                log::debug!("✅ Report delivered ({} words)", report.ranked.len());
            }
            Err(e) => {
                log::error!("❌ Failed to emit report: {}", e);
            }
        }
    }

    log::info!("✅ Report emitter stopped ({} reports delivered)", delivered);
}
