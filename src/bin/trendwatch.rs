//! Trendwatch runtime
//!
//! - Loads the ignore list (required), block list (optional) and config.json
//! - Opens the event source (live stream or JSONL replay)
//! - Spawns ingestion, the window scheduler and the report emitter
//! - Runs until CTRL+C, then stops every task and exits
//!
//! Usage:
//!   cargo run --release --bin trendwatch
//!
//! Environment variables:
//!   TRENDWATCH_CONFIG - config file (default: config.json)
//!   IGNORE_LIST_PATH - ignored words (default: ignore.txt)
//!   BLOCK_LIST_PATH - blocked accounts (default: block.txt)
//!   RUST_LOG - log filter (default: info)

use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use trendwatch::pipeline::{
    blocklist::{BlockSet, IgnoreSet},
    config::{Config, Paths},
    emitter::{emitter_task, report_channel, REPORT_QUEUE_SIZE},
    engine::{EngineOptions, PipelineEngine},
    filter::FilterChain,
    ingestion::start_ingestion,
    scheduler::window_scheduler_task,
    types::StreamEvent,
};
use trendwatch::streamer_core::{build_emitter, forward_events, open_source};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    info!("🚀 Starting trendwatch");

    let paths = Paths::from_env();

    info!("Reading list of ignored words...");
    let ignore = IgnoreSet::load(&paths.ignore_list).map_err(|e| {
        error!("❌ {}", e);
        e
    })?;

    let block = BlockSet::load_optional(&paths.block_list).map_err(|e| {
        error!("❌ {}", e);
        e
    })?;

    let config = Config::load(&paths.config).map_err(|e| {
        error!("❌ {}", e);
        e
    })?;

    info!("📊 Configuration:");
    info!("   ├─ Interval: {:?}", config.post_interval);
    info!("   ├─ Words to post: {}", config.words_to_post);
    info!("   ├─ Publishing: {}", if config.enable_posts { "enabled" } else { "disabled" });
    info!("   ├─ Per-post logging: {}", config.log_posts);
    info!("   └─ Local timeline only: {}", config.local_only);

    let source = open_source(&config).await.map_err(|e| {
        error!("❌ Couldn't open event source: {}", e);
        e
    })?;
    let emitter = build_emitter(&config)?;

    let engine = Arc::new(PipelineEngine::new(
        FilterChain::new(ignore, block),
        EngineOptions {
            trim: config.trim.clone(),
            words_to_post: config.words_to_post,
            log_posts: config.log_posts,
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (event_tx, event_rx) = mpsc::channel::<StreamEvent>(config.channel_buffer);

    // With publishing disabled the emitter only logs each report
    let (report_sender, report_rx) = report_channel(REPORT_QUEUE_SIZE);
    let emitter_handle = tokio::spawn(emitter_task(report_rx, emitter));

    info!("🚀 Spawning background tasks...");

    let source_handle = tokio::spawn(forward_events(source, event_tx, shutdown_rx.clone()));
    let ingestion_handle = tokio::spawn(start_ingestion(
        event_rx,
        engine.clone(),
        shutdown_rx.clone(),
    ));
    let scheduler_handle = tokio::spawn(window_scheduler_task(
        engine.clone(),
        config.post_interval,
        Some(report_sender),
        shutdown_rx,
    ));

    info!("✅ Done. Entering event loop");
    info!("🔄 Press CTRL+C to shutdown");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("⚠️  Interrupt received, exiting..."),
        Err(err) => error!("❌ Failed to listen for CTRL+C: {}", err),
    }

    let _ = shutdown_tx.send(true);

    if let Err(e) = source_handle.await {
        error!("❌ Event source task failed: {}", e);
    }
    if let Err(e) = ingestion_handle.await {
        error!("❌ Ingestion task failed: {}", e);
    }
    match scheduler_handle.await {
        Ok(windows) => info!("✅ {} windows closed", windows),
        Err(e) => error!("❌ Scheduler task failed: {}", e),
    }
    // Scheduler dropped the last report sender; let queued reports finish
    if let Err(e) = emitter_handle.await {
        error!("❌ Emitter task failed: {}", e);
    }

    info!("✅ Trendwatch stopped");
    Ok(())
}
