use crate::pipeline::config::{Config, EventSourceKind};
use crate::pipeline::emitter::{LogEmitter, ReportEmitter};
use crate::streamer_core::{
    config::{PublishConfig, StreamingConfig},
    event_source::EventSource,
    jsonl_source::JsonlSource,
    sse_client::TimelineStream,
    status_writer::StatusWriter,
};
use std::sync::Arc;

/// Open the configured event source
///
/// For the live stream this performs the initial connection, so an
/// unreachable server fails here rather than inside the running pipeline.
pub async fn open_source(
    config: &Config,
) -> Result<Box<dyn EventSource>, Box<dyn std::error::Error>> {
    let source: Box<dyn EventSource> = match &config.event_source {
        EventSourceKind::Streaming => {
            let streaming = StreamingConfig::from_config(config);
            Box::new(TimelineStream::connect(streaming).await?)
        }
        EventSourceKind::JsonlFile(path) => Box::new(JsonlSource::open(path).await?),
        EventSourceKind::Stdin => Box::new(JsonlSource::stdin()),
    };

    log::info!("📡 Event source: {}", source.source_type());
    Ok(source)
}

/// Pick the report emitter: publish as a status, or log only
pub fn build_emitter(
    config: &Config,
) -> Result<Arc<dyn ReportEmitter>, Box<dyn std::error::Error>> {
    let emitter: Arc<dyn ReportEmitter> = if config.enable_posts {
        Arc::new(StatusWriter::new(PublishConfig::from_config(config))?)
    } else {
        Arc::new(LogEmitter)
    };

    log::info!("📊 Report emitter: {}", emitter.emitter_type());
    Ok(emitter)
}
