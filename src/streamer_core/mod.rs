pub mod config;
pub mod error_handler;
pub mod event_source;
pub mod jsonl_source;
pub mod sse_client;
pub mod status_writer;

mod lib;

pub use config::{PublishConfig, StreamingConfig};
pub use event_source::{forward_events, EventSource, VecSource};
pub use lib::{build_emitter, open_source};
pub use sse_client::TimelineStream;
pub use status_writer::StatusWriter;
