//! # Trending-word aggregation pipeline
//!
//! Consumes timeline posts, counts normalized words per window and emits a
//! ranked "trending words" report each time a window closes.
//!
//! ## Architecture
//!
//! ```text
//! EventSource → mpsc<StreamEvent> → ingestion loop
//!     ↓
//! PipelineEngine::process_post()
//!     ├─ FilterChain (bot / blocked author / ignore list)
//!     ├─ normalizer (strip, decode, lower, split, trim, dedup)
//!     └─ WordStore::record_post()          ← Mutex
//!
//! window scheduler (fixed interval)
//!     ↓
//! PipelineEngine::close_window()
//!     ├─ WordStore::drain_sorted()         ← same Mutex
//!     └─ ranker (count desc, word asc, top-K)
//!     ↓
//! mpsc<Report> → emitter task → ReportEmitter
//! ```
//!
//! Counts are in-memory only and are thrown away with each window.
//!
//! ## Module Organization
//!
//! - `types` - Post, StreamEvent, RankedWord, Report
//! - `normalizer` - raw text to unique normalized words
//! - `blocklist` - ignore / block list loading
//! - `filter` - post-level and word-level rejection
//! - `state` - shared counting store
//! - `ranker` - ordering, top-K and report text
//! - `engine` - per-post processing and window close
//! - `ingestion` - event channel consumer
//! - `scheduler` - window timer
//! - `emitter` - report delivery boundary
//! - `config` - JSON config and environment paths

pub mod types;
pub mod normalizer;
pub mod blocklist;
pub mod filter;
pub mod state;
pub mod ranker;
pub mod engine;
pub mod ingestion;
pub mod scheduler;
pub mod emitter;
pub mod config;

// Re-export commonly used types
pub use types::{Account, Post, RankedWord, Report, StreamEvent};
pub use blocklist::{BlockSet, IgnoreSet};
pub use filter::FilterChain;
pub use state::WordStore;
pub use engine::{EngineOptions, PipelineEngine, PostOutcome};
pub use emitter::{LogEmitter, ReportEmitter};
pub use config::Config;
