//! Pipeline Engine - per-post processing and window close
//!
//! ```text
//! Post
//!   ↓
//! FilterChain::check_post()      (bot / blocked → discard, no side effects)
//!   ↓
//! normalizer::normalize()        (strip, decode, lower, split, trim, dedup)
//!   ↓
//! FilterChain::select_words()    (ignore list)
//!   ↓
//! WordStore::record_post()       (single critical section)
//!
//! timer → PipelineEngine::close_window() → WordStore::drain_sorted() → Report
//! ```
//!
//! The engine is cheap to share: the filter chain is immutable and the store
//! carries its own lock, so `process_post` takes `&self` and may run from any
//! number of tasks at once.

use super::filter::{FilterChain, Rejection};
use super::normalizer::{normalize, TrimSet};
use super::ranker::{build_report, top_k};
use super::state::WordStore;
use super::types::{Post, Report};
use chrono::Utc;
use std::sync::Arc;

/// What happened to a single post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Rejected(Rejection),
    Accepted(PostSummary),
}

/// Observability record for an accepted post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSummary {
    /// Raw tokens from the space split
    pub total_tokens: usize,
    /// Words that were counted
    pub counted: usize,
    /// Words excluded by the ignore list
    pub ignored: usize,
    /// Repeats of a word already seen in this post
    pub duplicates: usize,
}

impl PostSummary {
    /// Per-post observability line
    pub fn log_line(&self, acct: &str) -> String {
        format!(
            "Collected {} words from post by {} ({} seen, {} ignored, {} duplicate)",
            self.counted, acct, self.total_tokens, self.ignored, self.duplicates
        )
    }
}

/// Engine options that come from configuration
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub trim: TrimSet,
    pub words_to_post: i64,
    pub log_posts: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            trim: TrimSet::default(),
            words_to_post: super::ranker::DEFAULT_WORDS_TO_POST,
            log_posts: false,
        }
    }
}

pub struct PipelineEngine {
    filter: Arc<FilterChain>,
    store: Arc<WordStore>,
    options: EngineOptions,
}

impl PipelineEngine {
    pub fn new(filter: FilterChain, options: EngineOptions) -> Self {
        Self::with_store(Arc::new(filter), Arc::new(WordStore::new()), options)
    }

    /// Build an engine around an existing store (shared with other owners)
    pub fn with_store(
        filter: Arc<FilterChain>,
        store: Arc<WordStore>,
        options: EngineOptions,
    ) -> Self {
        Self {
            filter,
            store,
            options,
        }
    }

    /// Run one post through the filter chain and into the store
    pub fn process_post(&self, post: &Post) -> PostOutcome {
        if let Err(rejection) = self.filter.check_post(post) {
            log::debug!("Discarded post by {} ({:?})", post.account.acct, rejection);
            return PostOutcome::Rejected(rejection);
        }

        let normalized = normalize(&post.content, &self.options.trim);
        let selection = self.filter.select_words(normalized.words);

        self.store.record_post(selection.counted.as_slice());

        let summary = PostSummary {
            total_tokens: normalized.total_tokens,
            counted: selection.counted.len(),
            ignored: selection.ignored,
            duplicates: normalized.duplicates,
        };

        if self.options.log_posts {
            log::info!("{}", summary.log_line(&post.account.acct));
        }

        PostOutcome::Accepted(summary)
    }

    /// Drain the store and build the report for the window that just ended
    pub fn close_window(&self) -> Report {
        let drained = self.store.drain_sorted(top_k(self.options.words_to_post));
        let report = build_report(drained, Utc::now());

        log::info!(
            "⏰ Aggregation triggered. Total posts received: {} ({} distinct words)",
            report.posts_received,
            report.distinct_words
        );
        if !report.is_empty() {
            log::info!("Top {} words:", report.ranked.len());
            for word in &report.ranked {
                log::info!("   {}, posted {} times", word.word, word.count);
            }
        }

        report
    }

    pub fn store(&self) -> &Arc<WordStore> {
        &self.store
    }
}
