//! Aggregation store: per-word counts plus window statistics
//!
//! The word map and the accepted-post counter share ONE mutex. Every write
//! (`increment`, `record_post`) and the drain take the same lock, so a drain is
//! a consistent cut: each increment lands in exactly one window.
//!
//! Invariant: a key is present only while its count is >= 1.

use super::ranker::rank_words;
use super::types::DrainedWindow;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct WindowState {
    counts: HashMap<String, u64>,
    posts_received: u64,
}

/// Thread-safe counting store shared by ingestion and the window scheduler
#[derive(Debug, Default)]
pub struct WordStore {
    inner: Mutex<WindowState>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock still holds valid counts.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add one occurrence of `word`
    pub fn increment(&self, word: &str) {
        let mut state = self.lock();
        bump(&mut state.counts, word);
    }

    /// Apply one accepted post: bump the post counter and every word once
    ///
    /// Runs in a single critical section so a drain never splits a post.
    pub fn record_post<S: AsRef<str>>(&self, words: &[S]) {
        let mut state = self.lock();
        state.posts_received += 1;
        for word in words {
            bump(&mut state.counts, word.as_ref());
        }
    }

    /// Take the window's contents and reset the store
    ///
    /// The snapshot is swapped out under the lock; sorting happens after the
    /// lock is released.
    pub fn drain_sorted(&self, top_k: usize) -> DrainedWindow {
        let (counts, posts_received) = {
            let mut state = self.lock();
            let counts = std::mem::take(&mut state.counts);
            let posts = std::mem::take(&mut state.posts_received);
            (counts, posts)
        };

        let distinct_words = counts.len();
        DrainedWindow {
            ranked: rank_words(counts, top_k),
            distinct_words,
            posts_received,
        }
    }

    /// Current count for `word` (0 if absent)
    pub fn count(&self, word: &str) -> u64 {
        self.lock().counts.get(word).copied().unwrap_or(0)
    }

    /// Posts accepted since the last drain
    pub fn posts_received(&self) -> u64 {
        self.lock().posts_received
    }

    pub fn distinct_words(&self) -> usize {
        self.lock().counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().counts.is_empty()
    }
}

fn bump(counts: &mut HashMap<String, u64>, word: &str) {
    if word.is_empty() {
        return;
    }
    match counts.get_mut(word) {
        Some(count) => *count += 1,
        None => {
            counts.insert(word.to_string(), 1);
        }
    }
}
