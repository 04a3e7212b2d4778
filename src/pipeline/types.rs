//! Core data types for the word-frequency pipeline
//!
//! `Post` and `Account` mirror the subset of a Mastodon status the pipeline reads.
//! Unknown fields are ignored so raw status JSON can be deserialized directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identity (`user` for local, `user@instance` for remote)
    pub acct: String,

    /// Whether the account is flagged as automated
    #[serde(default)]
    pub bot: bool,
}

/// A single inbound post (read-only, one event lifetime)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub account: Account,

    /// Raw body; may contain HTML markup and character entities
    #[serde(default)]
    pub content: String,
}

impl Post {
    pub fn new(acct: &str, bot: bool, content: &str) -> Self {
        Self {
            account: Account {
                acct: acct.to_string(),
                bot,
            },
            content: content.to_string(),
        }
    }

    /// Parse a post from a status JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Message produced by an event source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A new post arrived on the timeline
    Update(Post),
    /// Out-of-band error signal from the source (non-fatal)
    Error(String),
}

/// A word and its occurrence count for one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWord {
    pub word: String,
    pub count: u64,
}

impl RankedWord {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Raw output of a store drain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainedWindow {
    /// Top entries, count desc then word asc
    pub ranked: Vec<RankedWord>,
    /// Number of distinct words the store held before the drain
    pub distinct_words: usize,
    /// Posts accepted during the window
    pub posts_received: u64,
}

/// Finished report for one window, handed to the emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Formatted human-readable report
    pub text: String,
    /// Ranked words included in the report
    pub ranked: Vec<RankedWord>,
    pub posts_received: u64,
    pub distinct_words: usize,
    pub closed_at: DateTime<Utc>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
