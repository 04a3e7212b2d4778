//! Filter chain: post-level and word-level rejection
//!
//! Post-level checks run before any normalization work. Word-level checks run
//! on the normalized, deduplicated words of an accepted post.

use super::blocklist::{BlockSet, IgnoreSet};
use super::types::Post;

/// Why a post was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Author is flagged as an automated account
    Bot,
    /// Author identity is on the block list
    Blocked,
}

/// Result of filtering the words of one accepted post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSelection {
    /// Words to count, in first-occurrence order
    pub counted: Vec<String>,
    /// Words excluded by the ignore list
    pub ignored: usize,
}

/// Immutable filter state shared by every ingestion path
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    ignore: IgnoreSet,
    block: BlockSet,
}

impl FilterChain {
    pub fn new(ignore: IgnoreSet, block: BlockSet) -> Self {
        Self { ignore, block }
    }

    /// Decide whether a post is eligible at all
    pub fn check_post(&self, post: &Post) -> Result<(), Rejection> {
        if post.account.bot {
            return Err(Rejection::Bot);
        }
        if self.block.contains(&post.account.acct) {
            return Err(Rejection::Blocked);
        }
        Ok(())
    }

    /// Split normalized words into counted and ignored
    pub fn select_words(&self, words: Vec<String>) -> WordSelection {
        let mut selection = WordSelection::default();
        for word in words {
            if word.is_empty() {
                continue;
            }
            if self.ignore.contains(&word) {
                selection.ignored += 1;
            } else {
                selection.counted.push(word);
            }
        }
        selection
    }
}
