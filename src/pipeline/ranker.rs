//! Ranking and report formatting
//!
//! Ordering is count descending, then word ascending (byte-wise), so equal
//! counts always come out in the same order regardless of map layout.

use super::types::{DrainedWindow, RankedWord, Report};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Heading line of every report
pub const REPORT_HEADER: &str = "Trending words on the Fediverse:";

/// Default number of words per report
pub const DEFAULT_WORDS_TO_POST: i64 = 5;

/// Deterministic comparator: count desc, word asc
pub fn compare_ranked(a: &RankedWord, b: &RankedWord) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word))
}

/// Sort a drained count map and keep the top `top_k` entries
pub fn rank_words(counts: HashMap<String, u64>, top_k: usize) -> Vec<RankedWord> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<RankedWord> = counts
        .into_iter()
        .map(|(word, count)| RankedWord { word, count })
        .collect();

    if top_k < ranked.len() {
        ranked.select_nth_unstable_by(top_k - 1, compare_ranked);
        ranked.truncate(top_k);
    }
    ranked.sort_by(compare_ranked);
    ranked
}

/// Convert the configured `wordsToPost` into a top-K bound (negative means 0)
pub fn top_k(words_to_post: i64) -> usize {
    usize::try_from(words_to_post).unwrap_or(0)
}

/// Render the human-readable report body
pub fn format_report(ranked: &[RankedWord]) -> String {
    let mut text = String::from(REPORT_HEADER);
    for word in ranked {
        text.push_str(&format!("\n- {}, posted {} times", word.word, word.count));
    }
    text
}

/// Build the emitted report from a drained window
pub fn build_report(drained: DrainedWindow, closed_at: DateTime<Utc>) -> Report {
    Report {
        text: format_report(&drained.ranked),
        ranked: drained.ranked,
        posts_received: drained.posts_received,
        distinct_words: drained.distinct_words,
        closed_at,
    }
}
