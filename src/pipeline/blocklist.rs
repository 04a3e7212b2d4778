//! Static word and author lists loaded once at startup
//!
//! Both lists are newline-delimited text files. Lines are trimmed and blank
//! lines are skipped. The sets are immutable after loading and are shared
//! between tasks behind an `Arc`, so membership checks need no locking.
//!
//! - Ignore list: mandatory. A missing or unreadable file is a startup error.
//! - Block list: optional. A missing file yields an empty set.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum WordListError {
    Io { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for WordListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordListError::Io { path, source } => {
                write!(f, "Couldn't read list file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for WordListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WordListError::Io { source, .. } => Some(source),
        }
    }
}

/// Split newline-delimited text into trimmed, non-empty lines
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a newline-delimited list file
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, WordListError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| WordListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&text))
}

/// Words that are never counted
///
/// Entries are lower-cased on load so they compare against normalized words.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    words: HashSet<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load the mandatory ignore list
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let set = Self::new(read_lines(path.as_ref())?);
        log::info!("📋 {} ignored words loaded from {}", set.len(), path.as_ref().display());
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Author identities whose posts are discarded
#[derive(Debug, Clone, Default)]
pub struct BlockSet {
    accounts: HashSet<String>,
}

impl BlockSet {
    pub fn new<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            accounts: accounts
                .into_iter()
                .map(|a| a.as_ref().trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        }
    }

    /// Load the optional block list
    ///
    /// A missing file is not an error: the set is simply empty. Any other
    /// read failure is reported.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let path = path.as_ref();
        match read_lines(path) {
            Ok(lines) => {
                let set = Self::new(lines);
                log::info!("🚫 {} blocked users loaded from {}", set.len(), path.display());
                Ok(set)
            }
            Err(WordListError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("Blocked users file not found ({}), continuing", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn contains(&self, acct: &str) -> bool {
        self.accounts.contains(acct)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
