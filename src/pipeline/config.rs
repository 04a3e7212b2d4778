//! Runtime configuration
//!
//! File locations come from environment variables (a `.env` file is honored by
//! the binary). The main settings live in a JSON document:
//!
//! ```json
//! {
//!   "credentials": {
//!     "server": "https://mastodon.example",
//!     "clientID": "...",
//!     "clientSecret": "...",
//!     "accessToken": "..."
//!   },
//!   "localOnly": false,
//!   "logposts": false,
//!   "postInterval": "1h",
//!   "wordsToPost": 5,
//!   "enablePosts": true,
//!   "postVisibility": "unlisted"
//! }
//! ```
//!
//! Environment variables:
//! - `TRENDWATCH_CONFIG` (default: config.json)
//! - `IGNORE_LIST_PATH` (default: ignore.txt)
//! - `BLOCK_LIST_PATH` (default: block.txt)

use super::normalizer::{TrimSet, DEFAULT_TRIM_CHARS};
use super::ranker::DEFAULT_WORDS_TO_POST;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Couldn't read config file: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Couldn't parse config file: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Remote account credentials, passed through to the network edges untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub server: String,
    #[serde(rename = "clientID", default)]
    pub client_id: String,
    #[serde(rename = "clientSecret", default)]
    pub client_secret: String,
    #[serde(rename = "accessToken", default)]
    pub access_token: String,
}

impl Credentials {
    /// Server URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server.trim_end_matches('/')
    }
}

/// Raw JSON document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    credentials: Credentials,
    #[serde(default)]
    local_only: bool,
    #[serde(rename = "logposts", default)]
    log_posts: bool,
    post_interval: String,
    #[serde(default = "default_words_to_post")]
    words_to_post: i64,
    #[serde(default)]
    enable_posts: bool,
    #[serde(rename = "postVisibility", default = "default_visibility")]
    visibility: String,
    #[serde(default)]
    trim_chars: Option<String>,
    #[serde(default)]
    event_source: Option<String>,
    #[serde(default = "default_channel_buffer")]
    channel_buffer: usize,
}

fn default_words_to_post() -> i64 {
    DEFAULT_WORDS_TO_POST
}

fn default_visibility() -> String {
    "public".to_string()
}

fn default_channel_buffer() -> usize {
    10_000
}

/// Where posts come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSourceKind {
    /// Live streaming timeline of the configured server
    Streaming,
    /// Newline-delimited status JSON from a file
    JsonlFile(PathBuf),
    /// Newline-delimited status JSON from stdin
    Stdin,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub local_only: bool,
    pub log_posts: bool,
    pub post_interval: Duration,
    pub words_to_post: i64,
    pub enable_posts: bool,
    pub visibility: String,
    pub trim: TrimSet,
    pub event_source: EventSourceKind,
    pub channel_buffer: usize,
}

impl Config {
    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let post_interval = parse_duration(&file.post_interval)?;
        if post_interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "postInterval must be greater than zero".to_string(),
            ));
        }

        if file.channel_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "channelBuffer must be greater than zero".to_string(),
            ));
        }

        let event_source = match file.event_source.as_deref().map(str::trim) {
            None | Some("") => EventSourceKind::Streaming,
            Some("-") => EventSourceKind::Stdin,
            Some(path) => EventSourceKind::JsonlFile(PathBuf::from(path)),
        };

        let needs_server = file.enable_posts || event_source == EventSourceKind::Streaming;
        if needs_server {
            let server = &file.credentials.server;
            if !server.starts_with("http://") && !server.starts_with("https://") {
                return Err(ConfigError::InvalidValue(
                    "credentials.server must start with http:// or https://".to_string(),
                ));
            }
        }

        let trim = TrimSet::new(file.trim_chars.as_deref().unwrap_or(DEFAULT_TRIM_CHARS));

        Ok(Self {
            credentials: file.credentials,
            local_only: file.local_only,
            log_posts: file.log_posts,
            post_interval,
            words_to_post: file.words_to_post,
            enable_posts: file.enable_posts,
            visibility: file.visibility,
            trim,
            event_source,
            channel_buffer: file.channel_buffer,
        })
    }

    /// Load the config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

/// File locations resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config: PathBuf,
    pub ignore_list: PathBuf,
    pub block_list: PathBuf,
}

impl Paths {
    pub fn from_env() -> Self {
        Self {
            config: env::var("TRENDWATCH_CONFIG")
                .unwrap_or_else(|_| "config.json".to_string())
                .into(),
            ignore_list: env::var("IGNORE_LIST_PATH")
                .unwrap_or_else(|_| "ignore.txt".to_string())
                .into(),
            block_list: env::var("BLOCK_LIST_PATH")
                .unwrap_or_else(|_| "block.txt".to_string())
                .into(),
        }
    }
}

/// Parse a duration string such as `"90s"`, `"15m"`, `"1h30m"`, `"1.5h"` or `"250ms"`
///
/// A duration is a sequence of decimal numbers, each with an optional fraction
/// and a unit suffix. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
/// `"0"` is accepted without a unit. Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidValue(format!("invalid duration {:?}", input));

    let s = input.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return Err(ConfigError::InvalidValue(format!(
            "negative duration {:?}",
            input
        )));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            "" => {
                return Err(ConfigError::InvalidValue(format!(
                    "missing unit in duration {:?}",
                    input
                )))
            }
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "unknown unit {:?} in duration {:?}",
                    other, input
                )))
            }
        };

        total_nanos += value * scale;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(ConfigError::InvalidValue(format!(
            "duration out of range {:?}",
            input
        )));
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "credentials": { "server": "https://social.example", "accessToken": "token" },
        "postInterval": "15m"
    }"#;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_parse_duration_compound_and_fraction() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1m0.5s").unwrap(), Duration::from_millis(60_500));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("15").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("10 minutes").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("-5m").is_err());
        assert!(parse_duration(".s").is_err());
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_json(MINIMAL).unwrap();

        assert_eq!(config.post_interval, Duration::from_secs(900));
        assert_eq!(config.words_to_post, 5);
        assert!(!config.log_posts);
        assert!(!config.enable_posts);
        assert!(!config.local_only);
        assert_eq!(config.visibility, "public");
        assert_eq!(config.trim, TrimSet::default());
        assert_eq!(config.event_source, EventSourceKind::Streaming);
        assert_eq!(config.channel_buffer, 10_000);
        assert_eq!(config.credentials.access_token, "token");
    }

    #[test]
    fn test_full_config() {
        let json = r##"{
            "credentials": {
                "server": "https://social.example/",
                "clientID": "id",
                "clientSecret": "secret",
                "accessToken": "token"
            },
            "localOnly": true,
            "logposts": true,
            "postInterval": "1h",
            "wordsToPost": 10,
            "enablePosts": true,
            "postVisibility": "unlisted",
            "trimChars": "#.",
            "eventSource": "replay.jsonl",
            "channelBuffer": 64
        }"##;

        let config = Config::from_json(json).unwrap();
        assert!(config.local_only);
        assert!(config.log_posts);
        assert!(config.enable_posts);
        assert_eq!(config.words_to_post, 10);
        assert_eq!(config.visibility, "unlisted");
        assert_eq!(config.trim, TrimSet::new("#."));
        assert_eq!(
            config.event_source,
            EventSourceKind::JsonlFile(PathBuf::from("replay.jsonl"))
        );
        assert_eq!(config.channel_buffer, 64);
        assert_eq!(config.credentials.client_id, "id");
        assert_eq!(config.credentials.client_secret, "secret");
        assert_eq!(config.credentials.base_url(), "https://social.example");
    }

    #[test]
    fn test_stdin_source_without_server() {
        let json = r#"{ "postInterval": "1m", "eventSource": "-" }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.event_source, EventSourceKind::Stdin);
    }

    #[test]
    fn test_negative_words_to_post_accepted() {
        let json = r#"{ "postInterval": "1m", "eventSource": "-", "wordsToPost": -2 }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.words_to_post, -2);
    }

    #[test]
    fn test_missing_interval_is_error() {
        let json = r#"{ "credentials": { "server": "https://social.example" } }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_bad_interval_is_error() {
        let json =
            r#"{ "credentials": { "server": "https://a.example" }, "postInterval": "soon" }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::InvalidValue(_))));

        let zero = r#"{ "credentials": { "server": "https://a.example" }, "postInterval": "0s" }"#;
        assert!(matches!(Config::from_json(zero), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_streaming_requires_server_url() {
        let json = r#"{ "postInterval": "1m" }"#;
        assert!(matches!(Config::from_json(json), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("config.json"));
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_default_paths() {
        // Run under a single test to avoid env races
        env::remove_var("TRENDWATCH_CONFIG");
        env::remove_var("IGNORE_LIST_PATH");
        env::remove_var("BLOCK_LIST_PATH");

        let paths = Paths::from_env();
        assert_eq!(paths.config, PathBuf::from("config.json"));
        assert_eq!(paths.ignore_list, PathBuf::from("ignore.txt"));
        assert_eq!(paths.block_list, PathBuf::from("block.txt"));

        env::set_var("IGNORE_LIST_PATH", "/etc/trendwatch/ignore.txt");
        let paths = Paths::from_env();
        assert_eq!(paths.ignore_list, PathBuf::from("/etc/trendwatch/ignore.txt"));
        env::remove_var("IGNORE_LIST_PATH");
    }
}
