// src/ingest/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin of an [`Item`]. Serialized (and written to the dataset) as the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "Reddit")]
    Reddit,
    #[serde(rename = "Hacker News")]
    HackerNews,
    #[serde(rename = "Google News")]
    GoogleNews,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Reddit, Source::HackerNews, Source::GoogleNews];

    pub fn display_name(self) -> &'static str {
        match self {
            Source::Reddit => "Reddit",
            Source::HackerNews => "Hacker News",
            Source::GoogleNews => "Google News",
        }
    }

    /// Stable lowercase key, used for metric labels and config sections.
    pub fn as_key(self) -> &'static str {
        match self {
            Source::Reddit => "reddit",
            Source::HackerNews => "hacker_news",
            Source::GoogleNews => "google_news",
        }
    }

    /// Resolve a user-supplied selector ("reddit", "HN", "google-news", "Hacker News", ...).
    /// Returns `None` for anything unrecognized.
    pub fn from_selector(s: &str) -> Option<Source> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "reddit" => Some(Source::Reddit),
            "hackernews" | "hn" => Some(Source::HackerNews),
            "googlenews" | "google" | "gnews" => Some(Source::GoogleNews),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One discovered result. Field order is the dataset column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub source: Source,
    pub title: String,
    pub link: String,    // unique key across the dataset
    pub date: String,    // RFC 3339 UTC publish time, or empty
    pub summary: String, // already truncated
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Parse => f.write_str("parse"),
            FailureKind::Aborted => f.write_str("aborted"),
        }
    }
}

/// Whole-call failure of one adapter. The aggregator logs it and moves on.
#[derive(Debug, Error)]
#[error("{origin} fetch failed ({kind}): {cause:#}")]
pub struct FetchFailed {
    pub origin: Source,
    pub kind: FailureKind,
    pub cause: anyhow::Error,
}

impl FetchFailed {
    pub fn transport(origin: Source, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            origin,
            kind: FailureKind::Transport,
            cause: cause.into(),
        }
    }

    pub fn parse(origin: Source, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            origin,
            kind: FailureKind::Parse,
            cause: cause.into(),
        }
    }

    /// The adapter task panicked or was cancelled before settling.
    pub fn aborted(origin: Source, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            origin,
            kind: FailureKind::Aborted,
            cause: cause.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Item>, FetchFailed>;
    fn source(&self) -> Source;
}
