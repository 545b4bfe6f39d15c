// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{Mode, DEFAULT_SUMMARY_MAX_CHARS};
use crate::ingest::types::{FetchFailed, Item, Source, SourceAdapter};
use crate::ingest::{date_from_unix, normalize_text, summarize};

pub const DEFAULT_ENDPOINT: &str = "https://www.reddit.com/search.json";
const PERMALINK_BASE: &str = "https://www.reddit.com";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    // Kept raw so one bad child does not sink the whole listing.
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    selftext: Option<String>,
}

fn permalink_to_url(permalink: &str) -> String {
    let p = permalink.trim();
    if p.is_empty() {
        String::new()
    } else if p.starts_with("http://") || p.starts_with("https://") {
        p.to_string()
    } else {
        format!("{PERMALINK_BASE}{p}")
    }
}

/// Reddit search (`/search.json?q=..&sort=new`).
pub struct RedditProvider {
    mode: Mode,
    summary_max_chars: usize,
}

impl RedditProvider {
    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }

    pub fn from_url(endpoint: &str, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                endpoint: endpoint.to_string(),
                client,
            },
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }

    pub fn with_summary_budget(mut self, max_chars: usize) -> Self {
        self.summary_max_chars = max_chars;
        self
    }

    fn parse_listing(&self, body: &str) -> Result<Vec<Item>> {
        let listing: Listing = serde_json::from_str(body).context("parsing reddit listing json")?;

        let mut out = Vec::with_capacity(listing.data.children.len());
        for (idx, raw) in listing.data.children.into_iter().enumerate() {
            let post = match serde_json::from_value::<Child>(raw) {
                Ok(c) => c.data,
                Err(e) => {
                    tracing::warn!(source = "Reddit", idx, error = %e, "skipping malformed post");
                    continue;
                }
            };
            out.push(Item {
                source: Source::Reddit,
                title: normalize_text(post.title.as_deref().unwrap_or_default()),
                link: permalink_to_url(post.permalink.as_deref().unwrap_or_default()),
                date: post.created_utc.map(date_from_unix).unwrap_or_default(),
                summary: summarize(post.selftext.as_deref(), self.summary_max_chars),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for RedditProvider {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        let body = self
            .mode
            .body(Source::Reddit, &[("q", keyword), ("sort", "new")])
            .await?;
        self.parse_listing(&body)
            .map_err(|e| FetchFailed::parse(Source::Reddit, e))
    }

    fn source(&self) -> Source {
        Source::Reddit
    }
}
