// src/ingest/providers/hacker_news.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{Mode, DEFAULT_SUMMARY_MAX_CHARS};
use crate::ingest::types::{FetchFailed, Item, Source, SourceAdapter};
use crate::ingest::{date_from_rfc3339, normalize_text, summarize};

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";
const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    created_at: Option<String>,
    story_text: Option<String>,
    #[serde(rename = "objectID")]
    object_id: Option<String>,
}

impl Hit {
    // Ask/Show HN stories have no external url; the discussion page is the stable link.
    fn link(&self) -> String {
        match (self.url.as_deref().map(str::trim), self.object_id.as_deref()) {
            (Some(u), _) if !u.is_empty() => u.to_string(),
            (_, Some(id)) if !id.trim().is_empty() => format!("{ITEM_URL}{}", id.trim()),
            _ => String::new(),
        }
    }
}

/// Hacker News stories via the Algolia search API (`?query=..&tags=story`).
pub struct HackerNewsProvider {
    mode: Mode,
    summary_max_chars: usize,
}

impl HackerNewsProvider {
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

    fn parse_hits(&self, body: &str) -> Result<Vec<Item>> {
        let resp: SearchResponse =
            serde_json::from_str(body).context("parsing hacker news search json")?;

        let mut out = Vec::with_capacity(resp.hits.len());
        for (idx, raw) in resp.hits.into_iter().enumerate() {
            let hit = match serde_json::from_value::<Hit>(raw) {
                Ok(h) => h,
                Err(e) => {
                    tracing::warn!(source = "Hacker News", idx, error = %e, "skipping malformed hit");
                    continue;
                }
            };
            out.push(Item {
                source: Source::HackerNews,
                title: normalize_text(hit.title.as_deref().unwrap_or_default()),
                link: hit.link(),
                date: hit
                    .created_at
                    .as_deref()
                    .map(date_from_rfc3339)
                    .unwrap_or_default(),
                summary: summarize(hit.story_text.as_deref(), self.summary_max_chars),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for HackerNewsProvider {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        let body = self
            .mode
            .body(Source::HackerNews, &[("query", keyword), ("tags", "story")])
            .await?;
        self.parse_hits(&body)
            .map_err(|e| FetchFailed::parse(Source::HackerNews, e))
    }

    fn source(&self) -> Source {
        Source::HackerNews
    }
}
