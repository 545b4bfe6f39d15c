// src/ingest/providers/google_news.rs
use anyhow::Result;
use async_trait::async_trait;

use super::feed::{parse_feed, FeedEntry};
use super::{Mode, DEFAULT_SUMMARY_MAX_CHARS};
use crate::ingest::types::{FetchFailed, Item, Source, SourceAdapter};
use crate::ingest::{date_from_rfc2822, date_from_rfc3339, normalize_text, summarize};

pub const DEFAULT_ENDPOINT: &str = "https://news.google.com/rss/search";

/// RSS pubDate is RFC 2822; Atom uses RFC 3339.
fn feed_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let d = date_from_rfc2822(raw);
    if d.is_empty() {
        date_from_rfc3339(raw)
    } else {
        d
    }
}

/// Google News search feed (`/rss/search?q=..`).
pub struct GoogleNewsProvider {
    mode: Mode,
    summary_max_chars: usize,
}

impl GoogleNewsProvider {
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
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

    fn to_item(&self, e: FeedEntry) -> Item {
        Item {
            source: Source::GoogleNews,
            title: normalize_text(e.title.as_deref().unwrap_or_default()),
            link: e.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            date: feed_date(e.published.as_deref()),
            summary: summarize(e.summary.as_deref(), self.summary_max_chars),
        }
    }

    fn parse_items(&self, xml: &str) -> Result<Vec<Item>> {
        Ok(parse_feed(xml)?
            .into_iter()
            .map(|e| self.to_item(e))
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for GoogleNewsProvider {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        // hl/gl/ceid pick the edition; without them Google redirects by geo-IP.
        let params = [("q", keyword), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")];
        let body = self.mode.body(Source::GoogleNews, &params).await?;
        self.parse_items(&body)
            .map_err(|e| FetchFailed::parse(Source::GoogleNews, e))
    }

    fn source(&self) -> Source {
        Source::GoogleNews
    }
}
