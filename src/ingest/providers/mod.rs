// src/ingest/providers/mod.rs
pub mod feed;
pub mod google_news;
pub mod hacker_news;
pub mod reddit;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::ingest::config::Settings;
use crate::ingest::registry::Registry;
use crate::ingest::types::{FetchFailed, Source};

/// Default summary budget in characters (before the truncation marker).
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 200;

/// Where an adapter gets its response body from.
pub(crate) enum Mode {
    // Canned body; the keyword is ignored.
    Fixture(String),
    Http {
        endpoint: String,
        client: reqwest::Client,
    },
}

impl Mode {
    /// One response body per invocation: the fixture, or a single GET with `params`.
    pub(crate) async fn body(
        &self,
        source: Source,
        params: &[(&str, &str)],
    ) -> Result<String, FetchFailed> {
        match self {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http { endpoint, client } => {
                let resp = client
                    .get(endpoint.as_str())
                    .query(params)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("GET {endpoint}"))
                    .map_err(|e| FetchFailed::transport(source, e))?;
                resp.text()
                    .await
                    .with_context(|| format!("reading body of {endpoint}"))
                    .map_err(|e| FetchFailed::transport(source, e))
            }
        }
    }
}

/// Shared HTTP client. The timeout bounds how long a stuck source can hold up the fan-in.
pub fn http_client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()
        .context("building http client")
}

/// Production registry: Reddit, Hacker News, Google News, in that order.
pub fn default_registry(settings: &Settings) -> Result<Registry> {
    let client = http_client(settings)?;
    let budget = settings.summary_max_chars;
    let ep = &settings.endpoints;

    Ok(Registry::new()
        .with(
            reddit::RedditProvider::from_url(&ep.reddit, client.clone())
                .with_summary_budget(budget),
        )
        .with(
            hacker_news::HackerNewsProvider::from_url(&ep.hacker_news, client.clone())
                .with_summary_budget(budget),
        )
        .with(
            google_news::GoogleNewsProvider::from_url(&ep.google_news, client)
                .with_summary_budget(budget),
        ))
}
