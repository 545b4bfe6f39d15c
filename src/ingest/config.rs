// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::providers::{google_news, hacker_news, reddit, DEFAULT_SUMMARY_MAX_CHARS};
use crate::ingest::registry::is_all;
use crate::ingest::types::Source;

pub const ENV_PATH: &str = "TOPIC_WATCH_CONFIG";
pub const ENV_KEYWORDS: &str = "TOPIC_WATCH_KEYWORDS";
pub const ENV_SOURCE: &str = "TOPIC_WATCH_SOURCE";
pub const ENV_DATA_DIR: &str = "TOPIC_WATCH_DATA_DIR";
pub const ENV_INTERVAL_SECS: &str = "TOPIC_WATCH_INTERVAL_SECS";
pub const ENV_METRICS_ADDR: &str = "TOPIC_WATCH_METRICS_ADDR";

const DEFAULT_TOML: &str = "config/topic_watch.toml";
const DEFAULT_JSON: &str = "config/topic_watch.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub reddit: String,
    pub hacker_news: String,
    pub google_news: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            reddit: reddit::DEFAULT_ENDPOINT.to_string(),
            hacker_news: hacker_news::DEFAULT_ENDPOINT.to_string(),
            google_news: google_news::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Application settings. Every run derives its own [`RunConfig`] from these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keywords: Vec<String>,
    /// Restrict runs to one source ("reddit", "hn", "google", ...).
    pub source: Option<String>,
    pub data_dir: PathBuf,
    pub summary_max_chars: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Run on this interval instead of once.
    pub interval_secs: Option<u64>,
    /// Serve Prometheus metrics on this address (e.g. "0.0.0.0:9000").
    pub metrics_addr: Option<String>,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keywords: vec!["AI automation".to_string(), "business tools".to_string()],
            source: None,
            data_dir: PathBuf::from("data"),
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            http_timeout_secs: 20,
            user_agent: concat!("topic-watch/", env!("CARGO_PKG_VERSION")).to_string(),
            interval_secs: None,
            metrics_addr: None,
            endpoints: Endpoints::default(),
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub keyword: String,
    pub source: Option<String>,
    pub dataset: PathBuf,
}

impl Settings {
    /// Run configuration for `keyword` on `day` (the dataset's time bucket).
    pub fn run_config(&self, keyword: &str, day: NaiveDate) -> RunConfig {
        RunConfig {
            keyword: keyword.to_string(),
            source: self.source.clone(),
            dataset: dataset_path(&self.data_dir, keyword, day),
        }
    }

    /// Apply `TOPIC_WATCH_*` overrides on top of file values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_KEYWORDS) {
            self.keywords = v.split(',').map(str::to_string).collect();
        }
        if let Ok(v) = std::env::var(ENV_SOURCE) {
            let v = v.trim();
            self.source = (!v.is_empty()).then(|| v.to_string());
        }
        if let Ok(v) = std::env::var(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var(ENV_INTERVAL_SECS) {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_INTERVAL_SECS}={v:?} is not a number"))?;
            self.interval_secs = (secs > 0).then_some(secs);
        }
        if let Ok(v) = std::env::var(ENV_METRICS_ADDR) {
            let v = v.trim();
            self.metrics_addr = (!v.is_empty()).then(|| v.to_string());
        }
        Ok(())
    }

    /// Apply positional command-line arguments: `[KEYWORD] [SOURCE]`.
    ///
    /// A blank keyword keeps the configured keywords. A keyword that is itself a source name
    /// is still taken as the keyword, but logged, since it usually means the arguments were
    /// given in `SOURCE KEYWORD` order.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(keyword) = args.next() {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                if is_all(keyword) || Source::from_selector(keyword).is_some() {
                    tracing::warn!(
                        keyword,
                        "keyword looks like a source name; usage is [KEYWORD] [SOURCE]"
                    );
                }
                self.keywords = vec![keyword.to_string()];
            }
        }
        if let Some(source) = args.next() {
            let source = source.trim();
            self.source = (!source.is_empty()).then(|| source.to_string());
        }
    }

    fn clean(mut self) -> Result<Self> {
        self.keywords = clean_list(self.keywords);
        if self.summary_max_chars == 0 {
            return Err(anyhow!("summary_max_chars must be positive"));
        }
        if self.http_timeout_secs == 0 {
            return Err(anyhow!("http_timeout_secs must be positive"));
        }
        Ok(self)
    }
}

/// `<data_dir>/<keyword-slug>-<YYYY-MM-DD>.csv`
pub fn dataset_path(data_dir: &Path, keyword: &str, day: NaiveDate) -> PathBuf {
    data_dir.join(format!("{}-{}.csv", slug(keyword), day.format("%Y-%m-%d")))
}

fn slug(keyword: &str) -> String {
    let s = keyword
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if s.is_empty() {
        "keyword".to_string()
    } else {
        s
    }
}

/// Load settings from an explicit path. Supports TOML or JSON formats.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_settings(&content, ext.as_str())
        .with_context(|| format!("parsing settings in {}", path.display()))
}

/// Load settings using env var + fallbacks, then apply env overrides:
/// 1) $TOPIC_WATCH_CONFIG
/// 2) config/topic_watch.toml
/// 3) config/topic_watch.json
/// 4) built-in defaults
pub fn load_settings_default() -> Result<Settings> {
    let mut settings = if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
        load_settings_from(&pb)?
    } else if Path::new(DEFAULT_TOML).exists() {
        load_settings_from(Path::new(DEFAULT_TOML))?
    } else if Path::new(DEFAULT_JSON).exists() {
        load_settings_from(Path::new(DEFAULT_JSON))?
    } else {
        Settings::default()
    };
    settings.apply_env()?;
    settings.clean()
}

fn parse_settings(s: &str, hint_ext: &str) -> Result<Settings> {
    let parsed = match hint_ext {
        "toml" => toml::from_str::<Settings>(s).map_err(anyhow::Error::from),
        "json" => serde_json::from_str::<Settings>(s).map_err(anyhow::Error::from),
        // No usable extension: JSON objects start with '{', anything else is tried as TOML.
        _ if s.trim_start().starts_with('{') => {
            serde_json::from_str::<Settings>(s).map_err(anyhow::Error::from)
        }
        _ => toml::from_str::<Settings>(s).map_err(anyhow::Error::from),
    };
    parsed?.clean()
}

/// Trim, drop empties, drop repeats (first occurrence wins).
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}
