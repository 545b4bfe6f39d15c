// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod registry;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::ingest::types::{FetchFailed, Item, Source, SourceAdapter};

/// Marker appended to summaries cut at the character budget.
pub const TRUNCATION_MARKER: &str = "...";

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "topic_fetch_items_total",
            "Items returned by source adapters."
        );
        describe_counter!(
            "topic_fetch_errors_total",
            "Adapter calls that failed (transport, parse or aborted)."
        );
        describe_counter!(
            "topic_new_items_total",
            "Items appended to the dataset as new."
        );
        describe_counter!(
            "topic_seen_skipped_total",
            "Items dropped because their link was already recorded or repeated in the batch."
        );
        describe_counter!("topic_runs_total", "Scheduler ticks started.");
        describe_histogram!("topic_fetch_ms", "Adapter fetch time in milliseconds.");
        describe_gauge!("topic_last_run_ts", "Unix ts when a pipeline run last finished.");
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, appending [`TRUNCATION_MARKER`] when cut.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.truncate(out.trim_end().len());
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Normalized summary for an item: cleaned, then bounded.
pub fn summarize(raw: Option<&str>, max_chars: usize) -> String {
    truncate_summary(&normalize_text(raw.unwrap_or_default()), max_chars)
}

fn format_utc(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Epoch seconds (Reddit's `created_utc`) to RFC 3339 UTC. Non-positive or non-finite input
/// means "unknown" and yields an empty string.
pub fn date_from_unix(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return String::new();
    }
    format_utc(secs.trunc() as i64)
}

/// RFC 3339 (any offset, any fraction) to RFC 3339 UTC with second precision.
pub fn date_from_rfc3339(s: &str) -> String {
    OffsetDateTime::parse(s.trim(), &Rfc3339)
        .map(|dt| format_utc(dt.unix_timestamp()))
        .unwrap_or_default()
}

/// RFC 2822 (RSS `pubDate`) to RFC 3339 UTC with second precision.
pub fn date_from_rfc2822(s: &str) -> String {
    OffsetDateTime::parse(s.trim(), &Rfc2822)
        .map(|dt| format_utc(dt.unix_timestamp()))
        .unwrap_or_default()
}

/// Merged output of one fan-out.
#[derive(Debug, Default)]
pub struct Aggregated {
    /// Successful results, concatenated in adapter order.
    pub items: Vec<Item>,
    pub failures: Vec<FetchFailed>,
}

impl Aggregated {
    pub fn failed_sources(&self) -> Vec<Source> {
        self.failures.iter().map(|f| f.origin).collect()
    }
}

/// Run every adapter concurrently for `keyword` and wait for all of them to settle.
///
/// Each adapter runs on its own task, so an error or a panic in one never cancels the
/// others. Results are concatenated in the order of `adapters`, which is what makes
/// first-seen-wins deduplication deterministic downstream.
pub async fn fetch_all(keyword: &str, adapters: &[Arc<dyn SourceAdapter>]) -> Aggregated {
    ensure_metrics_described();

    let handles: Vec<_> = adapters
        .iter()
        .map(|adapter| {
            let adapter = Arc::clone(adapter);
            let keyword = keyword.to_string();
            tokio::spawn(async move {
                let t0 = std::time::Instant::now();
                let res = adapter.fetch(&keyword).await;
                let ms = t0.elapsed().as_secs_f64() * 1_000.0;
                histogram!("topic_fetch_ms", "source" => adapter.source().as_key()).record(ms);
                res
            })
        })
        .collect();

    let settled = futures::future::join_all(handles).await;

    let mut out = Aggregated::default();
    for (adapter, res) in adapters.iter().zip(settled) {
        let source = adapter.source();
        let outcome = match res {
            Ok(r) => r,
            Err(join_err) => Err(FetchFailed::aborted(source, join_err)),
        };
        match outcome {
            Ok(items) => {
                tracing::info!(source = %source, count = items.len(), "adapter fetched");
                counter!("topic_fetch_items_total", "source" => source.as_key())
                    .increment(items.len() as u64);
                out.items.extend(items);
            }
            Err(e) => {
                tracing::warn!(
                    source = %e.origin,
                    kind = %e.kind,
                    error = %format!("{:#}", e.cause),
                    "adapter failed; continuing without it"
                );
                counter!("topic_fetch_errors_total", "source" => source.as_key()).increment(1);
                out.failures.push(e);
            }
        }
    }
    out
}
