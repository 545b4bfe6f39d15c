//! topic-watch binary entrypoint.
//!
//! `topic-watch [KEYWORD] [SOURCE]` runs the pipeline once for the keyword (or for every
//! configured keyword) and exits non-zero if any dataset could not be read or written.
//! With `interval_secs` configured it keeps running on that interval instead.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use topic_watch::ingest::providers::default_registry;
use topic_watch::ingest::scheduler::{run_all_keywords, spawn_scheduler};
use topic_watch::load_settings_default;

/// Compact logs by default; JSON lines when TOPIC_WATCH_LOG_JSON=1.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("topic_watch=info,scheduler=info,warn"));

    let json = std::env::var("TOPIC_WATCH_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut settings = load_settings_default()?;

    settings.apply_args(std::env::args().skip(1));
    if settings.keywords.is_empty() {
        return Err(anyhow!("no keyword given and none configured"));
    }

    if let Some(addr) = settings.metrics_addr.as_deref() {
        topic_watch::metrics::install_exporter(addr)?;
    }

    let registry = Arc::new(default_registry(&settings)?);
    tracing::info!(
        keywords = ?settings.keywords,
        source = ?settings.source,
        sources = ?registry.sources(),
        data_dir = %settings.data_dir.display(),
        "topic-watch starting"
    );

    if let Some(interval) = settings.interval_secs {
        tracing::info!(interval_secs = interval, "running on schedule");
        spawn_scheduler(settings, registry, interval).await?;
        return Ok(());
    }

    let mut failed = 0usize;
    for (keyword, res) in run_all_keywords(&settings, &registry).await {
        match res {
            Ok(report) => tracing::info!(
                %keyword,
                saved = report.saved,
                fetched = report.fetched,
                skipped = report.skipped,
                failed_sources = ?report.failed_sources,
                dataset = %report.dataset.display(),
                "run finished"
            ),
            Err(e) => {
                failed += 1;
                tracing::error!(%keyword, error = %e, "run failed");
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{failed} run(s) could not persist their results"));
    }
    Ok(())
}
