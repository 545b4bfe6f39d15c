// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::ingest::config::Settings;
use crate::ingest::registry::Registry;
use crate::pipeline::{self, PipelineError, RunReport};

/// Run every configured keyword once against today's (UTC) datasets, in keyword order.
///
/// Each keyword is its own run; one failing does not stop the rest.
pub async fn run_all_keywords(
    settings: &Settings,
    registry: &Registry,
) -> Vec<(String, Result<RunReport, PipelineError>)> {
    let today = chrono::Utc::now().date_naive();
    let mut out = Vec::with_capacity(settings.keywords.len());
    for keyword in &settings.keywords {
        let run = settings.run_config(keyword, today);
        let res = pipeline::run(&run, registry).await;
        out.push((keyword.clone(), res));
    }
    out
}

/// Spawn a scheduler that runs all keywords every `interval_secs`, starting immediately.
/// Every tick reloads the seen set from disk, so ticks are independent of each other.
pub fn spawn_scheduler(
    settings: Settings,
    registry: Arc<Registry>,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            counter!("topic_runs_total").increment(1);

            for (keyword, res) in run_all_keywords(&settings, &registry).await {
                match res {
                    Ok(report) => tracing::info!(
                        target: "scheduler",
                        %keyword,
                        saved = report.saved,
                        fetched = report.fetched,
                        failed = report.failed_sources.len(),
                        "scheduled run finished"
                    ),
                    Err(e) => tracing::error!(
                        target: "scheduler",
                        %keyword,
                        error = %e,
                        "scheduled run failed"
                    ),
                }
            }
        }
    })
}
