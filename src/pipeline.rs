// src/pipeline.rs
//! One run: load seen links → fetch all sources → drop known links → append the rest.

use std::path::PathBuf;

use metrics::{counter, gauge};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::dedup;
use crate::ingest::config::RunConfig;
use crate::ingest::registry::Registry;
use crate::ingest::types::Source;
use crate::ingest::{ensure_metrics_described, fetch_all};
use crate::store::{PersistError, Persister};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("loading seen links failed: {0}")]
    Load(#[source] PersistError),
    #[error("saving new items failed: {0}")]
    Append(#[source] PersistError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub keyword: String,
    pub dataset: PathBuf,
    /// Links known before the run started.
    pub previously_seen: usize,
    /// Items returned by all adapters together.
    pub fetched: usize,
    /// Rows appended to the dataset.
    pub saved: usize,
    /// Fetched items dropped as already recorded, repeated, or without a link.
    pub skipped: usize,
    pub failed_sources: Vec<Source>,
}

/// Run the pipeline once for `run.keyword`.
///
/// Source failures are logged and reported in [`RunReport::failed_sources`]; only dataset
/// I/O failures make the run fail.
#[instrument(level = "info", skip_all, fields(keyword = %run.keyword))]
pub async fn run(run: &RunConfig, registry: &Registry) -> Result<RunReport, PipelineError> {
    ensure_metrics_described();

    let mut persister = Persister::new(&run.dataset);
    let previously_seen = persister.load().map_err(PipelineError::Load)?.len();

    let adapters = registry.select(run.source.as_deref());
    let merged = fetch_all(&run.keyword, &adapters).await;
    let failed_sources = merged.failed_sources();
    let fetched = merged.items.len();

    let fresh = dedup::filter(merged.items, persister.seen());
    let skipped = fetched - fresh.len();
    let saved = persister.append(&fresh).map_err(PipelineError::Append)?;

    counter!("topic_new_items_total").increment(saved as u64);
    counter!("topic_seen_skipped_total").increment(skipped as u64);
    gauge!("topic_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    if saved > 0 {
        info!(saved, dataset = %run.dataset.display(), "new results saved");
    } else {
        info!("no new results found");
    }

    Ok(RunReport {
        keyword: run.keyword.clone(),
        dataset: run.dataset.clone(),
        previously_seen,
        fetched,
        saved,
        skipped,
        failed_sources,
    })
}
