// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod dedup;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::dedup::SeenSet;
pub use crate::ingest::config::{load_settings_default, RunConfig, Settings};
pub use crate::ingest::registry::Registry;
pub use crate::ingest::types::{FetchFailed, Item, Source, SourceAdapter};
pub use crate::pipeline::{run, PipelineError, RunReport};
pub use crate::store::{PersistError, Persister};
