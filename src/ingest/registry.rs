// src/ingest/registry.rs
//! Ordered set of source adapters. Registration order is merge order, and merge order decides
//! which copy of a repeated link survives deduplication.

use std::sync::Arc;

use crate::ingest::types::{Source, SourceAdapter};

#[derive(Default, Clone)]
pub struct Registry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: SourceAdapter + 'static>(&mut self, adapter: A) -> &mut Self {
        self.adapters.push(Arc::new(adapter));
        self
    }

    pub fn with<A: SourceAdapter + 'static>(mut self, adapter: A) -> Self {
        self.register(adapter);
        self
    }

    pub fn sources(&self) -> Vec<Source> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    /// Adapters to run for `selector`.
    ///
    /// `None` or `"all"` selects everything. A recognized selector keeps only the matching
    /// adapters. An unrecognized one selects nothing; the run then degrades to an empty result.
    pub fn select(&self, selector: Option<&str>) -> Vec<Arc<dyn SourceAdapter>> {
        let raw = match selector {
            Some(s) if !is_all(s) => s,
            _ => return self.adapters.clone(),
        };
        match Source::from_selector(raw) {
            Some(wanted) => self
                .adapters
                .iter()
                .filter(|a| a.source() == wanted)
                .cloned()
                .collect(),
            None => {
                tracing::warn!(selector = raw, "unknown source selector; nothing to fetch");
                Vec::new()
            }
        }
    }
}

/// Whether `selector` asks for every source ("all", any case).
pub fn is_all(selector: &str) -> bool {
    selector.trim().eq_ignore_ascii_case("all")
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("sources", &self.sources())
            .finish()
    }
}
