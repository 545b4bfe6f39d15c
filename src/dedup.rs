// src/dedup.rs
//! Link-keyed deduplication against previously recorded items.

use std::collections::HashSet;

use crate::ingest::types::Item;

/// Links already present in the dataset (plus whatever this process appended since loading).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    links: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Returns `true` if the link was not present before.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keep items whose link is non-empty and not in `seen`.
///
/// Tie-break: when a link repeats inside `items`, the first occurrence wins. Callers pass
/// items in adapter registration order, so the earlier-registered source owns the row.
/// `seen` is not modified.
pub fn filter(items: Vec<Item>, seen: &SeenSet) -> Vec<Item> {
    let mut batch: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(items.len());
    for it in items {
        if it.link.is_empty() || seen.contains(&it.link) {
            continue;
        }
        if !batch.insert(it.link.clone()) {
            continue;
        }
        keep.push(it);
    }
    keep
}
