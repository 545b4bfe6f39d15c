// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Barrier;
use topic_watch::{FetchFailed, Item, Source, SourceAdapter};

pub fn item(source: Source, link: &str) -> Item {
    Item {
        source,
        title: format!("{source} story"),
        link: link.to_string(),
        date: "2024-05-01T12:00:00Z".to_string(),
        summary: String::new(),
    }
}

/// Returns the same items on every call.
pub struct StaticAdapter {
    pub source: Source,
    pub items: Vec<Item>,
}

impl StaticAdapter {
    pub fn new(source: Source, links: &[&str]) -> Self {
        Self {
            source,
            items: links.iter().map(|l| item(source, l)).collect(),
        }
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    async fn fetch(&self, _keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        Ok(self.items.clone())
    }
    fn source(&self) -> Source {
        self.source
    }
}

/// Always fails with a transport error.
pub struct FailingAdapter(pub Source);

#[async_trait]
impl SourceAdapter for FailingAdapter {
    async fn fetch(&self, _keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        Err(FetchFailed::transport(self.0, anyhow!("503 Service Unavailable")))
    }
    fn source(&self) -> Source {
        self.0
    }
}

/// Panics inside fetch.
pub struct PanickingAdapter(pub Source);

#[async_trait]
impl SourceAdapter for PanickingAdapter {
    async fn fetch(&self, _keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        panic!("adapter bug");
    }
    fn source(&self) -> Source {
        self.0
    }
}

/// Waits on a shared barrier before answering; only completes if its peers run concurrently.
pub struct RendezvousAdapter {
    pub inner: StaticAdapter,
    pub barrier: Arc<Barrier>,
}

#[async_trait]
impl SourceAdapter for RendezvousAdapter {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Item>, FetchFailed> {
        self.barrier.wait().await;
        self.inner.fetch(keyword).await
    }
    fn source(&self) -> Source {
        self.inner.source
    }
}
