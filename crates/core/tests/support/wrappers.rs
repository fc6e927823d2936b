use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forgeprops_core::{FetchContext, PropertyWrapper};
use forgeprops_domain::{PropertyBag, RawProperties, WrapperError};
use serde_json::Value;

/// Returns a fixed raw map and counts invocations.
#[derive(Debug, Default)]
pub struct StaticWrapper {
    response: RawProperties,
    calls: AtomicUsize,
}

impl StaticWrapper {
    pub fn new<I, K>(entries: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Arc::new(Self {
            response: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PropertyWrapper<()> for StaticWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _client: &(),
        _is_org: bool,
        _lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Always fails with the configured error.
#[derive(Debug)]
pub struct FailingWrapper {
    error: WrapperError,
    calls: AtomicUsize,
}

impl FailingWrapper {
    pub fn new(error: WrapperError) -> Arc<Self> {
        Arc::new(Self { error, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PropertyWrapper<()> for FailingWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _client: &(),
        _is_org: bool,
        _lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Never completes on its own; used to observe cancellation.
#[derive(Debug, Default)]
pub struct PendingWrapper;

#[async_trait]
impl PropertyWrapper<()> for PendingWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _client: &(),
        _is_org: bool,
        _lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(RawProperties::new())
    }
}
