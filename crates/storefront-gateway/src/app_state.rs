//! Shared application state.
//!
//! The metrics registry and the store are built once at startup and handed
//! to every handler through axum's `State` extractor; nothing is looked up
//! globally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_core::error::{Result, StorefrontError};
use storefront_core::metrics::MetricsRegistry;
use storefront_core::model::PageRequest;

use crate::api::PageParams;
use crate::config::StorefrontConfig;
use crate::store::{seed, MemoryStore, StorefrontStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<MetricsRegistry>,
    store: Arc<dyn StorefrontStore>,
}

struct AppStateInner {
    cfg: StorefrontConfig,
    draining: AtomicBool,
}

impl AppState {
    pub fn new(
        cfg: StorefrontConfig,
        store: Arc<dyn StorefrontStore>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                draining: AtomicBool::new(false),
            }),
            metrics,
            store,
        }
    }

    /// Build the in-memory store (seeding it when configured) and a fresh
    /// metrics registry.
    pub async fn from_config(cfg: StorefrontConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        if cfg.store.seed_demo_data {
            seed::load_demo_data(store.as_ref()).await?;
        }
        Ok(Self::new(cfg, store, Arc::new(MetricsRegistry::new())))
    }

    pub fn cfg(&self) -> &StorefrontConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    pub fn store(&self) -> Arc<dyn StorefrontStore> {
        Arc::clone(&self.store)
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    /// Resolve `?page=&size=` against the configured defaults and bounds.
    pub fn page_request(&self, params: &PageParams) -> Result<PageRequest> {
        let p = &self.cfg().pagination;
        let size = params.size.unwrap_or(p.default_size);
        if size == 0 || size > p.max_size {
            return Err(StorefrontError::BadRequest(format!(
                "size must be between 1 and {}",
                p.max_size
            )));
        }
        Ok(PageRequest::new(params.page.unwrap_or(0), size))
    }
}
