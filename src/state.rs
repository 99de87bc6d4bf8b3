//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::cache::{CacheConfig, SharedCacheStore};
use crate::clients::CatalogApi;
use crate::config::environment::EnvironmentConfig;
use crate::services::{
    HomepageService, ImageOptimizer, RefreshOrchestrator, SectionFetcher, WorkerPool,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cache_config: CacheConfig,
    pub homepage: Arc<HomepageService>,
    pub orchestrator: Arc<RefreshOrchestrator>,
}

impl AppState {
    /// Conectar los servicios sobre el catálogo, el optimizador y el store dados
    pub fn new(
        config: EnvironmentConfig,
        cache_config: CacheConfig,
        catalog: Arc<dyn CatalogApi>,
        images: Arc<dyn ImageOptimizer>,
        cache: SharedCacheStore,
    ) -> Self {
        let fetcher = Arc::new(SectionFetcher::new(
            catalog,
            images,
            cache.clone(),
            WorkerPool::new(cache_config.detail_fetch_threads),
            cache_config.ttl,
        ));
        let homepage = Arc::new(HomepageService::new(fetcher.clone()));
        let orchestrator = Arc::new(RefreshOrchestrator::new(fetcher, cache, &cache_config));

        Self {
            config,
            cache_config,
            homepage,
            orchestrator,
        }
    }
}
