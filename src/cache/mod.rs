//! Cache
//!
//! Este módulo contiene el almacenamiento clave/valor con TTL que sirve
//! el homepage: Redis en producción y un store en memoria para
//! desarrollo y tests.

pub mod cache_config;
pub mod keys;
pub mod memory_store;
pub mod redis_client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub use cache_config::{CacheBackend, CacheConfig, RetryConfig, ScheduleConfig};
pub use keys::{RefreshGroup, SectionKey, HOMEPAGE_PREFIX, TEMP_PREFIX};
pub use memory_store::MemoryCacheStore;
pub use redis_client::RedisClient;

use crate::utils::errors::AppResult;

/// Operaciones de cache
///
/// Los valores viajan como JSON serializado; un valor siempre se reemplaza
/// completo y cada escritura reinicia su TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// TTL restante; `None` si la clave no existe o no expira
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;
}

/// Lectura/escritura tipada sobre cualquier `CacheStore`
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> AppResult<()> {
        let serialized = serde_json::to_string(value)?;
        self.set_raw(key, serialized, ttl).await
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}

pub type SharedCacheStore = Arc<dyn CacheStore>;

/// Crear el store según la configuración
pub async fn connect(config: &CacheConfig) -> AppResult<SharedCacheStore> {
    match config.backend {
        CacheBackend::Redis => Ok(Arc::new(RedisClient::new(config).await?)),
        CacheBackend::Memory => Ok(Arc::new(MemoryCacheStore::new())),
    }
}
