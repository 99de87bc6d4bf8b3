//! Cache en memoria
//!
//! Implementación de `CacheStore` sobre un `HashMap` protegido por
//! `RwLock`, con expiración perezosa por clave. Se usa con
//! `CACHE_BACKEND=memory` y en los tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::CacheStore;
use crate::utils::errors::AppResult;

/// Valor en cache con su instante de expiración
#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de claves vivas
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let value = match entries.get(key) {
            Some(entry) if entry.is_expired(now) => None,
            Some(entry) => Some(entry.value.clone()),
            None => {
                debug!("❌ Cache MISS para clave: {}", key);
                return Ok(None);
            }
        };

        match value {
            Some(value) => {
                debug!("📥 Cache HIT para clave: {}", key);
                Ok(Some(value))
            }
            None => {
                entries.remove(key);
                debug!("⏰ Cache EXPIRADO para clave: {}", key);
                Ok(None)
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let entry = CachedEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl.as_secs());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let removed = self.entries.write().await.remove(key).is_some();
        debug!("🗑️ Cache DELETE para clave: {} (eliminada: {})", key, removed);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now))
    }
}
