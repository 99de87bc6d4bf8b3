use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, error, info};

use super::{CacheConfig, CacheStore};
use crate::utils::errors::{AppError, AppResult};

/// Cliente Redis con connection pooling y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.as_str())?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }
}

fn store_error(op: &str, key: &str, e: redis::RedisError) -> AppError {
    error!("❌ Error de Redis en {} para clave {}: {}", op, key, e);
    AppError::CacheStoreUnavailable(format!("{} {}: {}", op, key, e))
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();

        let value: Option<String> = conn.get(key).await.map_err(|e| store_error("GET", key, e))?;
        match &value {
            Some(_) => debug!("📥 Cache HIT para clave: {}", key),
            None => debug!("❌ Cache MISS para clave: {}", key),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let mut conn = self.manager.clone();
        // Redis rechaza SETEX con 0 segundos
        let seconds = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(|e| store_error("SETEX", key, e))?;
        debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let count: i64 = conn.del(key).await.map_err(|e| store_error("DEL", key, e))?;
        debug!("🗑️ Cache DELETE para clave: {} (eliminados: {})", key, count);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.manager.clone();

        let exists: bool = conn.exists(key).await.map_err(|e| store_error("EXISTS", key, e))?;
        debug!("🔍 Cache EXISTS para clave {}: {}", key, exists);
        Ok(exists)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut conn = self.manager.clone();
        let pattern = format!("{}*", prefix);

        let mut keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .map_err(|e| store_error("KEYS", &pattern, e))?;
        keys.sort();
        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let mut conn = self.manager.clone();

        // -2: no existe, -1: sin expiración
        let ttl: i64 = conn.ttl(key).await.map_err(|e| store_error("TTL", key, e))?;
        if ttl > 0 {
            debug!("⏰ Cache TTL para clave {}: {}s", key, ttl);
            Ok(Some(Duration::from_secs(ttl as u64)))
        } else {
            debug!("⏰ Cache TTL para clave {}: expirado", key);
            Ok(None)
        }
    }
}
