//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache,
//! los refrescos programados y los reintentos.

use std::time::Duration;

use serde::Serialize;

use crate::config::environment::env_or;
use crate::utils::errors::{AppError, AppResult};

/// Backend de almacenamiento del cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("backend desconocido '{}'", other)),
        }
    }
}

/// Expresiones cron de cada grupo (formato con segundos)
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub initial_group: String,
    pub group1: String,
    pub group2: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_group: "0 54 * * * *".to_string(),
            group1: "0 55 * * * *".to_string(),
            group2: "0 56 * * * *".to_string(),
        }
    }
}

/// Política de reintentos de un refresco programado
#[derive(Debug, Clone, Serialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(2000),
        }
    }
}

/// Configuración del cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: String,
    pub ttl: Duration,
    pub temp_ttl: Duration,
    pub warmup_delay: Duration,
    pub detail_fetch_threads: usize,
    pub schedule: ScheduleConfig,
    pub retry: RetryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            ttl: Duration::from_secs(60 * 60), // 1 hora
            temp_ttl: Duration::from_secs(10 * 60),
            warmup_delay: Duration::from_secs(30),
            detail_fetch_threads: 10,
            schedule: ScheduleConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let ttl_minutes: u64 = env_or("CACHE_TTL_MINUTES", 60)?;
        let temp_ttl_minutes: u64 = env_or("CACHE_TEMP_TTL_MINUTES", 10)?;
        let warmup_seconds: u64 = env_or("CACHE_WARMUP_DELAY_SECONDS", 30)?;
        let backoff_ms: u64 = env_or("CACHE_RETRY_BACKOFF_MS", 2000)?;

        let config = Self {
            backend: env_or("CACHE_BACKEND", CacheBackend::Redis)?,
            redis_url: env_or("REDIS_URL", defaults.redis_url)?,
            ttl: minutes("CACHE_TTL_MINUTES", ttl_minutes)?,
            temp_ttl: minutes("CACHE_TEMP_TTL_MINUTES", temp_ttl_minutes)?,
            warmup_delay: Duration::from_secs(warmup_seconds),
            detail_fetch_threads: env_or("CACHE_DETAIL_FETCH_THREADS", 10)?,
            schedule: ScheduleConfig {
                enabled: env_or("CACHE_SCHEDULE_ENABLED", true)?,
                initial_group: env_or("CACHE_SCHEDULE_INITIAL", defaults.schedule.initial_group)?,
                group1: env_or("CACHE_SCHEDULE_GROUP1", defaults.schedule.group1)?,
                group2: env_or("CACHE_SCHEDULE_GROUP2", defaults.schedule.group2)?,
            },
            retry: RetryConfig {
                max_attempts: env_or("CACHE_RETRY_MAX_ATTEMPTS", 3)?,
                backoff: Duration::from_millis(backoff_ms),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.ttl.is_zero() {
            return Err(AppError::Config("CACHE_TTL_MINUTES debe ser mayor que 0".into()));
        }
        if self.temp_ttl.is_zero() {
            return Err(AppError::Config("CACHE_TEMP_TTL_MINUTES debe ser mayor que 0".into()));
        }
        if self.detail_fetch_threads == 0 {
            return Err(AppError::Config("CACHE_DETAIL_FETCH_THREADS debe ser mayor que 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::Config("CACHE_RETRY_MAX_ATTEMPTS debe ser mayor que 0".into()));
        }
        Ok(())
    }
}

/// Minutos a `Duration`, rechazando valores que desbordan
fn minutes(name: &str, value: u64) -> AppResult<Duration> {
    value
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::Config(format!("{} fuera de rango ('{}')", name, value)))
}
