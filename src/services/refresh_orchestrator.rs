//! Orquestador de refrescos del cache
//!
//! Refresca grupos de secciones con un protocolo seguro:
//! respaldo → borrado → obtención → verificación → commit, o rollback
//! al respaldo si algo falla. Cada grupo tiene su propio mutex; las
//! operaciones que tocan varios grupos toman los locks en el orden
//! `initial → group1 → group2`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, info, warn};

use crate::cache::{
    CacheConfig, RefreshGroup, RetryConfig, SectionKey, SharedCacheStore,
    HOMEPAGE_PREFIX,
};
use crate::services::section_fetcher::SectionFetcher;
use crate::utils::errors::{verification_error, AppError, AppResult};

/// Estado de un grupo durante un refresco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshState {
    Idle,
    BackingUp,
    Clearing,
    Fetching,
    Verifying,
    Committed,
    RollingBack,
}

/// Resultado del último refresco terminado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshOutcome {
    Committed,
    RolledBack,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRefreshStatus {
    pub state: RefreshState,
    pub last_outcome: Option<RefreshOutcome>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for GroupRefreshStatus {
    fn default() -> Self {
        Self {
            state: RefreshState::Idle,
            last_outcome: None,
            last_finished_at: None,
            last_error: None,
        }
    }
}

/// Estado de una clave en el cache
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    pub status: &'static str,
    pub ttl_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Reporte de `/admin/cache/status`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub timestamp: DateTime<Utc>,
    pub total_keys: usize,
    pub keys: BTreeMap<String, KeyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub groups: BTreeMap<RefreshGroup, GroupRefreshStatus>,
    pub schedule_enabled: bool,
}

pub struct RefreshOrchestrator {
    fetcher: Arc<SectionFetcher>,
    cache: SharedCacheStore,
    ttl: Duration,
    temp_ttl: Duration,
    retry: RetryConfig,
    locks: [Mutex<()>; 3],
    states: RwLock<HashMap<RefreshGroup, GroupRefreshStatus>>,
    schedule_enabled: AtomicBool,
}

impl RefreshOrchestrator {
    pub fn new(fetcher: Arc<SectionFetcher>, cache: SharedCacheStore, config: &CacheConfig) -> Self {
        let states = RefreshGroup::ALL
            .into_iter()
            .map(|group| (group, GroupRefreshStatus::default()))
            .collect();

        Self {
            fetcher,
            cache,
            ttl: config.ttl,
            temp_ttl: config.temp_ttl,
            retry: config.retry.clone(),
            locks: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
            states: RwLock::new(states),
            schedule_enabled: AtomicBool::new(config.schedule.enabled),
        }
    }

    // ==================== REFRESCO ====================

    /// Refrescar un grupo con el protocolo seguro (sin reintentos)
    pub async fn refresh(&self, group: RefreshGroup) -> AppResult<()> {
        let _guards = self.lock_groups(&[group]).await;
        self.refresh_keys_safely(&[group], group.as_str(), group.sections())
            .await
    }

    /// Refrescar un grupo por nombre
    pub async fn refresh_group(&self, name: &str) -> AppResult<()> {
        let group = RefreshGroup::parse(name)?;
        self.refresh(group).await
    }

    /// Refresco programado: reintenta con backoff exponencial y, si se
    /// agotan los intentos, mantiene el cache anterior
    pub async fn refresh_group_with_retry(&self, group: RefreshGroup) -> AppResult<()> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.refresh(group).await {
                Ok(()) => {
                    if attempt > 1 {
                        info!("✅ Grupo {} refrescado en el intento {}", group, attempt);
                    }
                    return Ok(());
                }
                Err(e) if attempt < max_attempts => {
                    let delay = backoff_delay(self.retry.backoff, attempt);
                    warn!(
                        "🔁 Intento {}/{} de refrescar {} falló: {}. Reintentando en {:?}",
                        attempt, max_attempts, group, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.recover(group, &e);
                    return Err(e);
                }
            }
        }
    }

    fn recover(&self, group: RefreshGroup, e: &AppError) {
        error!(
            "❌ Refresco de {} falló tras {} intentos: {}. Se mantiene el cache anterior",
            group, self.retry.max_attempts, e
        );
    }

    /// Refrescar los tres grupos; se intentan todos y se devuelve el primer error
    pub async fn refresh_all(&self) -> AppResult<()> {
        info!("🔄 Refrescando todo el cache del homepage...");
        let mut first_error = None;

        for group in RefreshGroup::ALL {
            if let Err(e) = self.refresh(group).await {
                error!("❌ Error refrescando {}: {}", group, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("✅ Todo el cache del homepage refrescado");
                Ok(())
            }
        }
    }

    /// Refrescar una sección; las derivadas del feed refrescan también `raw`
    pub async fn refresh_section(&self, name: &str) -> AppResult<()> {
        let section = SectionKey::parse(name)?;
        let keys = match section {
            SectionKey::Section1 | SectionKey::Section6 => vec![SectionKey::Raw, section],
            _ => vec![section],
        };
        let groups = groups_of(&keys);

        let _guards = self.lock_groups(&groups).await;
        self.refresh_keys_safely(&groups, section.as_str(), &keys).await
    }

    // ==================== LIMPIEZA ====================

    pub async fn clear_section(&self, name: &str) -> AppResult<()> {
        let section = SectionKey::parse(name)?;
        let _guards = self.lock_groups(&[RefreshGroup::of_section(section)]).await;

        self.cache.delete(&section.cache_key()).await?;
        info!("🗑️ Sección {} eliminada del cache", section);
        Ok(())
    }

    pub async fn clear_group(&self, name: &str) -> AppResult<()> {
        let group = RefreshGroup::parse(name)?;
        let _guards = self.lock_groups(&[group]).await;

        for section in group.sections() {
            self.cache.delete(&section.cache_key()).await?;
        }
        info!("🗑️ Grupo {} eliminado del cache", group);
        Ok(())
    }

    /// Borrar todas las claves `homepage::`; devuelve cuántas había
    pub async fn clear_all(&self) -> AppResult<usize> {
        let _guards = self.lock_groups(&RefreshGroup::ALL).await;

        let keys = self.cache.keys_with_prefix(HOMEPAGE_PREFIX).await?;
        for key in &keys {
            self.cache.delete(key).await?;
        }
        info!("🗑️ Cache del homepage vaciado ({} claves)", keys.len());
        Ok(keys.len())
    }

    // ==================== ESTADO ====================

    pub async fn cache_status(&self) -> AppResult<CacheStatus> {
        let now = Utc::now();
        let keys = self.cache.keys_with_prefix(HOMEPAGE_PREFIX).await?;

        let mut details = BTreeMap::new();
        for key in &keys {
            let status = match self.cache.ttl(key).await? {
                Some(ttl) if ttl.as_secs() > 0 => {
                    let seconds = ttl.as_secs();
                    KeyStatus {
                        status: "CACHED",
                        ttl_seconds: seconds,
                        ttl_minutes: Some(seconds / 60),
                        expires_at: chrono::Duration::from_std(ttl).ok().map(|d| now + d),
                    }
                }
                _ => KeyStatus {
                    status: "EXPIRED",
                    ttl_seconds: 0,
                    ttl_minutes: None,
                    expires_at: None,
                },
            };
            details.insert(key.clone(), status);
        }

        let warning = keys.is_empty().then(|| {
            "No hay cache. Se creará en la próxima petición o refresco programado.".to_string()
        });

        Ok(CacheStatus {
            timestamp: now,
            total_keys: keys.len(),
            keys: details,
            warning,
            groups: self.group_states().await,
            schedule_enabled: self.schedule_enabled(),
        })
    }

    pub async fn group_states(&self) -> BTreeMap<RefreshGroup, GroupRefreshStatus> {
        let states = self.states.read().await;
        states.iter().map(|(group, status)| (*group, status.clone())).collect()
    }

    pub fn schedule_enabled(&self) -> bool {
        self.schedule_enabled.load(Ordering::SeqCst)
    }

    pub fn set_schedule_enabled(&self, enabled: bool) {
        self.schedule_enabled.store(enabled, Ordering::SeqCst);
        info!(
            "⏰ Refrescos programados {}",
            if enabled { "habilitados" } else { "deshabilitados" }
        );
    }

    // ==================== PROTOCOLO ====================

    /// Tomar los locks de los grupos en orden fijo
    async fn lock_groups(&self, groups: &[RefreshGroup]) -> Vec<MutexGuard<'_, ()>> {
        let mut ordered = groups.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for group in ordered {
            guards.push(self.locks[group.index()].lock().await);
        }
        guards
    }

    /// El llamador debe tener los locks de `groups`
    async fn refresh_keys_safely(
        &self,
        groups: &[RefreshGroup],
        label: &str,
        keys: &[SectionKey],
    ) -> AppResult<()> {
        let started = Instant::now();
        info!("🔄 Iniciando refresco seguro de {} ({} claves)", label, keys.len());

        self.set_state(groups, RefreshState::BackingUp).await;
        let backups = match self.backup_keys(keys).await {
            Ok(backups) => backups,
            Err(e) => {
                error!("❌ No se pudo respaldar {}: {}", label, e);
                self.delete_temps(keys).await;
                self.finish(groups, RefreshOutcome::RolledBack, Some(&e)).await;
                return Err(e);
            }
        };

        match self.clear_fetch_verify(groups, keys).await {
            Ok(()) => {
                self.set_state(groups, RefreshState::Committed).await;
                self.delete_temps(keys).await;
                self.finish(groups, RefreshOutcome::Committed, None).await;
                info!("✅ {} refrescado en {}ms", label, started.elapsed().as_millis());
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Refresco de {} falló, restaurando respaldo: {}", label, e);
                self.set_state(groups, RefreshState::RollingBack).await;
                self.rollback(keys, &backups).await;
                self.finish(groups, RefreshOutcome::RolledBack, Some(&e)).await;
                Err(e)
            }
        }
    }

    /// Copiar a `homepage::temp::*` las claves que tienen valor
    async fn backup_keys(&self, keys: &[SectionKey]) -> AppResult<HashMap<SectionKey, String>> {
        let mut backups = HashMap::new();

        for key in keys {
            if let Some(value) = self.cache.get_raw(&key.cache_key()).await? {
                self.cache
                    .set_raw(&key.temp_key(), value.clone(), self.temp_ttl)
                    .await?;
                backups.insert(*key, value);
                debug!("💾 Respaldo creado: {}", key.temp_key());
            }
        }

        Ok(backups)
    }

    async fn clear_fetch_verify(&self, groups: &[RefreshGroup], keys: &[SectionKey]) -> AppResult<()> {
        self.set_state(groups, RefreshState::Clearing).await;
        for key in keys {
            self.cache.delete(&key.cache_key()).await?;
        }

        self.set_state(groups, RefreshState::Fetching).await;
        for key in keys {
            self.fetcher.fetch_section(*key).await?;
        }

        self.set_state(groups, RefreshState::Verifying).await;
        for key in keys {
            let cache_key = key.cache_key();
            if !self.cache.exists(&cache_key).await? {
                return Err(verification_error(&cache_key));
            }
        }

        Ok(())
    }

    /// Restaurar cada clave desde su respaldo, o dejarla ausente si no tenía.
    /// Los errores se registran y no reemplazan el error original.
    async fn rollback(&self, keys: &[SectionKey], backups: &HashMap<SectionKey, String>) {
        for key in keys {
            let cache_key = key.cache_key();
            let restored = match backups.get(key) {
                Some(in_memory) => {
                    let value = match self.cache.get_raw(&key.temp_key()).await {
                        Ok(Some(value)) => value,
                        _ => in_memory.clone(),
                    };
                    self.cache.set_raw(&cache_key, value, self.ttl).await
                }
                None => self.cache.delete(&cache_key).await,
            };

            match restored {
                Ok(()) => debug!("↩️ Clave restaurada: {}", cache_key),
                Err(e) => error!("❌ Error restaurando {}: {}", cache_key, e),
            }
        }

        self.delete_temps(keys).await;
    }

    async fn delete_temps(&self, keys: &[SectionKey]) {
        for key in keys {
            if let Err(e) = self.cache.delete(&key.temp_key()).await {
                error!("❌ Error eliminando respaldo {}: {}", key.temp_key(), e);
            }
        }
    }

    async fn set_state(&self, groups: &[RefreshGroup], state: RefreshState) {
        let mut states = self.states.write().await;
        for group in groups {
            states.entry(*group).or_default().state = state;
        }
    }

    async fn finish(
        &self,
        groups: &[RefreshGroup],
        outcome: RefreshOutcome,
        error: Option<&AppError>,
    ) {
        let mut states = self.states.write().await;
        for group in groups {
            let status = states.entry(*group).or_default();
            status.state = RefreshState::Idle;
            status.last_outcome = Some(outcome);
            status.last_finished_at = Some(Utc::now());
            status.last_error = error.map(|e| e.to_string());
        }
    }
}

fn groups_of(keys: &[SectionKey]) -> Vec<RefreshGroup> {
    let mut groups: Vec<RefreshGroup> = keys.iter().map(|k| RefreshGroup::of_section(*k)).collect();
    groups.sort();
    groups.dedup();
    groups
}

/// base · 2^(intento-1) más hasta un 10% de jitter
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    let jitter_cap = (base.as_millis() as u64 / 10).max(1);
    let jitter = rand::thread_rng().gen_range(0..jitter_cap);
    base.saturating_mul(factor) + Duration::from_millis(jitter)
}
