use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::info;

use crate::cache::{CacheConfig, RefreshGroup, SectionKey};
use crate::dto::admin_dto::AdminResponse;
use crate::models::{HomepageGroupResponse, HomepageResponse};
use crate::services::{CacheStatus, HomepageService, RefreshOrchestrator};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct HomepageController {
    homepage: Arc<HomepageService>,
    orchestrator: Arc<RefreshOrchestrator>,
    cache_config: CacheConfig,
}

impl HomepageController {
    pub fn new(state: &AppState) -> Self {
        Self {
            homepage: state.homepage.clone(),
            orchestrator: state.orchestrator.clone(),
            cache_config: state.cache_config.clone(),
        }
    }

    // ==================== LECTURA ====================

    pub async fn homepage_by_group(&self, group: &str) -> Result<HomepageGroupResponse, AppError> {
        self.homepage.get_homepage_by_group(group).await
    }

    pub async fn full_homepage(&self) -> Result<HomepageResponse, AppError> {
        self.homepage.get_homepage_data().await
    }

    // ==================== ADMIN ====================

    pub async fn refresh_all(&self) -> Result<AdminResponse, AppError> {
        info!("🔄 Refresco manual de todo el cache solicitado");
        let started = Instant::now();
        self.orchestrator.refresh_all().await?;

        Ok(AdminResponse::timed(
            "Todo el cache refrescado".to_string(),
            elapsed_ms(started),
        ))
    }

    pub async fn refresh_group(&self, group: &str) -> Result<AdminResponse, AppError> {
        info!("🔄 Refresco manual del grupo {} solicitado", group);
        let started = Instant::now();
        self.orchestrator.refresh_group(group).await?;

        Ok(AdminResponse::timed(
            format!("Grupo {} refrescado", group.trim().to_lowercase()),
            elapsed_ms(started),
        ))
    }

    pub async fn refresh_section(&self, section: &str) -> Result<AdminResponse, AppError> {
        info!("🔄 Refresco manual de la sección {} solicitado", section);
        let started = Instant::now();
        self.orchestrator.refresh_section(section).await?;

        Ok(AdminResponse::timed(
            format!("Sección {} refrescada", section.trim().to_lowercase()),
            elapsed_ms(started),
        ))
    }

    pub async fn clear_section(&self, section: &str) -> Result<AdminResponse, AppError> {
        self.orchestrator.clear_section(section).await?;
        Ok(AdminResponse::success(format!(
            "Sección {} eliminada del cache",
            section.trim().to_lowercase()
        )))
    }

    pub async fn clear_group(&self, group: &str) -> Result<AdminResponse, AppError> {
        self.orchestrator.clear_group(group).await?;
        Ok(AdminResponse::success(format!(
            "Grupo {} eliminado del cache",
            group.trim().to_lowercase()
        )))
    }

    pub async fn clear_all(&self) -> Result<AdminResponse, AppError> {
        let removed = self.orchestrator.clear_all().await?;
        Ok(
            AdminResponse::success(format!("Cache eliminado ({} claves)", removed))
                .with_warning("Los datos se obtendrán en la próxima petición"),
        )
    }

    pub async fn cache_status(&self) -> Result<CacheStatus, AppError> {
        info!("📊 Estado del cache solicitado");
        self.orchestrator.cache_status().await
    }

    pub fn set_schedule(&self, enabled: bool) -> AdminResponse {
        self.orchestrator.set_schedule_enabled(enabled);
        AdminResponse::success(format!(
            "Refrescos programados {}",
            if enabled { "habilitados" } else { "deshabilitados" }
        ))
    }

    /// Información del servicio
    pub fn info(&self) -> Value {
        let groups: Vec<Value> = RefreshGroup::ALL
            .iter()
            .map(|group| {
                json!({
                    "name": group.as_str(),
                    "sections": group.sections().iter().map(SectionKey::as_str).collect::<Vec<_>>(),
                    "next_group": group.next_group().map(|g| g.as_str()),
                })
            })
            .collect();

        json!({
            "app_name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "cache_strategy": "Refresco por grupos (3 grupos)",
            "cache_backend": self.cache_config.backend,
            "cache_ttl_minutes": self.cache_config.ttl.as_secs() / 60,
            "warm_up_delay_seconds": self.cache_config.warmup_delay.as_secs(),
            "groups": groups,
            "refresh_schedule": {
                "enabled": self.orchestrator.schedule_enabled(),
                "initial": self.cache_config.schedule.initial_group,
                "group1": self.cache_config.schedule.group1,
                "group2": self.cache_config.schedule.group2,
            },
            "retry": {
                "max_attempts": self.cache_config.retry.max_attempts,
                "backoff_ms": self.cache_config.retry.backoff.as_millis() as u64,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
