//! Refrescos programados
//!
//! Tareas tokio independientes del manejo de peticiones: un warm-up al
//! arrancar y un bucle por grupo guiado por su expresión cron.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheConfig, RefreshGroup};
use crate::services::homepage_service::HomepageService;
use crate::services::refresh_orchestrator::RefreshOrchestrator;
use crate::utils::errors::{AppError, AppResult};

pub struct CacheScheduler {
    orchestrator: Arc<RefreshOrchestrator>,
    homepage: Arc<HomepageService>,
    warmup_delay: Duration,
    schedules: Vec<(RefreshGroup, Schedule)>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CacheScheduler {
    /// Falla si alguna expresión cron es inválida
    pub fn new(
        orchestrator: Arc<RefreshOrchestrator>,
        homepage: Arc<HomepageService>,
        config: &CacheConfig,
    ) -> AppResult<Self> {
        let expressions = [
            (RefreshGroup::Initial, &config.schedule.initial_group),
            (RefreshGroup::Group1, &config.schedule.group1),
            (RefreshGroup::Group2, &config.schedule.group2),
        ];

        let mut schedules = Vec::with_capacity(expressions.len());
        for (group, expression) in expressions {
            let schedule = Schedule::from_str(expression).map_err(|e| {
                AppError::Config(format!(
                    "expresión cron inválida para {} '{}': {}",
                    group, expression, e
                ))
            })?;
            schedules.push((group, schedule));
        }

        Ok(Self {
            orchestrator,
            homepage,
            warmup_delay: config.warmup_delay,
            schedules,
            handles: Mutex::new(Vec::new()),
        })
    }

    /// Lanzar el warm-up y los bucles de cada grupo
    pub fn start(&self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);

        let homepage = self.homepage.clone();
        let delay = self.warmup_delay;
        handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            warm_up(&homepage).await;
        }));

        for (group, schedule) in &self.schedules {
            handles.push(tokio::spawn(run_group(
                self.orchestrator.clone(),
                *group,
                schedule.clone(),
            )));
        }

        info!(
            "⏰ Scheduler iniciado: warm-up en {}s, {} grupos programados",
            self.warmup_delay.as_secs(),
            self.schedules.len()
        );
        for (group, _) in &self.schedules {
            if let Some(next) = self.next_run(*group) {
                info!("   {} → próxima ejecución {}", group, next);
            }
        }
    }

    /// Próxima ejecución programada de un grupo
    pub fn next_run(&self, group: RefreshGroup) -> Option<DateTime<Utc>> {
        self.schedules
            .iter()
            .find(|(g, _)| *g == group)
            .and_then(|(_, schedule)| schedule.upcoming(Utc).next())
    }

    /// Abortar todas las tareas
    pub fn shutdown(&self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in handles.drain(..) {
            handle.abort();
        }
        info!("🛑 Scheduler detenido");
    }

    pub fn running_tasks(&self) -> usize {
        let handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.iter().filter(|handle| !handle.is_finished()).count()
    }
}

/// Poblar todo el cache; un fallo sólo se registra
pub async fn warm_up(homepage: &HomepageService) {
    info!("🚀 Iniciando warm-up del cache...");
    let started = std::time::Instant::now();

    match homepage.get_homepage_data().await {
        Ok(_) => info!(
            "✅ Cache precalentado en {}ms",
            started.elapsed().as_millis()
        ),
        Err(e) => error!("❌ Warm-up del cache FALLÓ: {}", e),
    }
}

async fn run_group(orchestrator: Arc<RefreshOrchestrator>, group: RefreshGroup, schedule: Schedule) {
    let mut last = Utc::now();

    loop {
        let Some(next) = schedule.after(&last).next() else {
            warn!("⚠️ La programación de {} no tiene más ejecuciones", group);
            return;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        debug!("⏰ Próximo refresco de {} a las {}", group, next);
        tokio::time::sleep(wait).await;
        last = next;

        if !orchestrator.schedule_enabled() {
            debug!("⏭️ Refresco programado deshabilitado, se omite {}", group);
            continue;
        }

        info!("⏰ Refrescando grupo {} ({:?})", group, group.sections());
        if let Err(e) = orchestrator.refresh_group_with_retry(group).await {
            error!("❌ Refresco programado de {} falló: {}", group, e);
        }
    }
}
