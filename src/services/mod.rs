//! Services module
//!
//! Este módulo contiene la lógica de negocio del homepage: obtención de
//! secciones, orquestación de refrescos, programación y armado de
//! respuestas.

pub mod homepage_service;
pub mod image_optimization_service;
pub mod refresh_orchestrator;
pub mod scheduler;
pub mod section_fetcher;
pub mod worker_pool;

#[cfg(test)]
pub(crate) mod test_support;

pub use homepage_service::HomepageService;
pub use image_optimization_service::{CdnImageOptimizer, ImageKind, ImageOptimizer};
pub use refresh_orchestrator::{CacheStatus, RefreshOrchestrator, RefreshOutcome, RefreshState};
pub use scheduler::CacheScheduler;
pub use section_fetcher::SectionFetcher;
pub use worker_pool::WorkerPool;
