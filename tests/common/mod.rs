#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use movie_homepage::cache::{CacheBackend, CacheConfig, MemoryCacheStore, SharedCacheStore};
use movie_homepage::clients::{CatalogApi, ListQuery};
use movie_homepage::config::environment::EnvironmentConfig;
use movie_homepage::models::ophim::{FeedData, MovieDetailData};
use movie_homepage::models::{
    OphimHomepageResponse, OphimListResponse, OphimMovieDetail, OphimMovieDetailResponse,
    OphimMovieItem,
};
use movie_homepage::routes::create_router;
use movie_homepage::services::CdnImageOptimizer;
use movie_homepage::state::AppState;
use movie_homepage::utils::errors::{AppError, AppResult};

pub const CDN: &str = "https://img.test/uploads/movies";

fn movie(slug: &str) -> OphimMovieItem {
    OphimMovieItem {
        name: Some(format!("Phim {}", slug)),
        slug: slug.to_string(),
        thumb_url: Some(format!("{}-thumb.jpg", slug)),
        poster_url: Some(format!("{}-poster.jpg", slug)),
        ..Default::default()
    }
}

/// Catálogo de prueba: 21 items en el feed y 20 por lista
pub struct TestCatalog {
    pub down: AtomicBool,
    pub failing_categories: Mutex<HashSet<String>>,
    pub failing_details: Mutex<HashSet<String>>,
    pub home_calls: AtomicUsize,
    pub generation: AtomicUsize,
    pub feed_delay_ms: AtomicU64,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self {
            down: AtomicBool::new(false),
            failing_categories: Mutex::new(HashSet::new()),
            failing_details: Mutex::new(HashSet::new()),
            home_calls: AtomicUsize::new(0),
            generation: AtomicUsize::new(0),
            feed_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn fail_category(&self, category: &str) {
        self.failing_categories.lock().unwrap().insert(category.to_string());
    }

    pub fn fail_detail(&self, slug: &str) {
        self.failing_details.lock().unwrap().insert(slug.to_string());
    }

    /// Demora cada lectura del feed
    pub fn set_feed_delay(&self, delay: Duration) {
        self.feed_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Cambia el nombre de todos los items a partir de la próxima llamada
    pub fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn item(&self, slug: &str) -> OphimMovieItem {
        let mut item = movie(slug);
        item.name = Some(format!(
            "Phim {} v{}",
            slug,
            self.generation.load(Ordering::SeqCst)
        ));
        item
    }

    fn check(&self) -> AppResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamUnavailable("ophim caído".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for TestCatalog {
    async fn get_home_feed(&self) -> AppResult<OphimHomepageResponse> {
        self.home_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.feed_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check()?;
        Ok(OphimHomepageResponse {
            status: Some("success".into()),
            data: FeedData {
                items: (0..21).map(|i| self.item(&format!("feed-{}", i))).collect(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn get_category_list(&self, slug: &str, query: &ListQuery) -> AppResult<OphimListResponse> {
        self.check()?;
        if let Some(category) = &query.category {
            if self.failing_categories.lock().unwrap().contains(category) {
                return Err(AppError::UpstreamUnavailable(format!("{} caída", category)));
            }
        }
        let prefix = format!(
            "{}-{}-{}",
            slug,
            query.country.as_deref().unwrap_or("all"),
            query.category.as_deref().unwrap_or("all")
        );
        Ok(OphimListResponse {
            status: Some("success".into()),
            data: FeedData {
                items: (0..20).map(|i| self.item(&format!("{}-{}", prefix, i))).collect(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn get_detail(&self, slug: &str) -> AppResult<OphimMovieDetailResponse> {
        self.check()?;
        if self.failing_details.lock().unwrap().contains(slug) {
            return Err(AppError::UpstreamUnavailable(format!("detalle {} caído", slug)));
        }
        Ok(OphimMovieDetailResponse {
            status: Some("success".into()),
            message: None,
            data: MovieDetailData {
                item: OphimMovieDetail {
                    base: self.item(slug),
                    content: Some(format!("Nội dung {}", slug)),
                    episodes: Vec::new(),
                },
            },
        })
    }
}

pub struct TestApp {
    pub catalog: Arc<TestCatalog>,
    pub cache: SharedCacheStore,
    pub state: AppState,
}

pub fn test_cache_config() -> CacheConfig {
    CacheConfig {
        backend: CacheBackend::Memory,
        ttl: Duration::from_secs(3600),
        detail_fetch_threads: 4,
        ..Default::default()
    }
}

pub fn test_app() -> TestApp {
    let catalog = Arc::new(TestCatalog::new());
    let cache: SharedCacheStore = Arc::new(MemoryCacheStore::new());
    let state = AppState::new(
        EnvironmentConfig::default(),
        test_cache_config(),
        catalog.clone(),
        Arc::new(CdnImageOptimizer::new(CDN, false)),
        cache.clone(),
    );

    TestApp {
        catalog,
        cache,
        state,
    }
}

impl TestApp {
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Enviar un request y devolver estado y cuerpo JSON
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
