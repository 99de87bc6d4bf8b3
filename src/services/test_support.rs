//! Dobles de prueba para los servicios del homepage

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{MemoryCacheStore, SharedCacheStore};
use crate::clients::{CatalogApi, ListQuery};
use crate::models::ophim::{FeedData, MovieDetailData};
use crate::models::{
    OphimHomepageResponse, OphimListResponse, OphimMovieDetail, OphimMovieDetailResponse,
    OphimMovieItem,
};
use crate::services::image_optimization_service::CdnImageOptimizer;
use crate::services::section_fetcher::SectionFetcher;
use crate::services::worker_pool::WorkerPool;
use crate::utils::errors::{AppError, AppResult};

pub(crate) const TEST_CDN: &str = "https://img.test/uploads/movies";

pub(crate) fn movie(slug: &str) -> OphimMovieItem {
    OphimMovieItem {
        name: Some(format!("Phim {}", slug)),
        slug: slug.to_string(),
        thumb_url: Some(format!("{}-thumb.jpg", slug)),
        poster_url: Some(format!("{}-poster.jpg", slug)),
        ..Default::default()
    }
}

/// Catálogo falso con fallos y demoras configurables
pub(crate) struct FakeCatalog {
    feed_size: usize,
    list_size: usize,
    outage: AtomicBool,
    pending_failures: AtomicUsize,
    failing_details: Mutex<HashSet<String>>,
    failing_lists: Mutex<Vec<String>>,
    detail_delays: Mutex<HashMap<String, Duration>>,
    pub home_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub queries: Mutex<Vec<(String, ListQuery)>>,
}

impl FakeCatalog {
    pub fn new(feed_size: usize) -> Self {
        Self {
            feed_size,
            list_size: 20,
            outage: AtomicBool::new(false),
            pending_failures: AtomicUsize::new(0),
            failing_details: Mutex::new(HashSet::new()),
            failing_lists: Mutex::new(Vec::new()),
            detail_delays: Mutex::new(HashMap::new()),
            home_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Todas las llamadas fallan
    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    /// Las próximas `n` llamadas fallan
    pub fn fail_next_calls(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_detail(&self, slug: &str) {
        self.failing_details.lock().unwrap().insert(slug.to_string());
    }

    /// Falla toda lista cuyo slug, país o categoría coincida con `needle`
    pub fn fail_lists_matching(&self, needle: &str) {
        self.failing_lists.lock().unwrap().push(needle.to_string());
    }

    pub fn delay_detail(&self, slug: &str, delay: Duration) {
        self.detail_delays.lock().unwrap().insert(slug.to_string(), delay);
    }

    fn check_outage(&self) -> AppResult<()> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamUnavailable("catálogo caído".into()));
        }
        let pending = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(AppError::UpstreamUnavailable("fallo transitorio".into()));
        }
        Ok(())
    }

    fn list_prefix(slug: &str, query: &ListQuery) -> String {
        let mut prefix = slug.to_string();
        if let Some(country) = &query.country {
            prefix.push('-');
            prefix.push_str(&country.replace([',', ' '], ""));
        }
        if let Some(category) = &query.category {
            prefix.push('-');
            prefix.push_str(category);
        }
        prefix
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn get_home_feed(&self) -> AppResult<OphimHomepageResponse> {
        self.home_calls.fetch_add(1, Ordering::SeqCst);
        self.check_outage()?;

        let items = (0..self.feed_size).map(|i| movie(&format!("feed-{}", i))).collect();
        Ok(OphimHomepageResponse {
            status: Some("success".into()),
            data: FeedData {
                items,
                seo_on_page: Some(serde_json::json!({"titleHead": "Phim hay"})),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn get_category_list(&self, slug: &str, query: &ListQuery) -> AppResult<OphimListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((slug.to_string(), query.clone()));
        self.check_outage()?;

        let failing = self.failing_lists.lock().unwrap().iter().any(|needle| {
            slug == needle.as_str()
                || query.country.as_deref() == Some(needle.as_str())
                || query.category.as_deref() == Some(needle.as_str())
        });
        if failing {
            return Err(AppError::UpstreamUnavailable(format!("lista {} caída", slug)));
        }

        let prefix = Self::list_prefix(slug, query);
        let items = (0..self.list_size)
            .map(|i| movie(&format!("{}-{}", prefix, i)))
            .collect();
        Ok(OphimListResponse {
            status: Some("success".into()),
            data: FeedData {
                items,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn get_detail(&self, slug: &str) -> AppResult<OphimMovieDetailResponse> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.detail_delays.lock().unwrap().get(slug).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_outage()?;

        if self.failing_details.lock().unwrap().contains(slug) {
            return Err(AppError::UpstreamUnavailable(format!("detalle {} caído", slug)));
        }

        let mut base = movie(slug);
        base.thumb_url = Some(format!("{}-detail-thumb.jpg", slug));
        base.poster_url = Some(format!("{}-detail-poster.jpg", slug));
        Ok(OphimMovieDetailResponse {
            status: Some("success".into()),
            message: None,
            data: MovieDetailData {
                item: OphimMovieDetail {
                    base,
                    content: Some(format!("Nội dung {}", slug)),
                    episodes: Vec::new(),
                },
            },
        })
    }
}

/// Fetcher sobre catálogo falso y cache en memoria
pub(crate) struct Fixture {
    pub catalog: Arc<FakeCatalog>,
    pub cache: SharedCacheStore,
    pub fetcher: Arc<SectionFetcher>,
}

pub(crate) const TEST_TTL: Duration = Duration::from_secs(3600);

pub(crate) fn fixture(feed_size: usize) -> Fixture {
    let catalog = Arc::new(FakeCatalog::new(feed_size));
    let cache: SharedCacheStore = Arc::new(MemoryCacheStore::new());
    let fetcher = Arc::new(SectionFetcher::new(
        catalog.clone(),
        Arc::new(CdnImageOptimizer::new(TEST_CDN, false)),
        cache.clone(),
        WorkerPool::new(4),
        TEST_TTL,
    ));

    Fixture {
        catalog,
        cache,
        fetcher,
    }
}
