//! Servicio de secciones del homepage
//!
//! Cada sección se obtiene con cache-aside: si la clave existe se devuelve
//! lo cacheado, si no se consulta Ophim, se enriquece y se guarda con el
//! TTL configurado. Un fallo de la consulta base no escribe nada.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheStoreExt, SectionKey, SharedCacheStore};
use crate::clients::{CatalogApi, ListQuery};
use crate::models::{MovieItem, OphimHomepageResponse, OphimMovieItem, Section2Data};
use crate::services::image_optimization_service::{optimize_or_original, ImageKind, ImageOptimizer};
use crate::services::worker_pool::WorkerPool;
use crate::utils::errors::{AppError, AppResult};

/// Items por lista
const LIST_LIMIT: usize = 14;

/// Primeros items del feed que llevan detalle (sección 1)
const ENRICHED_FEED_HEAD: usize = 7;

pub struct SectionFetcher {
    catalog: Arc<dyn CatalogApi>,
    images: Arc<dyn ImageOptimizer>,
    cache: SharedCacheStore,
    pool: WorkerPool,
    ttl: Duration,
}

impl SectionFetcher {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        images: Arc<dyn ImageOptimizer>,
        cache: SharedCacheStore,
        pool: WorkerPool,
        ttl: Duration,
    ) -> Self {
        debug!(
            "🧵 SectionFetcher con {} workers de detalle, TTL {}s",
            pool.size(),
            ttl.as_secs()
        );
        Self {
            catalog,
            images,
            cache,
            pool,
            ttl,
        }
    }

    /// Cache-aside genérico sobre la clave canónica de la sección
    async fn cached<T, F, Fut>(&self, section: SectionKey, compute: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let key = section.cache_key();
        match self.cache.get::<T>(&key).await {
            Ok(Some(value)) => {
                debug!("📥 Cache HIT para clave: {}", key);
                return Ok(value);
            }
            Ok(None) => debug!("📭 Cache MISS para clave: {}", key),
            Err(AppError::Serialization(e)) => {
                warn!("⚠️ Valor ilegible en {}, se vuelve a calcular: {}", key, e);
            }
            Err(e) => return Err(e),
        }

        let value = compute().await?;
        self.cache.set(&key, &value, self.ttl).await?;
        info!("💾 Sección {} guardada en cache", section);
        Ok(value)
    }

    // ==================== SECCIONES ====================

    pub async fn fetch_homepage_raw(&self) -> AppResult<OphimHomepageResponse> {
        self.cached(SectionKey::Raw, || async {
            info!("📥 Obteniendo feed crudo de Ophim...");
            self.catalog.get_home_feed().await
        })
        .await
    }

    /// Primeros 7 items del feed con detalle
    pub async fn fetch_section1(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section1, || self.compute_section1()).await
    }

    /// Tres listas por país consultadas en paralelo
    pub async fn fetch_section2(&self) -> AppResult<Section2Data> {
        self.cached(SectionKey::Section2, || self.compute_section2()).await
    }

    /// Series del año en curso
    pub async fn fetch_section3(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section3, || {
            self.list_section("phim-bo", ListQuery::default().year(current_year()))
        })
        .await
    }

    /// Cine de acción
    pub async fn fetch_section4(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section4, || {
            self.list_section("phim-chieu-rap", ListQuery::default().category("hanh-dong"))
        })
        .await
    }

    /// Películas del año en curso
    pub async fn fetch_section5(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section5, || {
            self.list_section("phim-le", ListQuery::default().year(current_year()))
        })
        .await
    }

    /// Items 8 a 21 del feed, sin detalle
    pub async fn fetch_section6(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section6, || self.compute_section6()).await
    }

    /// Terror tailandés
    pub async fn fetch_section7(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section7, || {
            self.list_section(
                "phim-moi",
                ListQuery::default().category("kinh-di").country("thai-lan"),
            )
        })
        .await
    }

    /// Romance coreano
    pub async fn fetch_section8(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section8, || {
            self.list_section(
                "phim-moi",
                ListQuery::default().category("tinh-cam").country("han-quoc"),
            )
        })
        .await
    }

    /// Animación japonesa/coreana con detalle
    pub async fn fetch_section9(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section9, || self.compute_section9()).await
    }

    pub async fn fetch_section10(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section10, || {
            self.list_section("phim-moi", ListQuery::default().category("hinh-su"))
        })
        .await
    }

    pub async fn fetch_section11(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section11, || {
            self.list_section("phim-moi", ListQuery::default().category("bi-an"))
        })
        .await
    }

    pub async fn fetch_section12(&self) -> AppResult<Vec<MovieItem>> {
        self.cached(SectionKey::Section12, || {
            self.list_section("phim-moi", ListQuery::default().category("phieu-luu"))
        })
        .await
    }

    /// Poblar una sección (si falta) sin devolver su contenido
    pub async fn fetch_section(&self, section: SectionKey) -> AppResult<()> {
        match section {
            SectionKey::Raw => self.fetch_homepage_raw().await.map(|_| ()),
            SectionKey::Section1 => self.fetch_section1().await.map(|_| ()),
            SectionKey::Section2 => self.fetch_section2().await.map(|_| ()),
            SectionKey::Section3 => self.fetch_section3().await.map(|_| ()),
            SectionKey::Section4 => self.fetch_section4().await.map(|_| ()),
            SectionKey::Section5 => self.fetch_section5().await.map(|_| ()),
            SectionKey::Section6 => self.fetch_section6().await.map(|_| ()),
            SectionKey::Section7 => self.fetch_section7().await.map(|_| ()),
            SectionKey::Section8 => self.fetch_section8().await.map(|_| ()),
            SectionKey::Section9 => self.fetch_section9().await.map(|_| ()),
            SectionKey::Section10 => self.fetch_section10().await.map(|_| ()),
            SectionKey::Section11 => self.fetch_section11().await.map(|_| ()),
            SectionKey::Section12 => self.fetch_section12().await.map(|_| ()),
        }
    }

    // ==================== CÁLCULO ====================

    async fn compute_section1(&self) -> AppResult<Vec<MovieItem>> {
        info!("📥 Obteniendo sección 1 (7 items con detalle, en paralelo)...");
        let raw = self.fetch_homepage_raw().await?;
        let head = raw.data.items.into_iter().take(ENRICHED_FEED_HEAD).collect();
        Ok(self.fetch_items_with_detail(head).await)
    }

    async fn compute_section2(&self) -> AppResult<Section2Data> {
        info!("📥 Obteniendo sección 2 (Corea, China, EE.UU./Reino Unido)...");
        let (list_korea, list_china, list_us_and_uk) = tokio::try_join!(
            self.list_section("phim-moi", ListQuery::default().country("han-quoc")),
            self.list_section("phim-moi", ListQuery::default().country("trung-quoc")),
            self.list_section("phim-moi", ListQuery::default().country("au-my")),
        )?;

        Ok(Section2Data {
            list_korea,
            list_china,
            list_us_and_uk,
        })
    }

    async fn compute_section6(&self) -> AppResult<Vec<MovieItem>> {
        info!("📥 Obteniendo sección 6 (14 items del feed sin detalle)...");
        let raw = self.fetch_homepage_raw().await?;
        let items = raw
            .data
            .items
            .into_iter()
            .skip(ENRICHED_FEED_HEAD)
            .take(LIST_LIMIT)
            .collect();
        Ok(self.process_items_without_detail(items).await)
    }

    async fn compute_section9(&self) -> AppResult<Vec<MovieItem>> {
        info!("📥 Obteniendo sección 9 (animación con detalle)...");
        let response = self
            .catalog
            .get_category_list("hoat-hinh", &ListQuery::default().country("nhat-ban, han-quoc"))
            .await?;
        let items = response.data.items.into_iter().take(LIST_LIMIT).collect();
        Ok(self.fetch_items_with_detail(items).await)
    }

    /// Lista de Ophim con imágenes optimizadas y sin contenido
    async fn list_section(&self, slug: &str, query: ListQuery) -> AppResult<Vec<MovieItem>> {
        let response = self.catalog.get_category_list(slug, &query).await?;
        let items = response.data.items.into_iter().take(LIST_LIMIT).collect();
        Ok(self.process_items_without_detail(items).await)
    }

    // ==================== ENRIQUECIMIENTO ====================

    /// Detalle por item en el pool; conserva el orden de entrada
    async fn fetch_items_with_detail(&self, items: Vec<OphimMovieItem>) -> Vec<MovieItem> {
        info!("🚀 Obteniendo detalle de {} items en paralelo...", items.len());
        self.pool
            .map_ordered(items, |item| self.process_item_with_detail(item))
            .await
    }

    async fn process_items_without_detail(&self, items: Vec<OphimMovieItem>) -> Vec<MovieItem> {
        join_all(items.into_iter().map(|item| self.process_item_without_detail(item))).await
    }

    async fn process_item_with_detail(&self, item: OphimMovieItem) -> MovieItem {
        debug!("📄 Obteniendo contenido de: {}", item.slug);

        match self.catalog.get_detail(&item.slug).await {
            Ok(detail) => {
                let detail = detail.data.item;
                let slug = if detail.base.slug.is_empty() {
                    item.slug.clone()
                } else {
                    detail.base.slug.clone()
                };
                let thumb = detail.base.thumb_url.as_deref().or(item.thumb_url.as_deref());
                let poster = detail.base.poster_url.as_deref().or(item.poster_url.as_deref());

                let optimized_thumb =
                    optimize_or_original(self.images.as_ref(), thumb, &slug, ImageKind::Thumb).await;
                let optimized_poster =
                    optimize_or_original(self.images.as_ref(), poster, &slug, ImageKind::Poster).await;

                MovieItem {
                    content: detail.content,
                    optimized_thumb,
                    optimized_poster,
                    ..MovieItem::from_item(item)
                }
            }
            Err(e) => {
                warn!("⚠️ No se pudo obtener contenido de {}: {}", item.slug, e);
                let optimized_thumb = self.original_url(item.thumb_url.as_deref());
                let optimized_poster = self.original_url(item.poster_url.as_deref());

                MovieItem {
                    content: None,
                    optimized_thumb,
                    optimized_poster,
                    ..MovieItem::from_item(item)
                }
            }
        }
    }

    async fn process_item_without_detail(&self, item: OphimMovieItem) -> MovieItem {
        let optimized_thumb = optimize_or_original(
            self.images.as_ref(),
            item.thumb_url.as_deref(),
            &item.slug,
            ImageKind::Thumb,
        )
        .await;
        let optimized_poster = optimize_or_original(
            self.images.as_ref(),
            item.poster_url.as_deref(),
            &item.slug,
            ImageKind::Poster,
        )
        .await;

        MovieItem {
            content: None,
            optimized_thumb,
            optimized_poster,
            ..MovieItem::from_item(item)
        }
    }

    fn original_url(&self, url: Option<&str>) -> Option<String> {
        url.map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| self.images.resolve_url(u))
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{fixture, TEST_CDN};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_feed_of_21_items_splits_into_section1_and_section6() {
        let fx = fixture(21);

        let section1 = fx.fetcher.fetch_section1().await.unwrap();
        let section6 = fx.fetcher.fetch_section6().await.unwrap();

        let slugs1: Vec<&str> = section1.iter().map(|m| m.slug()).collect();
        let expected1: Vec<String> = (0..7).map(|i| format!("feed-{}", i)).collect();
        assert_eq!(slugs1, expected1);
        assert!(section1.iter().all(|m| m.content.is_some()));

        let slugs6: Vec<&str> = section6.iter().map(|m| m.slug()).collect();
        let expected6: Vec<String> = (7..21).map(|i| format!("feed-{}", i)).collect();
        assert_eq!(slugs6, expected6);
        assert!(section6.iter().all(|m| m.content.is_none()));
        assert_eq!(
            section6[0].optimized_thumb.as_deref(),
            Some(format!("{}/feed-7-thumb.jpg", TEST_CDN).as_str())
        );

        // El feed crudo se pidió una sola vez
        assert_eq!(fx.catalog.home_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_one_failed_detail_degrades_only_that_item() {
        let fx = fixture(21);
        fx.catalog.fail_detail("feed-3");

        let section1 = fx.fetcher.fetch_section1().await.unwrap();

        assert_eq!(section1.len(), 7);
        for (i, item) in section1.iter().enumerate() {
            if i == 3 {
                assert!(item.content.is_none());
                assert_eq!(
                    item.optimized_thumb.as_deref(),
                    Some(format!("{}/feed-3-thumb.jpg", TEST_CDN).as_str())
                );
            } else {
                assert!(item.content.is_some());
                assert!(item
                    .optimized_poster
                    .as_deref()
                    .is_some_and(|u| u.ends_with("-detail-poster.jpg")));
            }
        }
    }

    #[tokio::test]
    async fn test_enrichment_keeps_upstream_order() {
        let fx = fixture(7);
        fx.catalog.delay_detail("feed-0", Duration::from_millis(60));
        fx.catalog.delay_detail("feed-1", Duration::from_millis(30));

        let section1 = fx.fetcher.fetch_section1().await.unwrap();

        let slugs: Vec<&str> = section1.iter().map(|m| m.slug()).collect();
        assert_eq!(
            slugs,
            vec!["feed-0", "feed-1", "feed-2", "feed-3", "feed-4", "feed-5", "feed-6"]
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let fx = fixture(21);

        let first = fx.fetcher.fetch_section10().await.unwrap();
        let second = fx.fetcher.fetch_section10().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 14);
        assert_eq!(fx.catalog.list_calls.load(Ordering::SeqCst), 1);
        assert!(fx.cache.exists("homepage::section10").await.unwrap());
    }

    #[tokio::test]
    async fn test_upstream_failure_writes_nothing() {
        let fx = fixture(21);
        fx.catalog.set_outage(true);

        let result = fx.fetcher.fetch_section3().await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
        assert!(!fx.cache.exists("homepage::section3").await.unwrap());
    }

    #[tokio::test]
    async fn test_section2_queries_three_countries() {
        let fx = fixture(21);

        let section2 = fx.fetcher.fetch_section2().await.unwrap();

        assert_eq!(section2.list_korea.len(), 14);
        assert!(section2.list_korea[0].slug().starts_with("phim-moi-han-quoc"));
        assert!(section2.list_china[0].slug().starts_with("phim-moi-trung-quoc"));
        assert!(section2.list_us_and_uk[0].slug().starts_with("phim-moi-au-my"));
    }

    #[tokio::test]
    async fn test_section2_fails_when_one_country_fails() {
        let fx = fixture(21);
        fx.catalog.fail_lists_matching("trung-quoc");

        assert!(fx.fetcher.fetch_section2().await.is_err());
        assert!(!fx.cache.exists("homepage::section2").await.unwrap());
    }

    #[tokio::test]
    async fn test_year_filter_uses_current_year() {
        let fx = fixture(21);

        fx.fetcher.fetch_section5().await.unwrap();

        let queries = fx.catalog.queries.lock().unwrap();
        let (slug, query) = &queries[0];
        assert_eq!(slug, "phim-le");
        assert_eq!(query.year, Some(current_year()));
        assert_eq!(query.limit, 14);
    }

    #[tokio::test]
    async fn test_section9_is_enriched() {
        let fx = fixture(21);

        let section9 = fx.fetcher.fetch_section9().await.unwrap();

        assert_eq!(section9.len(), 14);
        assert!(section9.iter().all(|m| m.content.is_some()));
        assert_eq!(fx.catalog.detail_calls.load(Ordering::SeqCst), 14);
    }

    #[tokio::test]
    async fn test_unreadable_cached_value_is_recomputed() {
        let fx = fixture(21);
        fx.cache
            .set_raw("homepage::section11", "no es json".into(), Duration::from_secs(60))
            .await
            .unwrap();

        let section11 = fx.fetcher.fetch_section11().await.unwrap();

        assert_eq!(section11.len(), 14);
    }

    #[tokio::test]
    async fn test_fetch_section_populates_each_key() {
        let fx = fixture(21);

        for section in SectionKey::ALL {
            fx.fetcher.fetch_section(section).await.unwrap();
            assert!(fx.cache.exists(&section.cache_key()).await.unwrap());
        }
    }
}
