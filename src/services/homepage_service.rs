//! Servicio del homepage
//!
//! Arma las respuestas agrupadas y completa leyendo cada sección a través
//! del cache-aside del `SectionFetcher`. Nunca llama a Ophim directamente.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

use crate::cache::RefreshGroup;
use crate::models::{HomepageGroupResponse, HomepageResponse, OphimHomepageResponse};
use crate::services::section_fetcher::SectionFetcher;
use crate::utils::errors::AppResult;

pub struct HomepageService {
    fetcher: Arc<SectionFetcher>,
}

impl HomepageService {
    pub fn new(fetcher: Arc<SectionFetcher>) -> Self {
        Self { fetcher }
    }

    /// Homepage de un grupo (`initial`, `group1`, `group2`)
    pub async fn get_homepage_by_group(&self, name: &str) -> AppResult<HomepageGroupResponse> {
        let group = RefreshGroup::parse(name)?;
        info!("🔄 Obteniendo homepage del grupo: {}", group);
        let started = Instant::now();

        let result = self.build_group(group).await;
        match &result {
            Ok(_) => info!(
                "✅ Grupo {} cargado en {}ms",
                group,
                started.elapsed().as_millis()
            ),
            Err(e) => error!("❌ Error obteniendo grupo {}: {}", group, e),
        }
        result
    }

    async fn build_group(&self, group: RefreshGroup) -> AppResult<HomepageGroupResponse> {
        let mut response = HomepageGroupResponse {
            message: "Success".to_string(),
            cached_at: Utc::now().timestamp_millis(),
            group: group.as_str().to_string(),
            has_more: group.has_more(),
            next_group: group.next_group().map(|next| next.as_str().to_string()),
            ..Default::default()
        };

        match group {
            RefreshGroup::Initial => {
                response.section1 = Some(self.fetcher.fetch_section1().await?);
                let raw = self.fetcher.fetch_homepage_raw().await?;
                response.seo_on_page = Some(seo_on_page(&raw));
                response.section2 = Some(self.fetcher.fetch_section2().await?);
                response.section3 = Some(self.fetcher.fetch_section3().await?);
                response.section4 = Some(self.fetcher.fetch_section4().await?);
            }
            RefreshGroup::Group1 => {
                response.section5 = Some(self.fetcher.fetch_section5().await?);
                response.section6 = Some(self.fetcher.fetch_section6().await?);
                response.section7 = Some(self.fetcher.fetch_section7().await?);
                response.section8 = Some(self.fetcher.fetch_section8().await?);
            }
            RefreshGroup::Group2 => {
                response.section9 = Some(self.fetcher.fetch_section9().await?);
                response.section10 = Some(self.fetcher.fetch_section10().await?);
                response.section11 = Some(self.fetcher.fetch_section11().await?);
                response.section12 = Some(self.fetcher.fetch_section12().await?);
            }
        }

        Ok(response)
    }

    /// Homepage completo: feed crudo y las 12 secciones
    pub async fn get_homepage_data(&self) -> AppResult<HomepageResponse> {
        info!("🔄 Obteniendo homepage COMPLETO (12 secciones)...");
        let started = Instant::now();

        let raw_data = self.fetcher.fetch_homepage_raw().await?;
        let response = HomepageResponse {
            message: "Success".to_string(),
            cached_at: Utc::now().timestamp_millis(),
            seo_on_page: seo_on_page(&raw_data),
            raw_data,
            section1: self.fetcher.fetch_section1().await?,
            section2: self.fetcher.fetch_section2().await?,
            section3: self.fetcher.fetch_section3().await?,
            section4: self.fetcher.fetch_section4().await?,
            section5: self.fetcher.fetch_section5().await?,
            section6: self.fetcher.fetch_section6().await?,
            section7: self.fetcher.fetch_section7().await?,
            section8: self.fetcher.fetch_section8().await?,
            section9: self.fetcher.fetch_section9().await?,
            section10: self.fetcher.fetch_section10().await?,
            section11: self.fetcher.fetch_section11().await?,
            section12: self.fetcher.fetch_section12().await?,
        };

        let elapsed = started.elapsed();
        info!(
            "✅ Homepage armado en {}ms ({}s)",
            elapsed.as_millis(),
            elapsed.as_secs()
        );
        Ok(response)
    }
}

/// SEO del feed, o un objeto vacío si Ophim no lo manda
fn seo_on_page(raw: &OphimHomepageResponse) -> Value {
    raw.data
        .seo_on_page
        .clone()
        .unwrap_or_else(|| Value::Object(Default::default()))
}
