//! Cliente HTTP para la API Ophim
//!
//! Este módulo contiene el cliente del catálogo remoto: feed del home,
//! listas por categoría y detalle de película.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::models::{OphimHomepageResponse, OphimListResponse, OphimMovieDetailResponse};
use crate::utils::errors::{AppError, AppResult};

/// Parámetros de `/danh-sach/{slug}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub country: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub page: u32,
    pub limit: u32,
    pub sort_field: String,
    pub sort_type: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            country: None,
            category: None,
            year: None,
            page: 1,
            limit: 14,
            sort_field: "year".to_string(),
            sort_type: "desc".to_string(),
        }
    }
}

impl ListQuery {
    pub fn country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Pares query-string; sólo se envían los filtros presentes
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort_field", self.sort_field.clone()),
            ("sort_type", self.sort_type.clone()),
        ];
        if let Some(country) = &self.country {
            params.push(("country", country.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        params
    }
}

/// Operaciones del catálogo remoto
///
/// Cualquier fallo de transporte, estado HTTP o decodificación se reporta
/// como `AppError::UpstreamUnavailable`.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_home_feed(&self) -> AppResult<OphimHomepageResponse>;

    async fn get_category_list(&self, slug: &str, query: &ListQuery) -> AppResult<OphimListResponse>;

    async fn get_detail(&self, slug: &str) -> AppResult<OphimMovieDetailResponse>;
}

/// Cliente HTTP para Ophim
#[derive(Clone)]
pub struct OphimClient {
    client: Client,
    base_url: String,
}

impl OphimClient {
    /// Crear nuevo cliente con timeout por llamada
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("MovieHomepage/1.0")
            .build()
            .map_err(|e| AppError::Config(format!("no se pudo crear el cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "{} respondió {}",
                url, status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("respuesta inválida de {}: {}", url, e)))
    }
}

#[async_trait]
impl CatalogApi for OphimClient {
    async fn get_home_feed(&self) -> AppResult<OphimHomepageResponse> {
        let url = format!("{}/home", self.base_url);
        info!("🔄 Llamando API Ophim: {}", url);

        match self.get_json::<OphimHomepageResponse>(&url, &[]).await {
            Ok(response) => {
                info!("✅ Recibidos {} items de Ophim", response.data.items.len());
                Ok(response)
            }
            Err(e) => {
                error!("❌ Error llamando API Ophim: {}", e);
                Err(e)
            }
        }
    }

    async fn get_category_list(&self, slug: &str, query: &ListQuery) -> AppResult<OphimListResponse> {
        let url = format!("{}/danh-sach/{}", self.base_url, slug);
        let params = query.to_params();
        debug!("🔄 Llamando API Ophim: {} {:?}", url, params);

        match self.get_json::<OphimListResponse>(&url, &params).await {
            Ok(response) => {
                debug!("✅ Recibidos {} items de {}", response.data.items.len(), slug);
                Ok(response)
            }
            Err(e) => {
                error!("❌ Error obteniendo lista {}: {}", slug, e);
                Err(e)
            }
        }
    }

    async fn get_detail(&self, slug: &str) -> AppResult<OphimMovieDetailResponse> {
        let url = format!("{}/phim/{}", self.base_url, slug);
        debug!("🔄 Llamando API Ophim para película: {}", slug);

        match self.get_json::<OphimMovieDetailResponse>(&url, &[]).await {
            Ok(response) => {
                debug!("✅ Detalle recibido para: {}", slug);
                Ok(response)
            }
            Err(e) => {
                error!("❌ Error obteniendo detalle de {}: {}", slug, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_params() {
        let query = ListQuery::default().country("han-quoc").category("tinh-cam");
        let params = query.to_params();

        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("limit", "14".to_string())));
        assert!(params.contains(&("sort_field", "year".to_string())));
        assert!(params.contains(&("sort_type", "desc".to_string())));
        assert!(params.contains(&("country", "han-quoc".to_string())));
        assert!(params.contains(&("category", "tinh-cam".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "year"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_unavailable() {
        let client = OphimClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = client.get_home_feed().await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }
}
