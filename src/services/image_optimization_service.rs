//! Optimización de imágenes
//!
//! Resuelve las rutas relativas de Ophim contra su CDN y, si está habilitado,
//! aplica la transformación de tamaño/calidad del CDN de imágenes. Ante
//! cualquier fallo se usa la URL original.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::utils::errors::{AppError, AppResult};

/// Tipo de imagen: determina la transformación aplicada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Thumb,
    Poster,
}

impl ImageKind {
    pub fn transformation(&self) -> &'static str {
        match self {
            ImageKind::Thumb => "w_342,c_fill,q_auto:best,f_auto",
            ImageKind::Poster => "w_780,c_fill,q_auto:best,f_auto",
        }
    }
}

/// Optimizador de imágenes (colaborador externo)
#[async_trait]
pub trait ImageOptimizer: Send + Sync {
    /// URL absoluta de la imagen original
    fn resolve_url(&self, url: &str) -> String;

    /// URL optimizada para una imagen ya resuelta
    async fn optimize(&self, full_url: &str, identifier: &str, kind: ImageKind) -> AppResult<String>;
}

/// Optimizar con fallback a la URL original; `None` si no hay imagen
pub async fn optimize_or_original(
    optimizer: &dyn ImageOptimizer,
    url: Option<&str>,
    identifier: &str,
    kind: ImageKind,
) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    let full_url = optimizer.resolve_url(url);

    match optimizer.optimize(&full_url, identifier, kind).await {
        Ok(optimized) => Some(optimized),
        Err(e) => {
            warn!("⚠️ No se pudo optimizar {:?} de {}, usando original: {}", kind, identifier, e);
            Some(full_url)
        }
    }
}

/// Optimizador basado en URLs del CDN
pub struct CdnImageOptimizer {
    image_cdn: String,
    transform_enabled: bool,
}

impl CdnImageOptimizer {
    pub fn new(image_cdn: &str, transform_enabled: bool) -> Self {
        Self {
            image_cdn: image_cdn.trim_end_matches('/').to_string(),
            transform_enabled,
        }
    }
}

#[async_trait]
impl ImageOptimizer for CdnImageOptimizer {
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!("{}/{}", self.image_cdn, url.trim_start_matches('/'))
    }

    async fn optimize(&self, full_url: &str, identifier: &str, kind: ImageKind) -> AppResult<String> {
        if !self.transform_enabled {
            return Ok(full_url.to_string());
        }

        // Sólo las URLs del CDN de transformación tienen segmento /upload/
        match full_url.split_once("/upload/") {
            Some((head, tail)) => {
                let optimized = format!("{}/upload/{}/{}", head, kind.transformation(), tail);
                debug!("🖼️ Imagen optimizada para {}: {}", identifier, optimized);
                Ok(optimized)
            }
            None => Err(AppError::Internal(format!(
                "URL no transformable: {}",
                full_url
            ))),
        }
    }
}
