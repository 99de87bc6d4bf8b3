//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::utils::errors::{AppError, AppResult};

/// Leer una variable de entorno o usar el valor por defecto
///
/// Una variable presente pero mal formada es un error de arranque.
pub fn env_or<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} inválida ('{}'): {}", name, raw, e))),
        _ => Ok(default),
    }
}

/// Configuración del entorno
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    // API Ophim
    pub ophim_base_url: String,
    pub ophim_image_cdn: String,
    pub image_transform_enabled: bool,
    pub upstream_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            ophim_base_url: "https://ophim1.com/v1/api".to_string(),
            ophim_image_cdn: "https://img.ophim.live/uploads/movies".to_string(),
            image_transform_enabled: false,
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let timeout_seconds: u64 = env_or("UPSTREAM_TIMEOUT_SECONDS", 10)?;
        let cors: String = env_or("CORS_ORIGINS", "*".to_string())?;

        Ok(Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            cors_origins: cors
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ophim_base_url: env_or("OPHIM_BASE_URL", defaults.ophim_base_url)?
                .trim_end_matches('/')
                .to_string(),
            ophim_image_cdn: env_or("OPHIM_IMAGE_CDN", defaults.ophim_image_cdn)?
                .trim_end_matches('/')
                .to_string(),
            image_transform_enabled: env_or("IMAGE_TRANSFORM_ENABLED", false)?,
            upstream_timeout: Duration::from_secs(timeout_seconds.max(1)),
        })
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
