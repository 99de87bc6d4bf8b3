//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Cache verification failed: {key} does not exist")]
    VerificationFailed { key: String },

    #[error("Invalid group: {0}. Must be: initial, group1, or group2")]
    InvalidGroup(String),

    #[error("Unknown section: {0}")]
    InvalidSection(String),

    #[error("Cache store unavailable: {0}")]
    CacheStoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errores causados por la entrada del cliente, no por el sistema
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::InvalidGroup(_) | AppError::InvalidSection(_))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidGroup(_) | AppError::InvalidSection(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::CacheStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::VerificationFailed { .. }
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::VerificationFailed { .. } => "VERIFICATION_FAILED",
            AppError::InvalidGroup(_) => "INVALID_GROUP",
            AppError::InvalidSection(_) => "INVALID_SECTION",
            AppError::CacheStoreUnavailable(_) => "CACHE_STORE_UNAVAILABLE",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::CacheStoreUnavailable(e.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_validation() {
            warn!("⚠️ Request rechazado: {}", self);
        } else {
            error!("❌ Error procesando request: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(json!(body))).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de verificación de cache
pub fn verification_error(key: &str) -> AppError {
    AppError::VerificationFailed { key: key.to_string() }
}
