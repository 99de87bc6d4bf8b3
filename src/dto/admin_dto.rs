use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Respuesta de las operaciones de administración
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AdminResponse {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
            duration_ms: None,
            warning: None,
            timestamp: Utc::now(),
        }
    }

    pub fn timed(message: String, duration_ms: u64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            ..Self::success(message)
        }
    }

    pub fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}
