use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::HomepageController;
use crate::dto::admin_dto::{AdminResponse, HealthResponse, ScheduleRequest};
use crate::models::{HomepageGroupResponse, HomepageResponse};
use crate::services::CacheStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_homepage_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/homepage", get(get_initial_group))
        .route("/homepage/:group", get(get_group))
        .route("/fullHomepage", get(get_full_homepage))
}

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/refresh/new", post(refresh_all))
        .route("/refresh/group/:group", post(refresh_group))
        .route("/refresh/section/:section", post(refresh_section))
        .route("/schedule", put(set_schedule))
        .route("/cache/section/:section", delete(clear_section))
        .route("/cache/group/:group", delete(clear_group))
        .route("/cache/clearAll", delete(clear_all))
        .route("/cache/status", get(cache_status))
        .route("/info", get(info))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        message: "Service is running",
    })
}

async fn get_initial_group(
    State(state): State<AppState>,
) -> Result<Json<HomepageGroupResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.homepage_by_group("initial").await?;
    Ok(Json(response))
}

async fn get_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<HomepageGroupResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.homepage_by_group(&group).await?;
    Ok(Json(response))
}

async fn get_full_homepage(State(state): State<AppState>) -> Result<Json<HomepageResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.full_homepage().await?;
    Ok(Json(response))
}

async fn refresh_all(State(state): State<AppState>) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.refresh_all().await?;
    Ok(Json(response))
}

async fn refresh_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.refresh_group(&group).await?;
    Ok(Json(response))
}

async fn refresh_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.refresh_section(&section).await?;
    Ok(Json(response))
}

async fn set_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Json<AdminResponse> {
    let controller = HomepageController::new(&state);
    Json(controller.set_schedule(request.enabled))
}

async fn clear_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.clear_section(&section).await?;
    Ok(Json(response))
}

async fn clear_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.clear_group(&group).await?;
    Ok(Json(response))
}

async fn clear_all(State(state): State<AppState>) -> Result<Json<AdminResponse>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.clear_all().await?;
    Ok(Json(response))
}

async fn cache_status(State(state): State<AppState>) -> Result<Json<CacheStatus>, AppError> {
    let controller = HomepageController::new(&state);
    let response = controller.cache_status().await?;
    Ok(Json(response))
}

async fn info(State(state): State<AppState>) -> Json<Value> {
    let controller = HomepageController::new(&state);
    Json(controller.info())
}
