use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::header,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::settingsmodel::SettingValue,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingDto {
    pub value: SettingValue,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub user_id: Option<Uuid>,
}

// Analytics and settings are wrapped in an admin role check in routes.rs;
// the log endpoints get a stricter system_admin check there.
pub fn admin_handler() -> Router {
    Router::new()
        .route("/analytics/summary", get(analytics_summary))
        .route("/analytics/export", get(analytics_export_csv))
        .route("/settings", get(get_settings))
        .route("/settings/:key", get(get_setting).put(update_setting))
}

pub fn logs_handler() -> Router {
    Router::new()
        .route("/audit-logs", get(get_audit_logs))
        .route("/security-logs", get(get_security_logs))
}

pub async fn analytics_summary(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let revenue = app_state.analytics_service.revenue_summary().await?;
    let orders = app_state.analytics_service.order_status_counts().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "revenue": revenue,
            "orders_by_status": orders
        }
    })))
}

pub async fn analytics_export_csv(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let csv = app_state.analytics_service.export_revenue_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"revenue.csv\"",
            ),
        ],
        csv,
    ))
}

pub async fn get_settings(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let settings = app_state.settings_service.list().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "settings": settings }
    })))
}

pub async fn get_setting(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let setting = app_state.settings_service.get(&key).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "setting": setting }
    })))
}

pub async fn update_setting(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(key): Path<String>,
    Json(body): Json<UpdateSettingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let setting = app_state
        .settings_service
        .set(&auth.user, &key, body.value, body.description.as_deref())
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "setting": setting }
    })))
}

pub async fn get_audit_logs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<LogQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = ((page - 1) * limit) as i64;

    let logs = app_state
        .audit_service
        .get_audit_logs(limit as i64, offset, params.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "logs": logs }
    })))
}

pub async fn get_security_logs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<LogQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = ((page - 1) * limit) as i64;

    let logs = app_state
        .audit_service
        .get_security_logs(limit as i64, offset)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "logs": logs }
    })))
}
