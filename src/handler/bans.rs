use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::bandb::BanExt,
    error::HttpError,
    middleware::{moderator_roles, role_check, staff_roles, JWTAuthMiddeware},
    models::banmodel::BanType,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBanDto {
    pub user_id: Uuid,
    pub ban_type: BanType,
    #[validate(length(min = 1, message = "A ban reason is required"))]
    pub reason: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UnbanDto {
    #[validate(length(min = 1, message = "An unban reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct BanQueryParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub user_id: Option<Uuid>,
}

// Reading ban state is a staff concern; issuing or lifting a ban needs
// moderator level or above.
pub fn bans_handler() -> Router {
    let staff_only = || {
        middleware::from_fn(|state, req, next| role_check(state, req, next, staff_roles()))
    };
    let moderator_only = || {
        middleware::from_fn(|state, req, next| role_check(state, req, next, moderator_roles()))
    };

    Router::new()
        .route("/", get(get_bans).layer(staff_only()))
        .route("/", post(create_ban).layer(moderator_only()))
        .route("/:ban_id/unban", put(unban).layer(moderator_only()))
        .route("/user/:user_id/effective", get(get_effective_bans).layer(staff_only()))
}

pub async fn create_ban(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateBanDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ban = app_state
        .ban_service
        .ban(body.user_id, &auth.user, body.ban_type, &body.reason, body.expires_at)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ban": ban }
    })))
}

pub async fn get_bans(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<BanQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 50);
    let offset = ((page - 1) * limit) as i64;

    let bans = app_state
        .db_client
        .get_bans(limit as i64, offset, params.user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "bans": bans,
            "page": page,
            "limit": limit
        }
    })))
}

pub async fn unban(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ban_id): Path<Uuid>,
    Json(body): Json<UnbanDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ban = app_state
        .ban_service
        .unban(ban_id, &auth.user, &body.reason)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ban": ban }
    })))
}

pub async fn get_effective_bans(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bans = app_state.ban_service.effective_bans(user_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "bans": bans }
    })))
}
