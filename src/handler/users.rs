use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::HttpError,
    lifecycle::permissions::assignable_roles,
    middleware::{role_check, staff_roles, JWTAuthMiddeware},
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route(
            "/",
            get(get_users).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, staff_roles())
            })),
        )
        .route("/role", put(update_user_role))
        .route("/role/available", get(get_available_roles))
        .route("/notifications", get(get_my_notifications))
        .route("/notifications/:notification_id/read", put(mark_notification_read))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user.user),
        },
    }))
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);
    let offset = page_offset(page, limit);

    let users = app_state
        .db_client
        .get_users(limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        results: users.len(),
        users: FilterUserDto::filter_users(&users),
    }))
}

pub async fn update_user_role(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth_user): Extension<JWTAuthMiddeware>,
    Json(body): Json<RoleUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated_user = app_state
        .role_service
        .change_role(&auth_user.user, body.target_user_id, body.role)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated_user),
        },
    }))
}

pub async fn get_available_roles(
    Extension(auth_user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let roles: Vec<&'static str> = assignable_roles(auth_user.user.role)
        .into_iter()
        .map(|role| role.to_str())
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "roles": roles }
    })))
}

#[derive(Debug, serde::Deserialize)]
pub struct NotificationQueryDto {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub unread_only: Option<bool>,
}

pub async fn get_my_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth_user): Extension<JWTAuthMiddeware>,
    Query(params): Query<NotificationQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 50);
    let offset = page_offset(page, limit);

    let notifications = app_state
        .notification_service
        .get_user_notifications(
            auth_user.user.id,
            limit as i64,
            offset,
            params.unread_only.unwrap_or(false),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "notifications": notifications }
    })))
}

pub async fn mark_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth_user): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .notification_service
        .mark_read(auth_user.user.id, notification_id)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: "Notification marked as read".to_string(),
    }))
}

/// Saturating so that a page of 0 never underflows into a huge offset.
fn page_offset(page: usize, limit: usize) -> i64 {
    (page.saturating_sub(1) * limit) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_does_not_underflow() {
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }
}
