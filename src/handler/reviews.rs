use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::reviewdb::ReviewExt,
    dtos::reviewdtos::*,
    error::HttpError,
    middleware::{moderator_roles, role_check, JWTAuthMiddeware},
    models::{moderationmodel::ContentType, reviewmodel::ModerationStatus},
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new()
        .route("/", post(create_review))
        .route(
            "/",
            get(get_reviews).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, moderator_roles())
            })),
        )
        .route(
            "/:review_id/approve",
            put(approve_review).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, moderator_roles())
            })),
        )
        .route(
            "/:review_id/reject",
            put(reject_review).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, moderator_roles())
            })),
        )
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Auto-moderation decides whether the review needs a human.
    let verdict = app_state
        .moderation_service
        .evaluate(ContentType::Reviews, &body.comment)
        .await?;

    let initial_status = match verdict.as_ref().map(|v| v.action) {
        Some(crate::models::moderationmodel::RuleAction::Reject) => {
            return Err(HttpError::unprocessable_entity(
                "Review content violates the rules",
            ));
        }
        Some(crate::models::moderationmodel::RuleAction::AutoApprove) => ModerationStatus::Approved,
        _ => ModerationStatus::Pending,
    };

    let review = app_state
        .db_client
        .create_review(
            body.order_id,
            auth.user.id,
            body.target_id,
            body.rating,
            &body.comment,
            initial_status,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "review": review }
    })))
}

pub async fn get_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<ReviewQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);
    let offset = ((page - 1) * limit) as i64;

    let reviews = app_state
        .db_client
        .get_reviews(limit as i64, offset, params.moderation_status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "reviews": reviews,
            "page": page,
            "limit": limit
        }
    })))
}

pub async fn approve_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(review_id): Path<Uuid>,
    Json(body): Json<ApproveReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .approve(review_id, &auth.user, body.bonus_points.unwrap_or(0))
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "review": review }
    })))
}

pub async fn reject_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(review_id): Path<Uuid>,
    Json(body): Json<RejectReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .reject(review_id, &auth.user, &body.reason)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "review": review }
    })))
}
