use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::moderationmodel::{ContentType, RuleAction, RuleCriteria},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRuleDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub content_types: Vec<ContentType>,
    pub criteria: RuleCriteria,
    pub action: RuleAction,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRuleDto {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckContentDto {
    pub content_type: ContentType,
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
}

// Wrapped in an admin role check in routes.rs.
pub fn moderation_handler() -> Router {
    Router::new()
        .route("/rules", get(get_rules).post(create_rule))
        .route("/rules/:rule_id/toggle", put(toggle_rule))
        .route("/rules/:rule_id", delete(delete_rule))
        .route("/check", post(check_content))
}

pub async fn create_rule(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateRuleDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let rule = app_state
        .moderation_service
        .create_rule(&auth.user, &body.name, &body.content_types, body.criteria, body.action)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "rule": rule }
    })))
}

pub async fn get_rules(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let rules = app_state.moderation_service.list_rules().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "rules": rules }
    })))
}

pub async fn toggle_rule(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(rule_id): Path<Uuid>,
    Json(body): Json<ToggleRuleDto>,
) -> Result<impl IntoResponse, HttpError> {
    let rule = app_state
        .moderation_service
        .set_rule_active(&auth.user, rule_id, body.is_active)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "rule": rule }
    })))
}

pub async fn delete_rule(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(rule_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .moderation_service
        .delete_rule(&auth.user, rule_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Rule deleted"
    })))
}

pub async fn check_content(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CheckContentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let verdict = app_state
        .moderation_service
        .evaluate(body.content_type, &body.text)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "match": verdict }
    })))
}
