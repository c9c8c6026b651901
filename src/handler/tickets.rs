use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::supportdb::SupportExt,
    error::HttpError,
    lifecycle::transitions::available_ticket_transitions,
    middleware::{role_check, staff_roles, JWTAuthMiddeware},
    models::supportmodel::*,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    pub priority: TicketPriority,
    pub urgency: TicketUrgency,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TicketTransitionDto {
    pub status: TicketStatus,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTicketDto {
    pub assigned_to: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TicketQueryParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub status: Option<TicketStatus>,
}

pub fn tickets_handler() -> Router {
    let staff_only = || {
        middleware::from_fn(|state, req, next| role_check(state, req, next, staff_roles()))
    };

    Router::new()
        .route("/", post(create_ticket))
        .route("/", get(get_tickets).layer(staff_only()))
        .route("/my", get(get_my_tickets))
        .route("/:ticket_id", get(get_ticket))
        .route("/:ticket_id/transition", put(transition_ticket).layer(staff_only()))
        .route("/:ticket_id/assign", put(assign_ticket).layer(staff_only()))
}

pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .db_client
        .create_support_ticket(
            auth.user.id,
            &body.subject,
            &body.description,
            body.priority,
            body.urgency,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket }
    })))
}

pub async fn get_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<TicketQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 50);
    let offset = ((page - 1) * limit) as i64;

    let tickets = app_state
        .db_client
        .get_support_tickets(limit as i64, offset, params.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "tickets": tickets,
            "page": page,
            "limit": limit
        }
    })))
}

pub async fn get_my_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state
        .db_client
        .get_user_support_tickets(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "tickets": tickets }
    })))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .get_support_ticket(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Ticket not found"))?;

    if ticket.user_id != auth.user.id && !auth.user.role.is_staff() {
        return Err(HttpError::forbidden("Not your ticket"));
    }

    // Staff clients render these as the status options.
    let available_transitions: Vec<&str> = available_ticket_transitions(ticket.status)
        .iter()
        .map(|s| s.to_str())
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "ticket": ticket,
            "available_transitions": available_transitions
        }
    })))
}

pub async fn transition_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<TicketTransitionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .ticket_service
        .transition(ticket_id, &auth.user, body.status, body.note)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket }
    })))
}

pub async fn assign_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AssignTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .ticket_service
        .assign(ticket_id, &auth.user, body.assigned_to)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket }
    })))
}
