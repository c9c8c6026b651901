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
    db::orderdb::OrderExt,
    dtos::orderdtos::*,
    error::HttpError,
    middleware::{admin_roles, role_check, JWTAuthMiddeware},
    models::ordermodel::OrderPriority,
    AppState,
};

pub fn orders_handler() -> Router {
    Router::new()
        .route("/", get(get_orders).post(create_order))
        .route("/:order_id", get(get_order))
        .route("/:order_id/transition", post(transition_order))
        .route(
            "/:order_id/extend",
            put(extend_expiration).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, admin_roles())
            })),
        )
        .route(
            "/:order_id/priority",
            put(set_priority_override).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, admin_roles())
            })),
        )
}

pub async fn create_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let order = app_state
        .db_client
        .create_order(
            auth.user.id,
            &body.title,
            &body.description,
            body.price,
            body.priority.unwrap_or(OrderPriority::Normal),
            body.executor_id,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "order": order }
    })))
}

pub async fn get_orders(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<OrderQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);
    let offset = ((page - 1) * limit) as i64;

    // Staff see everything; everyone else only their own orders.
    let participant = if auth.user.role.is_staff() {
        None
    } else {
        Some(auth.user.id)
    };

    let orders = app_state
        .db_client
        .get_orders(
            limit as i64,
            offset,
            params.status,
            params.search.as_deref(),
            participant,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "orders": orders,
            "page": page,
            "limit": limit
        }
    })))
}

pub async fn get_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let order = app_state
        .db_client
        .get_order(order_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Order not found"))?;

    let available_transitions = app_state
        .order_service
        .transitions_for(&order, auth.user.id)
        .to_vec();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": OrderDetailDto { order, available_transitions }
    })))
}

pub async fn transition_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<TransitionOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let order = app_state
        .order_service
        .transition(order_id, &auth.user, body.next_status, body.reason)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "order": order }
    })))
}

pub async fn extend_expiration(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let order = app_state
        .order_service
        .extend_expiration(order_id, &auth.user, app_state.env.order_extension_hours)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "order": order }
    })))
}

pub async fn set_priority_override(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<PriorityOverrideDto>,
) -> Result<impl IntoResponse, HttpError> {
    let order = app_state
        .order_service
        .set_priority_override(order_id, &auth.user, body.priority)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "order": order }
    })))
}
