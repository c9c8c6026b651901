use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::{admin_handler, logs_handler},
        auth::auth_handler,
        bans::bans_handler,
        moderation::moderation_handler,
        orders::orders_handler,
        reviews::reviews_handler,
        tickets::tickets_handler,
        users::users_handler,
    },
    middleware::{admin_roles, auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/orders", orders_handler().layer(middleware::from_fn(auth)))
        .nest("/reviews", reviews_handler().layer(middleware::from_fn(auth)))
        .nest("/tickets", tickets_handler().layer(middleware::from_fn(auth)))
        .nest("/bans", bans_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/moderation",
            moderation_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, admin_roles())
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest(
            "/admin",
            admin_handler()
                .merge(logs_handler().layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::SystemAdmin])
                })))
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, admin_roles())
                }))
                .layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
