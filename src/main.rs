mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod lifecycle;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    analytics_service::AnalyticsService,
    audit_service::AuditService,
    ban_service::BanService,
    moderation_service::ModerationService,
    notification_service::NotificationService,
    order_service::OrderService,
    review_service::ReviewService,
    role_service::RoleService,
    settings_service::SettingsService,
    ticket_service::TicketService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub order_service: Arc<OrderService>,
    pub review_service: Arc<ReviewService>,
    pub ticket_service: Arc<TicketService>,
    pub ban_service: Arc<BanService>,
    pub role_service: Arc<RoleService>,
    pub moderation_service: Arc<ModerationService>,
    pub notification_service: Arc<NotificationService>,
    pub audit_service: Arc<AuditService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub settings_service: Arc<SettingsService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(db_client.clone()));
        let audit_service = Arc::new(AuditService::new(db_client.clone()));

        let order_service = Arc::new(OrderService::new(
            db_client.clone(),
            notification_service.clone(),
            audit_service.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(
            db_client.clone(),
            notification_service.clone(),
            audit_service.clone(),
        ));
        let ticket_service = Arc::new(TicketService::new(
            db_client.clone(),
            notification_service.clone(),
            audit_service.clone(),
        ));
        let ban_service = Arc::new(BanService::new(
            db_client.clone(),
            notification_service.clone(),
            audit_service.clone(),
        ));
        let role_service = Arc::new(RoleService::new(
            db_client.clone(),
            notification_service.clone(),
            audit_service.clone(),
        ));
        let moderation_service =
            Arc::new(ModerationService::new(db_client.clone(), audit_service.clone()));
        let analytics_service = Arc::new(AnalyticsService::new(db_client.clone()));
        let settings_service =
            Arc::new(SettingsService::new(db_client.clone(), audit_service.clone()));

        Self {
            env: config,
            db_client,
            order_service,
            review_service,
            ticket_service,
            ban_service,
            role_service,
            moderation_service,
            notification_service,
            audit_service,
            analytics_service,
            settings_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        format!("http://localhost:{}", config.port)
            .parse::<HeaderValue>()
            .unwrap(),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
