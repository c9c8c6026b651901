pub mod analytics_service;
pub mod audit_service;
pub mod ban_service;
pub mod error;
pub mod moderation_service;
pub mod notification_service;
pub mod order_service;
pub mod review_service;
pub mod role_service;
pub mod settings_service;
pub mod ticket_service;
