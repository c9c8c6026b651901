use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Order {0} not found")]
    OrderNotFound(Uuid),

    #[error("Review {0} not found")]
    ReviewNotFound(Uuid),

    #[error("Ticket {0} not found")]
    TicketNotFound(Uuid),

    #[error("Ban {0} not found")]
    BanNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Moderation rule {0} not found")]
    RuleNotFound(Uuid),

    #[error("Setting '{0}' not found")]
    SettingNotFound(String),

    #[error("Transition from {from} to {to} is not permitted")]
    InvalidTransition { from: String, to: String },

    #[error("A reason is required for this action")]
    ReasonRequired,

    #[error("User {0} is not a participant of order {1}")]
    NotParticipant(Uuid, Uuid),

    #[error("Review {0} has already been moderated")]
    AlreadyModerated(Uuid),

    #[error("Ban {0} is not active")]
    BanNotActive(Uuid),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("You cannot change your own role")]
    SelfRoleChange,

    #[error("Invalid setting payload: {0}")]
    InvalidSetting(String),

    #[error("Invalid rule criteria: {0}")]
    InvalidCriteria(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::OrderNotFound(_)
            | ServiceError::ReviewNotFound(_)
            | ServiceError::TicketNotFound(_)
            | ServiceError::BanNotFound(_)
            | ServiceError::UserNotFound(_)
            | ServiceError::RuleNotFound(_)
            | ServiceError::SettingNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidTransition { .. }
            | ServiceError::AlreadyModerated(_)
            | ServiceError::BanNotActive(_) => StatusCode::CONFLICT,

            ServiceError::ReasonRequired
            | ServiceError::InvalidSetting(_)
            | ServiceError::InvalidCriteria(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::NotParticipant(_, _)
            | ServiceError::Forbidden(_)
            | ServiceError::SelfRoleChange => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}
