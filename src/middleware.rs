use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::userdb::UserExt,
    error::{ErrorMessage, HttpError},
    models::usermodel::{User, UserRole},
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddeware {
    pub user: User,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let cookies = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    if auth_value.starts_with("Bearer ") {
                        Some(auth_value[7..].to_owned())
                    } else {
                        None
                    }
                })
        });

    let token = cookies
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let user_id_str = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let user_id = uuid::Uuid::parse_str(&user_id_str)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    let user =
        user.ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    req.extensions_mut().insert(JWTAuthMiddeware { user });

    Ok(next.run(req).await)
}

pub async fn role_check(
    Extension(_app_state): Extension<Arc<AppState>>,
    req: Request,
    next: Next,
    required_roles: Vec<UserRole>,
) -> Result<impl IntoResponse, HttpError> {
    let user = req
        .extensions()
        .get::<JWTAuthMiddeware>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    if !required_roles.contains(&user.user.role) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    Ok(next.run(req).await)
}

/// Staff shorthand: support and every role above it.
pub fn staff_roles() -> Vec<UserRole> {
    vec![
        UserRole::Support,
        UserRole::Moderator,
        UserRole::Admin,
        UserRole::SystemAdmin,
    ]
}

pub fn moderator_roles() -> Vec<UserRole> {
    vec![UserRole::Moderator, UserRole::Admin, UserRole::SystemAdmin]
}

pub fn admin_roles() -> Vec<UserRole> {
    vec![UserRole::Admin, UserRole::SystemAdmin]
}

#[cfg(test)]
mod tests {
    use super::*;

    // Support can read ban state but must not be able to issue or lift bans.
    #[test]
    fn support_is_staff_but_not_moderator() {
        assert!(staff_roles().contains(&UserRole::Support));
        assert!(!moderator_roles().contains(&UserRole::Support));
        assert!(moderator_roles().contains(&UserRole::Moderator));
    }

    #[test]
    fn every_list_is_a_subset_of_the_wider_one() {
        for role in moderator_roles() {
            assert!(staff_roles().contains(&role));
        }
        for role in admin_roles() {
            assert!(moderator_roles().contains(&role));
        }
    }
}
