use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if app_state
        .db_client
        .get_user(None, None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .is_some()
    {
        return Err(HttpError::conflict(ErrorMessage::EmailExist.to_string()));
    }

    if app_state
        .db_client
        .get_user(None, Some(&body.username), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .is_some()
    {
        return Err(HttpError::conflict(ErrorMessage::UsernameExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(&body.name, &body.username, &body.email, &hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponseDto {
            status: "success".to_string(),
            data: UserData {
                user: FilterUserDto::filter_user(&user),
            },
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    let token = token::create_token(
        &user.id,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie"))?,
    );

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    Ok((headers, response))
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie"))?,
    );

    Ok((
        headers,
        Json(Response {
            status: "success",
            message: "Logged out".to_string(),
        }),
    ))
}
