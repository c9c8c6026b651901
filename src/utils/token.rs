use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &uuid::Uuid,
    secret: &[u8],
    expires_in_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_nil() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(expires_in_seconds)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let user_id = uuid::Uuid::new_v4();
        let secret = b"test-secret";
        let token = create_token(&user_id, secret, 60).unwrap();
        let sub = decode_token(token, secret).unwrap();
        assert_eq!(sub, user_id.to_string());
    }

    #[test]
    fn wrong_secret_rejected() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(&user_id, b"secret-a", 60).unwrap();
        assert!(decode_token(token, b"secret-b").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(&user_id, b"secret", -120).unwrap();
        assert!(decode_token(token, b"secret").is_err());
    }
}
