use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            username: username.into(),
            is_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Signs a token for `username`.
pub fn create_token(username: &str, is_admin: bool, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.secret_key.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let claims = Claims::new(username, is_admin, security);
    let encoding_key = EncodingKey::from_secret(security.secret_key.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry, returning the claims.
pub fn decode_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.secret_key.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.secret_key.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Salted bcrypt hash, computed off the async runtime.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hashed: String) -> Result<bool, AuthError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trips_identity() {
        let security = AppConfig::test().security;
        let token = create_token("u1", false, &security).unwrap();
        let claims = decode_token(&token, &security).unwrap();

        assert_eq!(claims.username, "u1");
        assert!(!claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let security = AppConfig::test().security;
        let mut other = security.clone();
        other.secret_key = "not-the-same".to_string();

        let token = create_token("admin", true, &other).unwrap();
        assert!(matches!(decode_token(&token, &security), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn claims_serialize_admin_flag_in_camel_case() {
        let security = AppConfig::test().security;
        let value = serde_json::to_value(Claims::new("admin", true, &security)).unwrap();
        assert_eq!(value["isAdmin"], true);
        assert!(value.get("is_admin").is_none());
    }

    #[test]
    fn empty_secret_is_refused() {
        let mut security = AppConfig::test().security;
        security.secret_key.clear();
        assert!(matches!(create_token("u1", false, &security), Err(AuthError::InvalidSecret)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("password1".to_string(), 4).await.unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(verify_password("password1".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hashed).await.unwrap());
    }
}
