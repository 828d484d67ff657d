//! Admin authentication: password check and HS256 bearer tokens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use salon_core::AppError;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;
use crate::state::AppState;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Constant-time comparison so the admin password check doesn't leak length
/// prefixes through timing.
pub fn verify_admin_password(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

pub fn create_token(secret: &str, ttl_seconds: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: "admin".to_string(),
        exp: Utc::now().timestamp() + ttl_seconds,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

/// Extractor gating admin routes on a valid `Authorization: Bearer` token.
pub struct RequireAdmin;

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing bearer token".to_string(),
                ))
            })?;

        verify_token(&state.config.jwt_secret, token)?;
        Ok(RequireAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_check_accepts_exact_match_only() {
        assert!(verify_admin_password("hunter2", "hunter2"));
        assert!(!verify_admin_password("hunter", "hunter2"));
        assert!(!verify_admin_password("", "hunter2"));
    }

    #[test]
    fn token_round_trip() {
        let token = create_token("secret", 60).unwrap();
        let claims = verify_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = create_token("secret-a", 60).unwrap();
        assert!(verify_token("secret-b", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // jsonwebtoken applies default leeway of 60s; go well past it.
        let token = create_token("secret", -120).unwrap();
        assert!(verify_token("secret", &token).is_err());
    }
}
