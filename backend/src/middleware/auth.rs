//! Authentication middleware
//!
//! Verifies the identity provider's bearer token and attaches the farmer's
//! identity to the request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::SessionContext;
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    pub fn session(&self) -> SessionContext {
        SessionContext {
            user_id: self.user_id,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Decode and validate a JWT, returning the user it identifies
pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthUser { user_id })
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    match verify_token(bearer.token(), &state.config.auth.jwt_secret) {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, exp: i64) -> String {
        encode(
            &Header::default(),
            &Claims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn valid_token_yields_user() {
        let user_id = Uuid::new_v4();
        let user = verify_token(&token(&user_id.to_string(), in_one_hour()), SECRET).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.session().user_id, user_id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = chrono::Utc::now().timestamp() - 3600;
        let result = verify_token(&token(&Uuid::new_v4().to_string(), expired), SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let result = verify_token(&token(&Uuid::new_v4().to_string(), in_one_hour()), "other");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn subject_must_be_uuid() {
        let result = verify_token(&token("farmer-42", in_one_hour()), SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized(msg)) if msg.contains("user ID")));
    }
}
