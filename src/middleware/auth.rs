use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::decode_token;
use crate::policy::Caller;
use crate::state::AppState;

/// Decodes the bearer token, if any, and stores the resulting [`Caller`] on
/// the request. Missing or invalid tokens yield an anonymous caller; the
/// policy decides what anonymous callers may do.
pub async fn authenticate_jwt(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let caller = match extract_jwt_from_headers(request.headers()) {
        Some(token) => match decode_token(token, &state.config.security) {
            Ok(claims) => {
                tracing::debug!(username = %claims.username, is_admin = claims.is_admin, "Authenticated caller");
                Caller::from(claims)
            }
            Err(e) => {
                tracing::debug!("Ignoring bearer token: {}", e);
                Caller::Anonymous
            }
        },
        None => Caller::Anonymous,
    };

    request.extensions_mut().insert(caller);
    next.run(request).await
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Caller>().cloned().unwrap_or(Caller::Anonymous))
    }
}
