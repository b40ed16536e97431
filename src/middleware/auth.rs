use axum::{body::Body, extract::State, middleware::Next, response::Response};
use http::{header::AUTHORIZATION, HeaderMap, Request};

use crate::{
    error::{AuthError, TokenError},
    models::{jwt::TokenKind, user::UserId},
    AppState,
};

/// Identity the gate resolved for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap, kind: TokenKind) -> Result<&str, AuthError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::token(kind, TokenError::Invalid))?,
        None => return Err(AuthError::MissingToken(kind)),
    };

    if header.is_empty() || header == "Bearer" {
        return Err(AuthError::MissingToken(kind));
    }

    // should look like "Bearer token"
    let chunks: Vec<&str> = header.split(' ').collect();
    if chunks.len() != 2 || chunks[0] != "Bearer" {
        return Err(AuthError::token(kind, TokenError::Invalid));
    }
    if chunks[1].is_empty() {
        return Err(AuthError::MissingToken(kind));
    }

    Ok(chunks[1])
}

/// Trust boundary in front of every route that is not on the public allow-list.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    state.jwt_service.ensure_secret(TokenKind::Access)?;

    if state.config.is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers(), TokenKind::Access)?;
    let claims = state.jwt_service.verify(token, TokenKind::Access)?;

    request.extensions_mut().insert(CurrentUser(claims.user_id));

    Ok(next.run(request).await)
}
