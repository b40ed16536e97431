use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::AuthError,
    middleware::auth::bearer_token,
    models::jwt::{TokenKind, TokenPair},
    AppState,
};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    email: String,
    password: String,
}

impl CredentialsRequest {
    fn from_payload(payload: Result<Json<Self>, JsonRejection>) -> Result<Self, AuthError> {
        let Json(request) = payload.map_err(|_| AuthError::InvalidRequest)?;
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::InvalidRequest);
        }
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    message: String,
    access_token: String,
    refresh_token: String,
}

impl TokenResponse {
    fn new(message: &str, tokens: TokenPair) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let request = CredentialsRequest::from_payload(payload)?;
    let tokens = state
        .auth_service
        .register(&request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        TokenResponse::new("user successfully created", tokens),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let request = CredentialsRequest::from_payload(payload)?;
    let tokens = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(TokenResponse::new("user successfully logged in", tokens))
}

/// Trade a refresh token for a brand-new pair. The old refresh token stays valid until it expires.
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    state.jwt_service.ensure_secret(TokenKind::Refresh)?;

    let token = bearer_token(&headers, TokenKind::Refresh)?;
    let claims = state.jwt_service.verify(token, TokenKind::Refresh)?;
    let tokens = state.jwt_service.issue_pair(claims.user_id)?;

    Ok((
        StatusCode::CREATED,
        TokenResponse::new("tokens successfully refreshed", tokens),
    ))
}
