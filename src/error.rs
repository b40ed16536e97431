use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::db::StoreError;
use crate::models::jwt::TokenKind;

/// Why a token string was refused by the codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed")]
    Malformed,
    #[error("invalid")]
    Invalid,
    #[error("expired")]
    Expired,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing access token secret")]
    MissingAccessSecret,

    #[error("missing refresh token secret")]
    MissingRefreshSecret,

    #[error("missing {0} token")]
    MissingToken(TokenKind),

    #[error("{source} {kind} token")]
    Token { kind: TokenKind, source: TokenError },

    #[error("user already registered")]
    AlreadyRegistered,

    #[error("user does not exist")]
    NotExist,

    #[error("wrong password")]
    WrongPassword,

    #[error("device already registered")]
    DeviceAlreadyRegistered,

    #[error("invalid request")]
    InvalidRequest,

    #[error("failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    HashTask(#[from] tokio::task::JoinError),

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn token(kind: TokenKind, source: TokenError) -> Self {
        AuthError::Token { kind, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Token { source, .. } => match source {
                TokenError::Expired => StatusCode::UNAUTHORIZED,
                TokenError::Malformed | TokenError::Invalid => StatusCode::FORBIDDEN,
            },
            AuthError::NotExist | AuthError::WrongPassword => StatusCode::UNAUTHORIZED,
            AuthError::AlreadyRegistered | AuthError::DeviceAlreadyRegistered => {
                StatusCode::FORBIDDEN
            }
            AuthError::InvalidRequest => StatusCode::BAD_REQUEST,
            AuthError::MissingAccessSecret
            | AuthError::MissingRefreshSecret
            | AuthError::PasswordHash(_)
            | AuthError::HashTask(_)
            | AuthError::Signing(_)
            | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    fn public_message(&self) -> String {
        match self {
            AuthError::PasswordHash(_)
            | AuthError::HashTask(_)
            | AuthError::Signing(_)
            | AuthError::Store(_) => "something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "errorMessage")]
    pub error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            info!(error = %self, status = %status, "request rejected");
        }

        let body = ErrorMessage {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}
