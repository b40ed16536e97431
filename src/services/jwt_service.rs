// src/services/jwt_service.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::config::{SigningSecrets, TokenLifetimes};
use crate::error::AuthError;
use crate::models::jwt::{Claims, TokenKind, TokenPair};
use crate::models::user::UserId;
use crate::utils::jwt::{decode_token, encode_token};

#[derive(Clone)]
pub struct JwtService {
    secrets: Arc<SigningSecrets>,
    lifetimes: TokenLifetimes,
}

impl JwtService {
    pub fn new(secrets: Arc<SigningSecrets>, lifetimes: TokenLifetimes) -> Self {
        Self { secrets, lifetimes }
    }

    /* ---------- PUBLIC API ---------- */

    /// Fail unless the secret for `kind` is configured.
    pub fn ensure_secret(&self, kind: TokenKind) -> Result<(), AuthError> {
        self.secrets.for_kind(kind).map(|_| ())
    }

    /// Fail unless both secrets are configured.
    pub fn ensure_secrets(&self) -> Result<(), AuthError> {
        self.ensure_secret(TokenKind::Access)?;
        self.ensure_secret(TokenKind::Refresh)
    }

    /// Mint a fresh access/refresh pair for `user_id`.
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(user_id, Utc::now().timestamp())
    }

    /// Mint a pair as of the unix time `now`. Nothing is signed unless both secrets exist.
    #[instrument(skip(self))]
    pub fn issue_pair_at(&self, user_id: UserId, now: i64) -> Result<TokenPair, AuthError> {
        let access_secret = self.secrets.access()?;
        let refresh_secret = self.secrets.refresh()?;

        let access_claims = Claims::new(
            user_id,
            TokenKind::Access,
            now + self.lifetimes.access.num_seconds(),
        );
        let refresh_claims = Claims::new(
            user_id,
            TokenKind::Refresh,
            now + self.lifetimes.refresh.num_seconds(),
        );

        Ok(TokenPair {
            access_token: encode_token(&access_claims, access_secret)?,
            refresh_token: encode_token(&refresh_claims, refresh_secret)?,
        })
    }

    /// Validate a token of the given kind and return its claims.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        self.verify_at(token, kind, Utc::now().timestamp())
    }

    #[instrument(skip(self, token))]
    pub fn verify_at(&self, token: &str, kind: TokenKind, now: i64) -> Result<Claims, AuthError> {
        let secret = self.secrets.for_kind(kind)?;

        decode_token(token, secret, kind, now).map_err(|source| AuthError::token(kind, source))
    }
}
