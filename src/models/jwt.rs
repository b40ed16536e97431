// src/models/jwt.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

/// Which secret a token is signed with and which endpoint accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Payload embedded in every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    #[serde(rename = "exp")]
    pub expires_at: i64, // unix seconds
    #[serde(rename = "token_type")]
    pub kind: TokenKind,
}

impl Claims {
    pub fn new(user_id: UserId, kind: TokenKind, expires_at: i64) -> Self {
        Self {
            user_id,
            expires_at,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
