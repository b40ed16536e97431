use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::error::AuthError;
use crate::models::jwt::TokenKind;

pub const PUBLIC_ROUTES: [&str; 3] = [
    "/api/user/register",
    "/api/user/login",
    "/api/user/refreshToken",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// HMAC secrets for both token kinds. Empty secrets are kept as-is and rejected when used.
#[derive(Debug)]
pub struct SigningSecrets {
    access: SecretString,
    refresh: SecretString,
}

impl SigningSecrets {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        let (access, refresh): (String, String) = (access.into(), refresh.into());
        Self {
            access: SecretString::from(access),
            refresh: SecretString::from(refresh),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            env::var("ACCESSSECRET").unwrap_or_default(),
            env::var("REFRESHSECRET").unwrap_or_default(),
        )
    }

    pub fn access(&self) -> Result<&[u8], AuthError> {
        non_empty(&self.access).ok_or(AuthError::MissingAccessSecret)
    }

    pub fn refresh(&self) -> Result<&[u8], AuthError> {
        non_empty(&self.refresh).ok_or(AuthError::MissingRefreshSecret)
    }

    pub fn for_kind(&self, kind: TokenKind) -> Result<&[u8], AuthError> {
        match kind {
            TokenKind::Access => self.access(),
            TokenKind::Refresh => self.refresh(),
        }
    }
}

fn non_empty(secret: &SecretString) -> Option<&[u8]> {
    let value = secret.expose_secret();
    (!value.is_empty()).then(|| value.as_bytes())
}

#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn new(access: Duration, refresh: Duration) -> Result<Self, ConfigError> {
        if access <= Duration::zero() {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_TTL_MINUTES",
                reason: "must be positive".to_string(),
            });
        }
        if refresh < access {
            return Err(ConfigError::Invalid {
                name: "REFRESH_TOKEN_TTL_MINUTES",
                reason: "must not be shorter than the access token lifetime".to_string(),
            });
        }
        Ok(Self { access, refresh })
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::minutes(30),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub secrets: Arc<SigningSecrets>, // read-only after startup
    pub lifetimes: TokenLifetimes,
    pub bcrypt_cost: u32,
    pub public_routes: Vec<String>,
}

impl Config {
    pub fn new(secrets: SigningSecrets) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: "sqlite:users.db".to_string(),
            secrets: Arc::new(secrets),
            lifetimes: TokenLifetimes::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            public_routes: PUBLIC_ROUTES.iter().map(|route| route.to_string()).collect(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let mut config = Self::new(SigningSecrets::from_env());

        config.bind_addr = parse_env("BIND_ADDR", config.bind_addr)?;
        config.database_url = env::var("DATABASE_URL").unwrap_or(config.database_url);
        let access = parse_env("ACCESS_TOKEN_TTL_MINUTES", 15i64)?;
        let refresh = parse_env("REFRESH_TOKEN_TTL_MINUTES", 30i64)?;
        config.lifetimes = TokenLifetimes::new(
            minutes("ACCESS_TOKEN_TTL_MINUTES", access)?,
            minutes("REFRESH_TOKEN_TTL_MINUTES", refresh)?,
        )?;

        let cost = parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: format!("{cost} is outside 4..=31"),
            });
        }
        config.bcrypt_cost = cost;

        Ok(config)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.iter().any(|route| route == path)
    }
}

pub(crate) fn minutes(name: &'static str, value: i64) -> Result<Duration, ConfigError> {
    Duration::try_minutes(value).ok_or_else(|| ConfigError::Invalid {
        name,
        reason: format!("{value} minutes is out of range"),
    })
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
