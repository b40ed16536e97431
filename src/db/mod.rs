use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::models::user::{User, UserId};

pub mod sqlite;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("user id {0} is out of range")]
    InvalidId(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account persistence the authenticator relies on. Email uniqueness is the store's job.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Returns the id assigned to the new account, or `AlreadyExists` for a taken email.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, StoreError>;
}

#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn list(&self, user_id: UserId) -> Result<Vec<String>, StoreError>;

    async fn insert(&self, user_id: UserId, imei: &str) -> Result<(), StoreError>;
}

pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    sqlx::migrate!().run(&pool).await?;
    info!(url = %db_url, "Database ready");

    Ok(pool)
}
