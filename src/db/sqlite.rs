use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use super::{CredentialStore, DeviceStore, StoreError};
use crate::models::user::{User, UserId};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_user_id(id: i64) -> Result<UserId, StoreError> {
    UserId::try_from(id).map_err(|_| StoreError::InvalidId(id))
}

fn to_row_id(id: UserId) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::InvalidId(i64::MAX))
}

#[async_trait]
impl CredentialStore for SqliteStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, email, password_hash)| {
            Ok(User {
                id: to_user_id(id)?,
                email,
                password_hash,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, password_hash))]
    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?, ?)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::AlreadyExists)?;

        info!(user_id = id, "Stored new user");
        to_user_id(id)
    }
}

#[async_trait]
impl DeviceStore for SqliteStore {
    #[instrument(skip(self))]
    async fn list(&self, user_id: UserId) -> Result<Vec<String>, StoreError> {
        let devices = sqlx::query_scalar::<_, String>(
            "SELECT imei FROM devices WHERE user_id = ? ORDER BY id",
        )
        .bind(to_row_id(user_id)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    #[instrument(skip(self))]
    async fn insert(&self, user_id: UserId, imei: &str) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO devices (user_id, imei)
            VALUES (?, ?)
            ON CONFLICT (imei) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(to_row_id(user_id)?)
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::AlreadyExists)?;

        info!(user_id, "Stored new device");
        Ok(())
    }
}
