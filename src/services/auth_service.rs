use std::sync::Arc;

use tokio::task;
use tracing::{info, instrument};

use crate::db::{CredentialStore, StoreError};
use crate::error::AuthError;
use crate::models::jwt::TokenPair;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_service: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt_service,
            bcrypt_cost,
        }
    }

    /// Create an account and log it straight in.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        // no account is created if tokens could not be issued for it
        self.jwt_service.ensure_secrets()?;

        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user_id = self
            .store
            .insert(email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => AuthError::AlreadyRegistered,
                other => AuthError::Store(other),
            })?;

        info!(user_id, "User registered");
        self.jwt_service.issue_pair(user_id)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotExist)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let password_matches =
            task::spawn_blocking(move || bcrypt::verify(password, &password_hash)).await??;

        if !password_matches {
            return Err(AuthError::WrongPassword);
        }

        info!(user_id = user.id, "User logged in");
        self.jwt_service.issue_pair(user.id)
    }
}
