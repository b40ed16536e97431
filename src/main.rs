use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod services;
mod utils;
#[cfg(test)]
mod tests;

use config::Config;
use db::{CredentialStore, DeviceStore, SqliteStore};
use models::jwt::TokenKind;
use services::{auth_service::AuthService, jwt_service::JwtService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt_service: JwtService,
    pub auth_service: AuthService,
    pub devices: Arc<dyn DeviceStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(SqliteStore::new(pool));
        let jwt_service = JwtService::new(config.secrets.clone(), config.lifetimes);
        let credentials: Arc<dyn CredentialStore> = store.clone();
        let auth_service = AuthService::new(credentials, jwt_service.clone(), config.bcrypt_cost);

        Self {
            config,
            jwt_service,
            auth_service,
            devices: store,
        }
    }
}

pub fn create_router(pool: SqlitePool, config: Config) -> Router {
    let state = AppState::new(pool, config);

    // Create a CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/user/register", post(api::auth::register))
        .route("/api/user/login", post(api::auth::login))
        .route("/api/user/refreshToken", post(api::auth::refresh_token))
        .route("/api/user/me", get(api::user::get_current_user))
        .route(
            "/api/user/devices",
            get(api::user::list_devices).post(api::user::add_device),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("customer_auth=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    for kind in [TokenKind::Access, TokenKind::Refresh] {
        if config.secrets.for_kind(kind).is_err() {
            warn!(%kind, "Signing secret is not set; requests that need it will fail");
        }
    }

    let pool = db::create_db_pool(&config.database_url)
        .await
        .context("failed to open database")?;

    let addr = config.bind_addr;
    let app = create_router(pool, config);

    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
