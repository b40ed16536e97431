use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::StoreError, error::AuthError, middleware::auth::CurrentUser, models::user::UserId,
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    user_id: UserId,
}

#[derive(Serialize)]
pub struct DevicesResponse {
    devices: Vec<String>,
}

#[derive(Deserialize)]
pub struct DeviceRequest {
    imei: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    message: String,
}

pub async fn get_current_user(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse { user_id })
}

pub async fn list_devices(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<DevicesResponse>, AuthError> {
    let devices = state.devices.list(user_id).await?;

    Ok(Json(DevicesResponse { devices }))
}

pub async fn add_device(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    payload: Result<Json<DeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let Json(request) = payload.map_err(|_| AuthError::InvalidRequest)?;
    let imei = request.imei.trim();
    if imei.is_empty() {
        return Err(AuthError::InvalidRequest);
    }

    state
        .devices
        .insert(user_id, imei)
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => AuthError::DeviceAlreadyRegistered,
            other => AuthError::Store(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "device successfully added".to_string(),
        }),
    ))
}
