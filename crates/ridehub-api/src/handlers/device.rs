//! Device token handlers.

use axum::extract::State;
use axum::Json;

use ridehub_core::error::AppError;

use crate::dto::request::RegisterDeviceTokenRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// PUT /api/devices/token
///
/// Registers or refreshes a user's device token. Any other user
/// currently holding the same token loses it; a token identifies one
/// device install, and the install changed hands.
pub async fn register_token(
    State(state): State<AppState>,
    Json(req): Json<RegisterDeviceTokenRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if req.token.trim().is_empty() {
        return Err(AppError::validation("Device token must not be empty").into());
    }
    state
        .user_repo
        .register_device_token(req.user_id, &req.device())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Device token registered".to_string(),
    })))
}
