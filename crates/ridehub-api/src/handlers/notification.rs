//! Notification handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::request::{NotificationListParams, UserParams};
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse, NotificationResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    let rows = state
        .notification_repo
        .find_by_user(params.user_id, params.limit)
        .await?;
    let items = rows.into_iter().map(NotificationResponse::from).collect();
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_repo.count_unread(params.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserParams>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_repo.mark_read(id, params.user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Marked as read".to_string(),
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_repo.mark_all_read(params.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
