//! Trip handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::dto::request::{CreateTripRequest, TransitionRequest};
use crate::dto::response::{ApiResponse, TripResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/trips
///
/// Creates a trip in `WAITING` status and starts announcing it to
/// available drivers.
pub async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripResponse>>), ApiError> {
    let trip = state.lifecycle.create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TripResponse::from(trip))),
    ))
}

/// GET /api/trips/{id}
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, ApiError> {
    let trip = state.lifecycle.get(id).await?;
    Ok(Json(ApiResponse::ok(TripResponse::from(trip))))
}

/// POST /api/trips/{id}/transition
///
/// All status changes, including driver acceptance and cancellation,
/// go through this endpoint. Losing an accept race yields 409.
pub async fn transition_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, ApiError> {
    let trip = state
        .lifecycle
        .transition(id, req.status, req.driver_id)
        .await?;
    Ok(Json(ApiResponse::ok(TripResponse::from(trip))))
}
