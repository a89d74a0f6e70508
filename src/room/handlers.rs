use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{CreateRoomRequest, CreateRoomResponse, RoomDetailsResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /v1/create-room
/// Returns the room code; the room's event lane is started before responding
#[instrument(name = "create_room", skip(state, request))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    info!(requested_id = ?request.room_id, "Creating new room");

    let room = state
        .room_service
        .create_room(request.token, request.room_id)
        .await?;

    state.start_room_lane(&room.id).await;

    Ok(Json(CreateRoomResponse { room_id: room.id }))
}

/// HTTP handler for reading a room's question and vote count
///
/// GET /v1/rooms/:room_id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailsResponse>, AppError> {
    let details = state.room_service.get_room_details(&room_id).await?;
    Ok(Json(details))
}
