use crate::{
    event::RoomEventError,
    room::{models::RoomModel, repository::RoomUpdateResult, repository::TallySnapshot, service::RoomService},
};
use std::sync::Arc;

pub struct RoomQueryUtils;

impl RoomQueryUtils {
    pub async fn get_room_or_error(
        room_service: &Arc<RoomService>,
        room_id: &str,
    ) -> Result<RoomModel, RoomEventError> {
        room_service
            .get_room(room_id)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to get room: {}", e)))?
            .ok_or_else(|| RoomEventError::RoomNotFound(room_id.to_string()))
    }

    /// Unwraps a vote mutation, turning a vanished room into an error
    pub fn updated_or_error(
        room_id: &str,
        result: RoomUpdateResult,
    ) -> Result<TallySnapshot, RoomEventError> {
        match result {
            RoomUpdateResult::Updated(snapshot) => Ok(snapshot),
            RoomUpdateResult::RoomNotFound => Err(RoomEventError::RoomNotFound(room_id.to_string())),
        }
    }
}
