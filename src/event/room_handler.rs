use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Why a poll event could not be applied
#[derive(Debug, Error)]
pub enum RoomEventError {
    /// The room vanished between the frame arriving and the lane handling it
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Storage or serialization failed while voting, clearing or tallying
    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Consumer of one room's poll events
///
/// A room's lane calls this for each vote, clear and tally request in arrival
/// order. An `Err` stays with that one event; the lane moves on to the next.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError>;

    /// Name shown in lane logs
    fn handler_name(&self) -> &'static str;
}
