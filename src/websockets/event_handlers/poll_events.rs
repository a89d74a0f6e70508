use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    event::RoomEventError,
    room::{repository::TallySnapshot, service::RoomService},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::{MessageBroadcaster, RoomQueryUtils};

/// Handlers for the three inbound poll events
pub struct PollEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl PollEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Replies with the current tally to the requesting connection only
    #[instrument(skip(self))]
    pub async fn handle_tally_request(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<(), RoomEventError> {
        let room = RoomQueryUtils::get_room_or_error(&self.room_service, room_id).await?;

        MessageBroadcaster::send_to_connection(
            &self.connection_manager,
            connection_id,
            &WebSocketMessage::tally(&room.tally()),
        )
        .await
    }

    /// Records the vote and pushes the fresh tally to the owner channel
    #[instrument(skip(self))]
    pub async fn handle_vote(
        &self,
        room_id: &str,
        token: &str,
        answer: &str,
    ) -> Result<(), RoomEventError> {
        let result = self
            .room_service
            .record_vote(room_id, token, answer)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to record vote: {}", e)))?;
        let snapshot = RoomQueryUtils::updated_or_error(room_id, result)?;

        debug!(room_id = %room_id, token = %token, answer = %answer, "Vote handled");

        self.send_tally_to_owner(room_id, &snapshot).await
    }

    /// Clears votes, tells everyone else in the room, then pushes the empty tally to the owner
    #[instrument(skip(self))]
    pub async fn handle_clear_votes(
        &self,
        room_id: &str,
        sender_connection_id: &str,
    ) -> Result<(), RoomEventError> {
        let result = self
            .room_service
            .clear_votes(room_id)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to clear votes: {}", e)))?;
        let snapshot = RoomQueryUtils::updated_or_error(room_id, result)?;

        MessageBroadcaster::broadcast_to_group_except(
            &self.connection_manager,
            room_id,
            sender_connection_id,
            &WebSocketMessage::vote_clear(),
        )
        .await?;

        info!(room_id = %room_id, sender = %sender_connection_id, "Vote clear broadcast");

        self.send_tally_to_owner(room_id, &snapshot).await
    }

    async fn send_tally_to_owner(
        &self,
        room_id: &str,
        snapshot: &TallySnapshot,
    ) -> Result<(), RoomEventError> {
        MessageBroadcaster::send_to_owner(
            &self.connection_manager,
            room_id,
            snapshot.owner_channel.as_deref(),
            &WebSocketMessage::tally(&snapshot.tally),
        )
        .await
    }
}
