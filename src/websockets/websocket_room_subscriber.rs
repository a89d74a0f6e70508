use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    event::{RoomEvent, RoomEventError, RoomEventHandler},
    room::service::RoomService,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::event_handlers::{shared::MessageBroadcaster, PollEventHandlers};

/// WebSocket-specific room event handler
///
/// Routes each poll event to its handler. A failing handler is isolated to
/// that one event: the failure is logged, the originating connection gets a
/// generic SERVER_ERROR notice, and nothing is rolled back or retried.
pub struct WebSocketRoomSubscriber {
    poll_handlers: PollEventHandlers,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebSocketRoomSubscriber {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            poll_handlers: PollEventHandlers::new(room_service, Arc::clone(&connection_manager)),
            connection_manager,
        }
    }

    async fn report_fault(&self, room_id: &str, connection_id: &str) {
        let notice = WebSocketMessage::server_error().for_connection(connection_id);
        if let Err(e) =
            MessageBroadcaster::send_to_connection(&self.connection_manager, connection_id, &notice)
                .await
        {
            error!(
                room_id = %room_id,
                connection_id = %connection_id,
                error = %e,
                "Failed to deliver server error notice"
            );
        }
    }
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            room_id = %room_id,
            event = ?event,
            "Handling room event for WebSocket connections"
        );

        let connection_id = event.connection_id().to_string();
        let event_type = event.event_type();

        let result = match event {
            RoomEvent::TallyRequested { connection_id } => {
                self.poll_handlers
                    .handle_tally_request(room_id, &connection_id)
                    .await
            }
            RoomEvent::VoteCast { token, answer, .. } => {
                self.poll_handlers
                    .handle_vote(room_id, &token, &answer)
                    .await
            }
            RoomEvent::VotesCleared { connection_id } => {
                self.poll_handlers
                    .handle_clear_votes(room_id, &connection_id)
                    .await
            }
        };

        if let Err(e) = &result {
            error!(
                room_id = %room_id,
                connection_id = %connection_id,
                event = event_type,
                error = %e,
                "Room event failed"
            );
            self.report_fault(room_id, &connection_id).await;
        }

        result
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}
