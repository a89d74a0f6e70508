use crate::{
    event::RoomEventError,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};
use std::sync::Arc;
use tracing::debug;

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    fn serialize(message: &WebSocketMessage) -> Result<String, RoomEventError> {
        serde_json::to_string(message).map_err(|e| {
            RoomEventError::HandlerError(format!("Failed to serialize message: {}", e))
        })
    }

    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = Self::serialize(message)?;
        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;
        Ok(())
    }

    /// Sends to the room's owner channel, if one is bound
    pub async fn send_to_owner(
        connection_manager: &Arc<dyn ConnectionManager>,
        room_id: &str,
        owner_channel: Option<&str>,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        match owner_channel {
            Some(connection_id) => {
                Self::send_to_connection(connection_manager, connection_id, message).await
            }
            None => {
                debug!(room_id = %room_id, "No owner channel bound, message not delivered");
                Ok(())
            }
        }
    }

    pub async fn broadcast_to_group_except(
        connection_manager: &Arc<dyn ConnectionManager>,
        room_id: &str,
        except_connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = Self::serialize(message)?;
        connection_manager
            .send_to_group_except(room_id, except_connection_id, &message_json)
            .await;
        Ok(())
    }
}
