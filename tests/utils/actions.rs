use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use livepoll::{
    event::RoomEvent,
    websockets::{ConnectionContext, MessageHandler, WebSocketMessage},
};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a WebSocket message and wait for processing
    pub async fn send_message(&self, context: &ConnectionContext, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(context, &message_json).await;
    }

    /// Send an arbitrary text frame and wait for processing
    pub async fn send_raw(&self, context: &ConnectionContext, frame: &str) {
        self.send_without_waiting(context, frame).await;
        sleep(Duration::from_millis(20)).await;
    }

    /// Hand a frame to the receive handler without yielding to the room's lane
    pub async fn send_without_waiting(&self, context: &ConnectionContext, frame: &str) {
        self.input_handler
            .handle_message(context, frame.to_string())
            .await;
    }

    /// Emit a room event directly onto the lane and wait for processing
    pub async fn emit_event(&self, event: RoomEvent) {
        self.event_bus
            .emit_to_room(&self.room_id, event)
            .await
            .unwrap();
        sleep(Duration::from_millis(20)).await;
    }

    /// Leave the room as the connection would on socket close
    pub async fn disconnect(&self, context: &ConnectionContext, is_owner: bool) {
        self.connection_handler.leave(context, is_owner).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Vote with a numeric answer
    pub async fn send_vote(&self, context: &ConnectionContext, token: &str, answer: u32) {
        self.send_vote_value(context, token, json!(answer)).await;
    }

    /// Vote with any JSON answer, e.g. a string choice key
    pub async fn send_vote_value(&self, context: &ConnectionContext, token: &str, answer: Value) {
        self.send_message(context, WebSocketMessage::vote(token, answer))
            .await;
    }

    pub async fn send_clear_vote(&self, context: &ConnectionContext) {
        self.send_message(context, WebSocketMessage::clear_vote())
            .await;
    }

    pub async fn send_tally_request(&self, context: &ConnectionContext) {
        self.send_message(context, WebSocketMessage::tally_request())
            .await;
    }
}
