use async_trait::async_trait;
use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::event::{EventBus, RoomEvent};
use crate::room::service::RoomService;
use crate::session::OwnerVerifier;
use crate::shared::{AppError, AppState};
use crate::websockets::connection_manager::ConnectionManager;
use crate::websockets::messages::{MessageType, VotePayload, WebSocketMessage};

use super::socket::{Connection, ConnectionContext, MessageHandler, SocketWrapper};

/// Handshake query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketQuery {
    #[serde(default)]
    pub roomid: String,
    #[serde(default)]
    pub token: String,
}

/// Message handler for receiving WebSocket messages from the client
///
/// Logs every frame with the handshake token, validates the payload and
/// hands the event to the room's lane. Frames that fail validation get a
/// SERVER_ERROR back and never reach the room.
pub struct WebsocketReceiveHandler {
    event_bus: EventBus,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebsocketReceiveHandler {
    pub fn new(event_bus: EventBus, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            event_bus,
            connection_manager,
        }
    }

    async fn reject(&self, context: &ConnectionContext) {
        match serde_json::to_string(
            &WebSocketMessage::server_error().for_connection(&context.connection_id),
        ) {
            Ok(notice) => {
                self.connection_manager
                    .send_to_connection(&context.connection_id, &notice)
                    .await
            }
            Err(e) => error!(error = %e, "Failed to serialize server error notice"),
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, context: &ConnectionContext, message: String) {
        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    token = %context.token,
                    room_id = %context.room_id,
                    error = %e,
                    message = %message,
                    "Failed to parse WebSocket message"
                );
                self.reject(context).await;
                return;
            }
        };

        info!(
            token = %context.token,
            event = ws_message.message_type.as_ref(),
            room_id = %context.room_id,
            connection_id = %context.connection_id,
            "Received message"
        );

        let connection_id = context.connection_id.clone();
        let event = match ws_message.message_type {
            MessageType::Tally => RoomEvent::TallyRequested { connection_id },
            MessageType::ClearVote => RoomEvent::VotesCleared { connection_id },
            MessageType::Vote => match serde_json::from_value::<VotePayload>(ws_message.payload) {
                Ok(payload) => RoomEvent::VoteCast {
                    connection_id,
                    token: payload.token,
                    answer: payload.answer.into_choice_key(),
                },
                Err(e) => {
                    warn!(
                        token = %context.token,
                        room_id = %context.room_id,
                        error = %e,
                        "Invalid vote payload"
                    );
                    self.reject(context).await;
                    return;
                }
            },
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                return;
            }
        };

        if let Err(e) = self.event_bus.emit_to_room(&context.room_id, event).await {
            warn!(
                token = %context.token,
                room_id = %context.room_id,
                error = %e,
                "Event not delivered to room lane"
            );
            self.reject(context).await;
        }
    }
}

/// Outcome of classifying a freshly accepted connection
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// Connection is in the room's group; `is_owner` if it became the owner channel
    Joined { is_owner: bool },
    /// No such room, nothing was registered
    RoomNotFound,
}

/// How a connection ended
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionOutcome {
    /// Room did not exist; CONNECT_FAIL was sent and the socket closed
    Rejected,
    Closed,
    Failed(String),
}

/// Per-connection lifecycle: validate room, classify owner, join group, run, clean up
pub struct ConnectionHandler {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
    owner_verifier: Arc<dyn OwnerVerifier>,
    event_bus: EventBus,
}

impl ConnectionHandler {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
        owner_verifier: Arc<dyn OwnerVerifier>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
            owner_verifier,
            event_bus,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.room_service),
            Arc::clone(&state.connection_manager),
            Arc::clone(&state.owner_verifier),
            state.event_bus.clone(),
        )
    }

    /// Registers the connection with its room. The owner channel is bound before the group join.
    pub async fn join(
        &self,
        context: &ConnectionContext,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<JoinOutcome, AppError> {
        let room = match self.room_service.get_room(&context.room_id).await? {
            Some(room) => room,
            None => return Ok(JoinOutcome::RoomNotFound),
        };

        let is_owner = self.owner_verifier.is_owner(&room, &context.token);

        self.connection_manager
            .add_connection(context.connection_id.clone(), sender)
            .await;

        if is_owner {
            self.room_service
                .bind_owner_channel(&context.room_id, &context.connection_id)
                .await?;
        }

        self.connection_manager
            .join_group(&context.room_id, &context.connection_id)
            .await;

        info!(
            room_id = %context.room_id,
            connection_id = %context.connection_id,
            is_owner = is_owner,
            "Connection joined room"
        );

        Ok(JoinOutcome::Joined { is_owner })
    }

    /// Removes the connection from its group and unbinds it if it was the owner channel
    pub async fn leave(&self, context: &ConnectionContext, is_owner: bool) {
        self.connection_manager
            .remove_connection(&context.connection_id)
            .await;

        if is_owner {
            if let Err(e) = self
                .room_service
                .release_owner_channel(&context.room_id, &context.connection_id)
                .await
            {
                warn!(
                    room_id = %context.room_id,
                    connection_id = %context.connection_id,
                    error = %e,
                    "Failed to release owner channel"
                );
            }
        }
    }

    /// Runs one connection from handshake to close
    pub async fn handle(
        &self,
        mut socket: Box<dyn SocketWrapper>,
        query: WebSocketQuery,
    ) -> ConnectionOutcome {
        let context = ConnectionContext {
            connection_id: Uuid::new_v4().to_string(),
            room_id: query.roomid,
            token: query.token,
        };

        info!(
            room_id = %context.room_id,
            token = %context.token,
            connection_id = %context.connection_id,
            "Connect"
        );

        // Create the outbound channel (app -> client)
        let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

        let is_owner = match self.join(&context, outbound_sender).await {
            Ok(JoinOutcome::Joined { is_owner }) => is_owner,
            Ok(JoinOutcome::RoomNotFound) => {
                warn!(room_id = %context.room_id, "Room not found, rejecting connection");
                Self::send_and_close(
                    socket.as_mut(),
                    &WebSocketMessage::connect_fail(&context.room_id),
                )
                .await;
                return ConnectionOutcome::Rejected;
            }
            Err(e) => {
                error!(
                    room_id = %context.room_id,
                    error = %e,
                    "Failed to join room"
                );
                self.connection_manager
                    .remove_connection(&context.connection_id)
                    .await;
                Self::send_and_close(socket.as_mut(), &WebSocketMessage::server_error()).await;
                return ConnectionOutcome::Failed(e.to_string());
            }
        };

        let message_handler = Arc::new(WebsocketReceiveHandler::new(
            self.event_bus.clone(),
            Arc::clone(&self.connection_manager),
        ));
        let connection = Connection::new(
            context.clone(),
            socket,
            outbound_receiver,
            message_handler,
        );

        // Run the connection until disconnect
        let outcome = match connection.run().await {
            Ok(()) => {
                info!(
                    room_id = %context.room_id,
                    connection_id = %context.connection_id,
                    "WebSocket connection closed cleanly"
                );
                ConnectionOutcome::Closed
            }
            Err(e) => {
                warn!(
                    room_id = %context.room_id,
                    connection_id = %context.connection_id,
                    error = %e,
                    "WebSocket connection error"
                );
                ConnectionOutcome::Failed(e.to_string())
            }
        };

        self.leave(&context, is_owner).await;
        outcome
    }

    async fn send_and_close(socket: &mut dyn SocketWrapper, message: &WebSocketMessage) {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Err(e) = socket.send_message(json).await {
                    debug!(error = %e, "Failed to send final notice");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize final notice"),
        }
        let _ = socket.close().await;
    }
}

/// WebSocket endpoint
///
/// GET /ws?roomid=ROOM&token=TOKEN
/// The upgrade is always accepted so that an unknown room can be reported
/// over the socket as CONNECT_FAIL.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WebSocketQuery>,
    State(app_state): State<AppState>,
) -> Response {
    info!(room_id = %query.roomid, "WebSocket connection requested");

    let handler = ConnectionHandler::from_state(&app_state);
    ws.on_upgrade(move |socket| async move {
        let outcome = handler.handle(Box::new(socket), query).await;
        debug!(outcome = ?outcome, "WebSocket connection finished");
    })
}
