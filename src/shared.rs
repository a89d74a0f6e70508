use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::event::{EventBus, RoomEventHandler, RoomSubscription};
use crate::room::{
    generators::RandomRoomIdGenerator,
    repository::{InMemoryRoomRepository, RoomRepository},
    service::RoomService,
};
use crate::session::{OwnerVerifier, TokenEqualityVerifier, TokenGenerator, UuidTokenGenerator};
use crate::websockets::{ConnectionManager, InMemoryConnectionManager, WebSocketRoomSubscriber};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub token_generator: Arc<dyn TokenGenerator>,
    pub owner_verifier: Arc<dyn OwnerVerifier>,
    pub event_bus: EventBus,
    pub room_subscriber: Arc<dyn RoomEventHandler>,
}

impl AppState {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
        token_generator: Arc<dyn TokenGenerator>,
        owner_verifier: Arc<dyn OwnerVerifier>,
        event_bus: EventBus,
    ) -> Self {
        let room_subscriber: Arc<dyn RoomEventHandler> = Arc::new(WebSocketRoomSubscriber::new(
            Arc::clone(&room_service),
            Arc::clone(&connection_manager),
        ));

        Self {
            room_service,
            connection_manager,
            token_generator,
            owner_verifier,
            event_bus,
            room_subscriber,
        }
    }

    /// In-memory state wired from the server config
    pub fn from_config(config: &ServerConfig) -> Self {
        let room_service = RoomService::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(RandomRoomIdGenerator::new(config.room_id_length)),
        )
        .with_max_id_attempts(config.room_id_attempts);

        Self::new(
            Arc::new(room_service),
            Arc::new(InMemoryConnectionManager::new()),
            Arc::new(UuidTokenGenerator::new()),
            Arc::new(TokenEqualityVerifier),
            EventBus::new(config.event_capacity),
        )
    }

    /// Starts the room's processing lane; every poll event for the room is handled there in order.
    /// Returns `None` if the lane is already running.
    pub async fn start_room_lane(&self, room_id: &str) -> Option<JoinHandle<()>> {
        RoomSubscription::new(
            room_id.to_string(),
            Arc::clone(&self.room_subscriber),
            self.event_bus.clone(),
        )
        .start()
        .await
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::StorageError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
