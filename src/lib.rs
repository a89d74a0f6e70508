// Library crate for the live poll server
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod room;
pub mod routes;
pub mod session;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use event::{EventBus, RoomEvent, RoomSubscription};
pub use room::{models::RoomModel, repository::RoomRepository, service::RoomService};
pub use routes::build_router;
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionContext, ConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebSocketRoomSubscriber, WebsocketReceiveHandler,
};
