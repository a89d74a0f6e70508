// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{
    websocket_handler, ConnectionHandler, ConnectionOutcome, JoinOutcome, WebSocketQuery,
    WebsocketReceiveHandler,
};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{Connection, ConnectionContext, MessageHandler, SocketError, SocketWrapper};
pub use websocket_room_subscriber::WebSocketRoomSubscriber;

// Internal modules
pub mod connection_manager;
pub mod event_handlers;
mod handler;
pub mod messages;
pub mod socket;
mod websocket_room_subscriber;
