use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use livepoll::{
    event::{EventBus, RoomSubscription},
    room::{
        generators::RandomRoomIdGenerator, repository::InMemoryRoomRepository,
        service::RoomService,
    },
    session::TokenEqualityVerifier,
    websockets::{
        ConnectionContext, ConnectionHandler, JoinOutcome, WebSocketRoomSubscriber,
        WebsocketReceiveHandler,
    },
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const ROOM_ID: &str = "R";
pub const OWNER_TOKEN: &str = "T1";
pub const LANE_CAPACITY: usize = 64;

pub struct TestSetup {
    pub event_bus: EventBus,
    pub room_service: Arc<RoomService>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub connection_handler: ConnectionHandler,
    pub input_handler: WebsocketReceiveHandler,
    pub room_id: String,
    pub _lane_handle: JoinHandle<()>,
}

pub struct TestSetupBuilder {
    room_id: String,
    owner_token: String,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            room_id: ROOM_ID.to_string(),
            owner_token: OWNER_TOKEN.to_string(),
        }
    }

    pub fn with_room(mut self, room_id: &str, owner_token: &str) -> Self {
        self.room_id = room_id.to_string();
        self.owner_token = owner_token.to_string();
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new(LANE_CAPACITY);
        let room_service = Arc::new(RoomService::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(RandomRoomIdGenerator::default()),
        ));
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        // Create room
        room_service
            .create_room(self.owner_token.clone(), Some(self.room_id.clone()))
            .await
            .unwrap();

        let connection_handler = ConnectionHandler::new(
            room_service.clone(),
            mock_conn_manager.clone(),
            Arc::new(TokenEqualityVerifier),
            event_bus.clone(),
        );
        let input_handler =
            WebsocketReceiveHandler::new(event_bus.clone(), mock_conn_manager.clone());

        let output_subscriber =
            WebSocketRoomSubscriber::new(room_service.clone(), mock_conn_manager.clone());
        let lane = RoomSubscription::new(
            self.room_id.clone(),
            Arc::new(output_subscriber),
            event_bus.clone(),
        );
        let lane_handle = lane.start().await.expect("room lane should start");

        TestSetup {
            event_bus,
            room_service,
            mock_conn_manager,
            connection_handler,
            input_handler,
            room_id: self.room_id,
            _lane_handle: lane_handle,
        }
    }
}

#[allow(dead_code)]
impl TestSetup {
    /// Joins `connection_id` to the room with the given handshake token
    pub async fn connect(&self, connection_id: &str, token: &str) -> ConnectionContext {
        self.connect_to(&self.room_id.clone(), connection_id, token)
            .await
            .0
    }

    pub async fn connect_to(
        &self,
        room_id: &str,
        connection_id: &str,
        token: &str,
    ) -> (ConnectionContext, JoinOutcome) {
        let context = ConnectionContext {
            connection_id: connection_id.to_string(),
            room_id: room_id.to_string(),
            token: token.to_string(),
        };
        // The mock records messages itself, so the outbound channel is never read
        let (sender, _receiver) = mpsc::unbounded_channel();
        let outcome = self.connection_handler.join(&context, sender).await.unwrap();
        (context, outcome)
    }

    pub async fn owner_channel(&self) -> Option<String> {
        self.room_service
            .get_room(&self.room_id)
            .await
            .unwrap()
            .unwrap()
            .owner_channel
    }
}
