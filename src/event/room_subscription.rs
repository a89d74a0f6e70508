use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{bus::EventBus, room_handler::RoomEventHandler};

/// Per-room processing lane: routes a room's events to one handler, in order
pub struct RoomSubscription {
    room_id: String,
    handler: Arc<dyn RoomEventHandler>,
    event_bus: EventBus,
}

impl RoomSubscription {
    pub fn new(room_id: String, handler: Arc<dyn RoomEventHandler>, event_bus: EventBus) -> Self {
        Self {
            room_id,
            handler,
            event_bus,
        }
    }

    /// Start the lane - spawns a background task that drains the room's queue
    /// and routes each event to the handler.
    ///
    /// The queue exists before this returns, so events emitted afterwards are held
    /// until handled. Each event is fully handled before the next one is read.
    /// Returns `None` if the room already has a running lane.
    pub async fn start(self) -> Option<JoinHandle<()>> {
        let room_id = self.room_id.clone();
        let handler_name = self.handler.handler_name();

        let Some(mut receiver) = self.event_bus.open_room(&room_id).await else {
            warn!(
                room_id = %room_id,
                handler = handler_name,
                "Room lane already running"
            );
            return None;
        };

        info!(
            room_id = %room_id,
            handler = handler_name,
            "Starting room subscription"
        );

        Some(tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                debug!(
                    room_id = %room_id,
                    handler = handler_name,
                    event = ?event,
                    "Received room event"
                );

                if let Err(e) = self.handler.handle_room_event(&room_id, event).await {
                    info!(
                        room_id = %room_id,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            warn!(
                room_id = %room_id,
                handler = handler_name,
                "Room subscription ended - no more events"
            );
        }))
    }
}
