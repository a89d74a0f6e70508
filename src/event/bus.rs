use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use super::events::RoomEvent;

/// Default number of queued events per room before senders wait for the lane
pub const DEFAULT_ROOM_CAPACITY: usize = 1024;

/// Why an event could not be queued for its room
#[derive(Debug, Error, PartialEq)]
pub enum EmitError {
    #[error("No lane running for room {0}")]
    NoLane(String),

    #[error("Lane for room {0} has stopped")]
    LaneClosed(String),
}

/// Event bus holding one bounded queue per room
///
/// Each room has a single reader, its lane. A full queue makes the sender
/// wait; events are never dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific queues: room_id -> sender
    room_lanes: Arc<RwLock<HashMap<String, mpsc::Sender<RoomEvent>>>>,
    room_capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CAPACITY)
    }
}

impl EventBus {
    pub fn new(room_capacity: usize) -> Self {
        Self {
            room_lanes: Arc::new(RwLock::new(HashMap::new())),
            room_capacity: room_capacity.max(1),
        }
    }

    /// Creates the room's queue and hands out its only receiver.
    ///
    /// Returns `None` while a lane for the room is already open.
    pub async fn open_room(&self, room_id: &str) -> Option<mpsc::Receiver<RoomEvent>> {
        let mut room_lanes = self.room_lanes.write().await;
        if let Some(sender) = room_lanes.get(room_id) {
            if !sender.is_closed() {
                return None;
            }
        }

        debug!(room_id = %room_id, capacity = self.room_capacity, "Opening room lane");
        let (sender, receiver) = mpsc::channel(self.room_capacity);
        room_lanes.insert(room_id.to_string(), sender);
        Some(receiver)
    }

    /// Queues an event for the room's lane, waiting while the queue is full
    pub async fn emit_to_room(&self, room_id: &str, event: RoomEvent) -> Result<(), EmitError> {
        let sender = self
            .room_lanes
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| EmitError::NoLane(room_id.to_string()))?;

        if sender.send(event).await.is_err() {
            warn!(room_id = %room_id, "Room lane stopped, event not queued");
            self.room_lanes
                .write()
                .await
                .retain(|id, sender| id != room_id || !sender.is_closed());
            return Err(EmitError::LaneClosed(room_id.to_string()));
        }

        debug!(room_id = %room_id, "Room event queued");
        Ok(())
    }
}
