use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use super::models::{RoomModel, Tally};
use crate::shared::AppError;

/// Tally and owner channel captured in the same critical section as a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct TallySnapshot {
    pub tally: Tally,
    pub owner_channel: Option<String>,
}

impl TallySnapshot {
    fn of(room: &RoomModel) -> Self {
        Self {
            tally: room.tally(),
            owner_channel: room.owner_channel.clone(),
        }
    }
}

/// Result of mutating the votes of a room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomUpdateResult {
    /// Mutation applied, returns the fresh tally
    Updated(TallySnapshot),
    /// Room does not exist
    RoomNotFound,
}

/// Trait for room registry operations
///
/// Every mutation is a single call so implementations can apply it atomically
/// with respect to other mutations of the same room.
#[async_trait]
pub trait RoomRepository {
    /// Inserts a new room; fails with `AppError::Conflict` if the id is taken
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;
    async fn has_room(&self, room_id: &str) -> Result<bool, AppError>;

    /// Upserts the vote of `token` and returns the new tally
    async fn record_vote(
        &self,
        room_id: &str,
        token: &str,
        answer: &str,
    ) -> Result<RoomUpdateResult, AppError>;

    /// Drops every vote and returns the (empty) tally
    async fn clear_votes(&self, room_id: &str) -> Result<RoomUpdateResult, AppError>;

    /// Binds the owner channel to `connection_id`; false if the room does not exist
    async fn set_owner_channel(&self, room_id: &str, connection_id: &str)
        -> Result<bool, AppError>;

    /// Unbinds the owner channel if it still points at `connection_id`
    async fn release_owner_channel(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<bool, AppError>;
}

/// In-memory room registry, lives for the whole process
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn rooms(&self) -> Result<MutexGuard<'_, HashMap<String, RoomModel>>, AppError> {
        self.rooms
            .lock()
            .map_err(|e| AppError::StorageError(format!("Room registry lock poisoned: {}", e)))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!(room_id = %room.id, "Creating room in memory");

        let mut rooms = self.rooms()?;
        if rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room already exists in memory");
            return Err(AppError::Conflict(format!("Room {} already exists", room.id)));
        }
        rooms.insert(room.id.clone(), room.clone());

        debug!(room_id = %room.id, "Room created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms()?;
        let room = rooms.get(room_id).cloned();

        if room.is_none() {
            debug!(room_id = %room_id, "Room not found in memory");
        }

        Ok(room)
    }

    async fn has_room(&self, room_id: &str) -> Result<bool, AppError> {
        Ok(self.rooms()?.contains_key(room_id))
    }

    #[instrument(skip(self))]
    async fn record_vote(
        &self,
        room_id: &str,
        token: &str,
        answer: &str,
    ) -> Result<RoomUpdateResult, AppError> {
        let mut rooms = self.rooms()?;

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return Ok(RoomUpdateResult::RoomNotFound);
            }
        };

        room.vote(token.to_string(), answer.to_string());

        debug!(
            room_id = %room_id,
            token = %token,
            answer = %answer,
            vote_count = room.vote_count(),
            "Vote recorded"
        );

        Ok(RoomUpdateResult::Updated(TallySnapshot::of(room)))
    }

    #[instrument(skip(self))]
    async fn clear_votes(&self, room_id: &str) -> Result<RoomUpdateResult, AppError> {
        let mut rooms = self.rooms()?;

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return Ok(RoomUpdateResult::RoomNotFound);
            }
        };

        let cleared = room.vote_count();
        room.clear_votes();

        info!(room_id = %room_id, cleared = cleared, "Votes cleared");

        Ok(RoomUpdateResult::Updated(TallySnapshot::of(room)))
    }

    #[instrument(skip(self))]
    async fn set_owner_channel(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<bool, AppError> {
        let mut rooms = self.rooms()?;

        match rooms.get_mut(room_id) {
            Some(room) => {
                if let Some(previous) = &room.owner_channel {
                    debug!(
                        room_id = %room_id,
                        previous = %previous,
                        "Replacing owner channel"
                    );
                }
                room.set_owner_channel(connection_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn release_owner_channel(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<bool, AppError> {
        let mut rooms = self.rooms()?;

        Ok(rooms
            .get_mut(room_id)
            .map(|room| room.release_owner_channel(connection_id))
            .unwrap_or(false))
    }
}
