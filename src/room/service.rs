use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    generators::RoomIdGenerator,
    models::RoomModel,
    repository::{RoomRepository, RoomUpdateResult},
    types::RoomDetailsResponse,
};
use crate::shared::AppError;

/// Default number of generated ids tried before giving up on a collision streak
pub const DEFAULT_ROOM_ID_ATTEMPTS: usize = 8;

/// Service for handling room business logic
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    id_generator: Arc<dyn RoomIdGenerator>,
    max_id_attempts: usize,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        id_generator: Arc<dyn RoomIdGenerator>,
    ) -> Self {
        Self {
            repository,
            id_generator,
            max_id_attempts: DEFAULT_ROOM_ID_ATTEMPTS,
        }
    }

    /// Set how many generated ids are tried before creation fails
    pub fn with_max_id_attempts(mut self, max_id_attempts: usize) -> Self {
        self.max_id_attempts = max_id_attempts.max(1);
        self
    }

    /// Creates a new room owned by `owner_token`.
    ///
    /// A caller-supplied id that is already taken is rejected. Generated ids
    /// are regenerated on collision.
    #[instrument(skip(self, owner_token))]
    pub async fn create_room(
        &self,
        owner_token: String,
        room_id: Option<String>,
    ) -> Result<RoomModel, AppError> {
        if owner_token.is_empty() {
            return Err(AppError::BadRequest("Owner token is required".to_string()));
        }

        if let Some(room_id) = room_id {
            if room_id.is_empty() {
                return Err(AppError::BadRequest("Room id must not be empty".to_string()));
            }
            let room = RoomModel::new(room_id, owner_token);
            self.repository.create_room(&room).await?;
            info!(room_id = %room.id, "Room created with requested id");
            return Ok(room);
        }

        for attempt in 1..=self.max_id_attempts {
            let room = RoomModel::new(self.id_generator.generate(), owner_token.clone());
            debug!(room_id = %room.id, attempt = attempt, "Generated room ID");

            match self.repository.create_room(&room).await {
                Ok(()) => {
                    info!(room_id = %room.id, "Room created successfully");
                    return Ok(room);
                }
                Err(AppError::Conflict(_)) => {
                    warn!(room_id = %room.id, attempt = attempt, "Generated room ID collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_id_attempts,
            "Could not generate a free room ID"
        );
        Err(AppError::Internal)
    }

    /// Gets the full room model for internal use (WebSocket handlers, etc.)
    pub async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        self.repository.get_room(room_id).await
    }

    pub async fn has_room(&self, room_id: &str) -> Result<bool, AppError> {
        self.repository.has_room(room_id).await
    }

    /// Gets room details as a response object for API endpoints
    #[instrument(skip(self))]
    pub async fn get_room_details(&self, room_id: &str) -> Result<RoomDetailsResponse, AppError> {
        let room = self
            .repository
            .get_room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} doesn't exist.", room_id)))?;

        let view = room.question_view();
        Ok(RoomDetailsResponse {
            room_id: room.id.clone(),
            question: view.question,
            choices: view.choices,
            vote_count: room.vote_count(),
        })
    }

    #[instrument(skip(self))]
    pub async fn record_vote(
        &self,
        room_id: &str,
        token: &str,
        answer: &str,
    ) -> Result<RoomUpdateResult, AppError> {
        self.repository.record_vote(room_id, token, answer).await
    }

    #[instrument(skip(self))]
    pub async fn clear_votes(&self, room_id: &str) -> Result<RoomUpdateResult, AppError> {
        self.repository.clear_votes(room_id).await
    }

    /// Makes `connection_id` the room's owner channel
    #[instrument(skip(self))]
    pub async fn bind_owner_channel(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<bool, AppError> {
        let bound = self
            .repository
            .set_owner_channel(room_id, connection_id)
            .await?;
        if bound {
            info!(room_id = %room_id, connection_id = %connection_id, "Owner channel bound");
        }
        Ok(bound)
    }

    /// Unbinds `connection_id` if it is still the room's owner channel
    #[instrument(skip(self))]
    pub async fn release_owner_channel(
        &self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<bool, AppError> {
        let released = self
            .repository
            .release_owner_channel(room_id, connection_id)
            .await?;
        if released {
            info!(room_id = %room_id, connection_id = %connection_id, "Owner channel released");
        }
        Ok(released)
    }
}
