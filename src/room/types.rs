use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    /// Token of the presenter who will own the room
    pub token: String,
    /// Optional caller-chosen room code
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Response for room creation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Public view of a room for the administrative API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailsResponse {
    pub room_id: String,
    pub question: String,
    pub choices: BTreeMap<String, String>,
    pub vote_count: usize,
}
