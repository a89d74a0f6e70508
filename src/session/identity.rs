use crate::room::models::RoomModel;

/// Decides whether a connecting token is the presenter of a room
///
/// The token arrives in the handshake query and is not signed, so any caller
/// that knows the owner token is treated as the owner.
pub trait OwnerVerifier: Send + Sync {
    fn is_owner(&self, room: &RoomModel, token: &str) -> bool;
}

/// Plain equality between the presented token and the room's owner token
pub struct TokenEqualityVerifier;

impl OwnerVerifier for TokenEqualityVerifier {
    fn is_owner(&self, room: &RoomModel, token: &str) -> bool {
        !token.is_empty() && room.owner == token
    }
}
