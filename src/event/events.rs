use serde::{Deserialize, Serialize};

/// Inbound poll events routed through a room's lane
///
/// Each event carries the id of the connection it came from so that
/// replies and fault notices can be addressed back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A connection asked for the current tally
    TallyRequested { connection_id: String },

    /// A participant voted; `token` is the voter token from the payload
    VoteCast {
        connection_id: String,
        token: String,
        answer: String,
    },

    /// The presenter cleared all votes
    VotesCleared { connection_id: String },
}

impl RoomEvent {
    /// Connection the event originated from
    pub fn connection_id(&self) -> &str {
        match self {
            RoomEvent::TallyRequested { connection_id } => connection_id,
            RoomEvent::VoteCast { connection_id, .. } => connection_id,
            RoomEvent::VotesCleared { connection_id } => connection_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::TallyRequested { .. } => "tally_requested",
            RoomEvent::VoteCast { .. } => "vote_cast",
            RoomEvent::VotesCleared { .. } => "votes_cleared",
        }
    }
}
