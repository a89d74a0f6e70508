use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum_macros::AsRefStr;

use crate::room::models::Tally;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    Vote,
    ClearVote,

    // Both directions: request from client, reply from server
    Tally,

    // Server -> Client
    ConnectFail,
    ServerError,
    VoteClear,

    /// Anything we do not route
    #[serde(other)]
    Unknown,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub connection_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// An answer as sent by clients, either `2` or `"2"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(serde_json::Number),
    Text(String),
}

impl Answer {
    /// Normalized choice key, so `2`, `2.0` and `"2"` land in the same bucket
    pub fn into_choice_key(self) -> String {
        match self {
            Answer::Number(number) => match number.as_f64() {
                Some(value)
                    if number.is_f64()
                        && value.fract() == 0.0
                        && value.abs() < i64::MAX as f64 =>
                {
                    (value as i64).to_string()
                }
                _ => number.to_string(),
            },
            Answer::Text(text) => text,
        }
    }
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
    pub token: String,
    pub answer: Answer,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectFailPayload {
    pub msg: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                connection_id: None,
            }),
        }
    }

    /// Create a TALLY reply; every key of the tally becomes a payload field
    pub fn tally(tally: &Tally) -> Self {
        let payload: Map<String, Value> = tally
            .iter()
            .map(|(key, count)| (key.clone(), json!(count)))
            .collect();
        Self::new(MessageType::Tally, Value::Object(payload))
    }

    /// Create a CONNECT_FAIL notice for an unknown room
    pub fn connect_fail(room_id: &str) -> Self {
        Self::new(
            MessageType::ConnectFail,
            json!({ "msg": format!("Room {} doesn't exist.", room_id) }),
        )
    }

    /// Create the generic SERVER_ERROR notice
    pub fn server_error() -> Self {
        Self::new(MessageType::ServerError, json!({}))
    }

    /// Create a VOTE_CLEAR notice
    pub fn vote_clear() -> Self {
        Self::new(MessageType::VoteClear, json!({}))
    }

    /// Create a VOTE message (client side)
    pub fn vote(token: &str, answer: Value) -> Self {
        Self::new(
            MessageType::Vote,
            json!({ "token": token, "answer": answer }),
        )
    }

    /// Create a CLEAR_VOTE message (client side)
    pub fn clear_vote() -> Self {
        Self::new(MessageType::ClearVote, json!({}))
    }

    /// Create a TALLY request (client side)
    pub fn tally_request() -> Self {
        Self::new(MessageType::Tally, json!({}))
    }

    /// Tag the message with the connection it is addressed to or came from
    pub fn for_connection(mut self, connection_id: &str) -> Self {
        if let Some(meta) = self.meta.as_mut() {
            meta.connection_id = Some(connection_id.to_string());
        }
        self
    }
}
