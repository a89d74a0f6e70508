use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use livepoll::websockets::ConnectionManager;

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every message per connection id instead of writing to sockets
#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
    connected: Arc<RwLock<Vec<String>>>,
    groups: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

#[allow(dead_code)]
impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_messages_for(&self, connection_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(connection_id)
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest recorded message for the connection
    pub async fn consume_message_for(&self, connection_id: &str) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(connection_id)
            .and_then(|messages| messages.pop_front())
    }

    pub async fn is_connected(&self, connection_id: &str) -> bool {
        self.connected
            .read()
            .await
            .iter()
            .any(|id| id == connection_id)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, connection_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.connected.write().await.push(connection_id);
    }

    async fn remove_connection(&self, connection_id: &str) {
        self.connected.write().await.retain(|id| id != connection_id);
        for members in self.groups.write().await.values_mut() {
            members.retain(|id| id != connection_id);
        }
    }

    async fn join_group(&self, room_id: &str, connection_id: &str) {
        self.groups
            .write()
            .await
            .entry(room_id.to_string())
            .or_default()
            .push(connection_id.to_string());
    }

    async fn group_members(&self, room_id: &str) -> Vec<String> {
        self.groups
            .read()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        if !self.is_connected(connection_id).await {
            return;
        }
        self.sent_messages
            .write()
            .await
            .entry(connection_id.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_group_except(&self, room_id: &str, except_connection_id: &str, message: &str) {
        for connection_id in self.group_members(room_id).await {
            if connection_id != except_connection_id {
                self.send_to_connection(&connection_id, message).await;
            }
        }
    }
}
