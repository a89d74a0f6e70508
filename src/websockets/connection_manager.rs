use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Addressable channels and room groups over live connections
///
/// Sends are fire-and-forget: a message for a connection that is gone is dropped.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    /// Drops the connection's channel and its membership in every group
    async fn remove_connection(&self, connection_id: &str);

    async fn join_group(&self, room_id: &str, connection_id: &str);

    async fn group_members(&self, room_id: &str) -> Vec<String>;

    async fn send_to_connection(&self, connection_id: &str, message: &str);

    /// Sends to every member of the room's group except `except_connection_id`
    async fn send_to_group_except(&self, room_id: &str, except_connection_id: &str, message: &str);
}

pub struct InMemoryConnectionManager {
    // connection_id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
    // room_id -> connection_ids
    groups: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        self.connections.write().await.remove(connection_id);

        let mut groups = self.groups.write().await;
        groups.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
    }

    async fn join_group(&self, room_id: &str, connection_id: &str) {
        let mut groups = self.groups.write().await;
        groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    async fn group_members(&self, room_id: &str) -> Vec<String> {
        let groups = self.groups.read().await;
        groups
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_group_except(&self, room_id: &str, except_connection_id: &str, message: &str) {
        let members = self.group_members(room_id).await;
        let connections = self.connections.read().await;
        for connection_id in members.iter().filter(|id| *id != except_connection_id) {
            if let Some(sender) = connections.get(connection_id) {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
