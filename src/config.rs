use std::net::SocketAddr;
use std::str::FromStr;
use tracing::warn;

use crate::event::DEFAULT_ROOM_CAPACITY;
use crate::room::{generators::DEFAULT_ROOM_ID_LENGTH, service::DEFAULT_ROOM_ID_ATTEMPTS};

pub const BIND_ADDR_VAR: &str = "LIVEPOLL_BIND_ADDR";
pub const ROOM_ID_LENGTH_VAR: &str = "LIVEPOLL_ROOM_ID_LENGTH";
pub const ROOM_ID_ATTEMPTS_VAR: &str = "LIVEPOLL_ROOM_ID_ATTEMPTS";
pub const EVENT_CAPACITY_VAR: &str = "LIVEPOLL_EVENT_CAPACITY";

/// Server settings, read from the environment with sane defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub room_id_length: usize,
    pub room_id_attempts: usize,
    pub event_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5555)),
            room_id_length: DEFAULT_ROOM_ID_LENGTH,
            room_id_attempts: DEFAULT_ROOM_ID_ATTEMPTS,
            event_capacity: DEFAULT_ROOM_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_addr: env_parse(&lookup, BIND_ADDR_VAR, defaults.bind_addr),
            room_id_length: env_parse(&lookup, ROOM_ID_LENGTH_VAR, defaults.room_id_length).max(1),
            room_id_attempts: env_parse(&lookup, ROOM_ID_ATTEMPTS_VAR, defaults.room_id_attempts)
                .max(1),
            event_capacity: env_parse(&lookup, EVENT_CAPACITY_VAR, defaults.event_capacity).max(1),
        }
    }
}

fn env_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = key, value = %raw, "Invalid config value, using default");
                default
            }
        },
        None => default,
    }
}
