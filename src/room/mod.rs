// Public API - what other modules can use
pub use handlers::{create_room, get_room};

// Internal modules
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
