// Public API - what other modules can use
pub use generators::{TokenGenerator, UuidTokenGenerator};
pub use handlers::create_token;
pub use identity::{OwnerVerifier, TokenEqualityVerifier};

// Internal modules
mod generators;
mod handlers;
mod identity;
pub mod types;
