use serde::{Deserialize, Serialize};

/// Response structure for the token creation endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}
