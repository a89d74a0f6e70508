use axum::{extract::State, Json};
use tracing::{debug, instrument};

use super::types::TokenResponse;
use crate::shared::AppState;

/// HTTP handler for issuing a fresh anonymous token
///
/// GET /v1/create-token
#[instrument(name = "create_token", skip(state))]
pub async fn create_token(State(state): State<AppState>) -> Json<TokenResponse> {
    let token = state.token_generator.generate().await;
    debug!(token_length = token.len(), "Token issued");

    Json(TokenResponse { token })
}
