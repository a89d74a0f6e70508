use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::room;
use crate::session;
use crate::shared::AppState;
use crate::websockets::websocket_handler;

/// Builds the HTTP API and the WebSocket endpoint on top of the shared state
pub fn build_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/create-token", get(session::create_token))
        .route("/create-room", post(room::create_room))
        .route("/rooms/:room_id", get(room::get_room))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(|| async { "livepoll" }))
        .nest("/v1", api)
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_create_token_then_room_then_details() {
        let app_state = AppStateBuilder::new().build();

        let response = build_router(app_state.clone())
            .oneshot(
                Request::builder()
                    .uri("/v1/create-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let token: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let token = token["token"].as_str().unwrap().to_string();

        let response = build_router(app_state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/create-room")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::json!({ "token": token }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let room_id = created["roomId"].as_str().unwrap().to_string();

        let response = build_router(app_state)
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/rooms/{}", room_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let details: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(details["roomId"], room_id.as_str());
        assert_eq!(details["voteCount"], 0);
    }

    #[tokio::test]
    async fn test_ws_route_requires_upgrade() {
        let response = build_router(AppStateBuilder::new().build())
            .oneshot(
                Request::builder()
                    .uri("/ws?roomid=R&token=T1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
