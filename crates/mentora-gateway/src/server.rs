// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use mentora_agent::CoachPipeline;
use mentora_core::MentoraError;
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The coach pipeline, constructed once at startup.
    pub pipeline: Arc<CoachPipeline>,
}

/// Gateway server configuration (mirrors GatewayConfig from mentora-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/coach", post(handlers::post_coach))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves routes:
/// - POST /v1/coach
/// - GET /health
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), MentoraError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MentoraError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| MentoraError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use mentora_config::model::MemoryConfig;
    use mentora_core::EmbeddingAdapter;
    use mentora_memory::{apply_schema, ContextRanker, LongTermMemory, SessionMemory, VectorStore};
    use mentora_test_utils::{MockEmbedder, MockProvider};
    use tokio_rusqlite::Connection;
    use tower::ServiceExt;

    const DIM: usize = 16;

    async fn test_router(responses: Vec<&str>) -> Router {
        let conn = Connection::open_in_memory().await.unwrap();
        apply_schema(&conn).await.unwrap();
        let store = Arc::new(VectorStore::new(conn.clone(), DIM));
        let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(MockEmbedder::new(DIM));
        let long_term = Arc::new(LongTermMemory::new(
            Arc::clone(&store),
            Arc::clone(&embedder),
            MemoryConfig::default(),
        ));
        let ranker = Arc::new(ContextRanker::new(
            store,
            embedder,
            Arc::clone(&long_term),
            MemoryConfig::default(),
        ));
        let session = Arc::new(SessionMemory::new(conn, 6, 3600));
        let provider = Arc::new(MockProvider::with_responses(
            responses.into_iter().map(String::from).collect(),
        ));
        let pipeline = Arc::new(CoachPipeline::new(
            session, ranker, long_term, provider, 1024,
        ));
        router(GatewayState { pipeline })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn coach_endpoint_returns_reply() {
        let app = test_router(vec!["Keep at it -- try one small project this week."]).await;

        let response = app
            .oneshot(
                Request::post("/v1/coach")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"user_id": "u1", "message": "how do I stay on track"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"], "Keep at it -- try one small project this week.");
    }

    #[tokio::test]
    async fn empty_message_is_a_bad_request() {
        let app = test_router(vec![]).await;

        let response = app
            .oneshot(
                Request::post("/v1/coach")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"user_id": "u1", "message": "   "}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "message cannot be empty");
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = test_router(vec![]).await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }
}
