// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/coach and GET /health.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use mentora_core::MentoraError;

use crate::server::GatewayState;

/// Request body for POST /v1/coach.
#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    /// Unique user identifier.
    pub user_id: String,
    /// The user's message.
    pub message: String,
}

/// Response body for POST /v1/coach.
#[derive(Debug, Serialize)]
pub struct CoachResponse {
    /// Generated coaching reply.
    pub reply: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// POST /v1/coach
///
/// Runs one turn through the coach pipeline. An empty message is the only
/// user-facing rejection (400); the pipeline absorbs every other failure
/// into the reply itself, so 500 is a should-not-happen fallback.
pub async fn post_coach(
    State(state): State<GatewayState>,
    Json(body): Json<CoachRequest>,
) -> Response {
    match state.pipeline.handle_turn(&body.user_id, &body.message).await {
        Ok(reply) => (StatusCode::OK, Json(CoachResponse { reply })).into_response(),
        Err(err @ MentoraError::EmptyMessage) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "coach turn failed unexpectedly");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
