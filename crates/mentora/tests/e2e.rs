// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Mentora pipeline.
//!
//! Each test wires the full stack -- SQLite memory subsystem, mock
//! provider/embedder, coach pipeline, HTTP gateway router -- with an
//! isolated in-memory database. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use mentora_agent::CoachPipeline;
use mentora_config::model::MemoryConfig;
use mentora_core::EmbeddingAdapter;
use mentora_gateway::{router, GatewayState};
use mentora_memory::{
    apply_schema, ContextRanker, LongTermMemory, SessionMemory, VectorStore,
};
use mentora_test_utils::{MockEmbedder, MockProvider};
use tokio_rusqlite::Connection;
use tower::ServiceExt;

const DIM: usize = 32;

struct Harness {
    app: axum::Router,
    session: Arc<SessionMemory>,
    long_term: Arc<LongTermMemory>,
    provider: Arc<MockProvider>,
}

async fn harness(responses: Vec<&str>) -> Harness {
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
        Arc::clone(&session),
        ranker,
        Arc::clone(&long_term),
        provider.clone(),
        1024,
    ));

    Harness {
        app: router(GatewayState { pipeline }),
        session,
        long_term,
        provider,
    }
}

async fn post_coach(app: &axum::Router, user_id: &str, message: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post("/v1/coach")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"user_id": user_id, "message": message}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

const COACH_REPLY: &str =
    "Backend development is a great goal -- start with one small API this week.";

#[tokio::test]
async fn coach_round_trip_returns_reply_over_http() {
    let h = harness(vec![COACH_REPLY, r#"["wants to learn backend development"]"#]).await;

    let (status, body) = post_coach(&h.app, "u1", "I want to learn backend development").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], COACH_REPLY);
}

#[tokio::test]
async fn substantive_exchange_commits_fact_exactly_once() {
    let h = harness(vec![
        COACH_REPLY,
        r#"["wants to learn backend development"]"#,
        COACH_REPLY,
        r#"["wants to learn backend development"]"#,
    ])
    .await;

    post_coach(&h.app, "u1", "I want to learn backend development").await;

    let summaries = h.long_term.get_summaries("u1").await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].text, "wants to learn backend development");

    // The same message on a later turn does not duplicate the fact.
    post_coach(&h.app, "u1", "I want to learn backend development").await;
    assert_eq!(h.long_term.get_summaries("u1").await.len(), 1);
}

#[tokio::test]
async fn session_window_keeps_only_newest_turns() {
    let mut responses = Vec::new();
    for _ in 0..4 {
        // Short replies keep the summarize gate closed without draining
        // the response queue into extraction calls.
        responses.push("Noted.");
    }
    let h = harness(responses).await;

    for i in 0..4 {
        post_coach(&h.app, "u1", &format!("tell me about step number {i}")).await;
    }

    // 8 turns were written; only the newest 6 survive the ring.
    let turns = h.session.get_recent("u1").await;
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[0].text, "tell me about step number 1");
    assert_eq!(turns[4].text, "tell me about step number 3");
    assert_eq!(turns[5].text, "Noted.");
}

#[tokio::test]
async fn empty_message_is_rejected_with_no_side_effects() {
    let h = harness(vec![]).await;

    let (status, body) = post_coach(&h.app, "u1", "   ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message cannot be empty");
    assert!(h.session.get_recent("u1").await.is_empty());
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn trivial_exchange_stays_out_of_long_term_memory() {
    let h = harness(vec![
        "A perfectly long and substantive assistant reply, well over the bar.",
    ])
    .await;

    let (status, _) = post_coach(&h.app, "u1", "ok").await;

    assert_eq!(status, StatusCode::OK);
    assert!(h.long_term.get_summaries("u1").await.is_empty());
}

#[tokio::test]
async fn generator_failure_still_answers_and_records_the_placeholder() {
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
    let pipeline = Arc::new(CoachPipeline::new(
        Arc::clone(&session),
        ranker,
        long_term,
        Arc::new(MockProvider::failing()),
        1024,
    ));
    let app = router(GatewayState { pipeline });

    let (status, body) = post_coach(&app, "u1", "please help me plan my study schedule").await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.starts_with("[LLM ERROR]"));

    // The session recorded what the user saw.
    let turns = session.get_recent("u1").await;
    assert_eq!(turns.len(), 2);
    assert!(turns[1].text.starts_with("[LLM ERROR]"));
}
