// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory subsystem for the Mentora coach backend.
//!
//! Combines three layers into the context a coaching reply is built from:
//!
//! - **SessionMemory**: per-user bounded, sliding-TTL recent-turns buffer
//! - **LongTermMemory**: durable fact store with dedup, capacity eviction,
//!   and cosine-similarity retrieval over a [`VectorStore`]
//! - **ContextRanker**: merges predefined knowledge and per-user memory
//!   into one ranked list
//!
//! All mutable state lives in the backing SQLite store; the structs here
//! are cheap handles safe to share across request tasks.

pub mod long_term;
pub mod ranker;
pub mod schema;
pub mod session;
pub mod types;
pub mod vector_store;

pub use long_term::LongTermMemory;
pub use ranker::ContextRanker;
pub use schema::apply_schema;
pub use session::SessionMemory;
pub use types::*;
pub use vector_store::{NewVector, ScoredPoint, StoredVector, VectorStore};
