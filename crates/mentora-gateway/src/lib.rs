// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Mentora coach backend.
//!
//! A thin axum surface over [`mentora_agent::CoachPipeline`]: one coaching
//! endpoint plus a health probe. Authentication and multi-tenant concerns
//! live outside this service.

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};
