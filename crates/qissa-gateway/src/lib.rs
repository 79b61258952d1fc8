// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST gateway for the Qissa service.
//!
//! The dispatcher that authenticates each caller, scopes conversations to
//! their owner, and routes generation requests to the backend declared by
//! the conversation kind. Video kinds run the long-poll pipeline and can
//! hold a request open for minutes; callers are expected to tolerate
//! long-lived connections.

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::ClerkVerifier;
pub use dispatch::GenerationRouter;
pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
