// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Qissa service.
//!
//! Every external collaborator sits behind one of these traits and is
//! constructed explicitly at startup, then injected into the dispatcher.
//! All traits extend the [`Adapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod generator;
pub mod ledger;
pub mod video;

pub use adapter::Adapter;
pub use auth::IdentityVerifier;
pub use generator::TextGenerator;
pub use ledger::ChatLedger;
pub use video::VideoBackend;
