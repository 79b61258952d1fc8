// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the single [`crate::Database`] writer.

pub mod chats;
pub mod user_chats;
pub mod videos;
