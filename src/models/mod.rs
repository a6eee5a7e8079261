// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod game;
pub mod profile;
pub mod session;

pub use game::{BoardKind, CardKind, FriendRef, GameCategory, GameDraft, GameRecord};
pub use profile::{ProfileEdit, ProfilePatch, UserProfile};
pub use session::Session;
