// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social graph provider seam (friends list + local player identity).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FriendRef;

/// The device-authenticated social-graph player.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPlayer {
    /// Stable social-graph player ID
    pub player_id: String,
    /// Short handle chosen by the player
    pub alias: String,
    /// Name shown to other players
    pub display_name: String,
}

/// Social graph provider. Implemented by the UI shell; mocked in tests.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Authenticate the local player and return their identity.
    async fn local_player(&self) -> Result<LocalPlayer>;

    /// Friends of the local player, for the game-invite picker.
    async fn list_friends(&self) -> Result<Vec<FriendRef>>;
}
