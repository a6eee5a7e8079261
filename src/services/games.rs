// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Game setup service.
//!
//! Composes the record store and the social graph:
//! 1. Surface the friends list for the invite picker
//! 2. Validate finished drafts and store their records

use std::sync::Arc;

use validator::Validate;

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{FriendRef, GameDraft, GameRecord};
use crate::services::social::SocialGraph;

/// Turns game drafts into stored records.
pub struct GameService {
    store: Arc<dyn RecordStore>,
    social: Arc<dyn SocialGraph>,
}

impl GameService {
    pub fn new(store: Arc<dyn RecordStore>, social: Arc<dyn SocialGraph>) -> Self {
        Self { store, social }
    }

    /// Friends of the local player, for the invite picker.
    pub async fn friends(&self) -> Result<Vec<FriendRef>> {
        let friends = self.social.list_friends().await?;
        tracing::debug!(count = friends.len(), "Loaded friends list");
        Ok(friends)
    }

    /// Validate a draft and store its record.
    ///
    /// The record is keyed by the draft ID, so retrying after a transient
    /// failure upserts the same document instead of duplicating it. The
    /// draft itself is not mutated; callers `reset` it to start the next
    /// game.
    pub async fn submit_draft(
        &self,
        draft: &GameDraft,
        owner_id: Option<&str>,
    ) -> Result<GameRecord> {
        // 1. Validate before anything touches the store.
        draft
            .validate()
            .map_err(|e| AppError::InvalidDraft(e.to_string()))?;

        // 2. Build and store the record under the draft's ID.
        let record = draft.to_record(owner_id);
        self.store.put_game(&record).await?;

        tracing::info!(
            game_id = %record.game_id,
            name = %record.name,
            players = record.player_count,
            "Game submitted"
        );

        Ok(record)
    }
}
