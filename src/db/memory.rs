// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory record store.
//!
//! Backs game storage while signed out and doubles as the store for most
//! tests. Merge semantics match the Firestore store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::db::RecordStore;
use crate::error::AppError;
use crate::models::{GameRecord, ProfilePatch, UserProfile};
use crate::time_utils::now_rfc3339;

/// Record store held entirely in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<DashMap<String, UserProfile>>,
    games: Arc<DashMap<String, GameRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored game record by ID, if present.
    pub fn game(&self, game_id: &str) -> Option<GameRecord> {
        self.games.get(game_id).map(|r| r.clone())
    }

    /// Number of stored game records.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Stored profile record by user ID, if present.
    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).map(|p| p.clone())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, AppError> {
        let mut profile = self
            .profiles
            .get(user_id)
            .map(|p| p.clone())
            .unwrap_or_else(|| UserProfile::new(user_id));

        profile.apply(patch);
        profile.updated_at = now_rfc3339();
        self.profiles.insert(user_id.to_string(), profile.clone());

        Ok(profile)
    }

    async fn put_game(&self, record: &GameRecord) -> Result<(), AppError> {
        self.games.insert(record.game_id.clone(), record.clone());
        Ok(())
    }
}
