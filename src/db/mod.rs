//! Record store layer (Firestore-backed, plus an in-memory store).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GameRecord, ProfilePatch, UserProfile};

/// Collection names as constants.
pub mod collections {
    /// User profiles (keyed by identity-provider user ID)
    pub const PROFILES: &str = "user_profiles";
    /// Submitted games (keyed by draft ID)
    pub const GAMES: &str = "games";
}

/// Per-user remote record store.
///
/// Implementations are scoped to the authenticated user by the backing
/// deployment; keys are plain document IDs within that scope.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the profile record for a user. A missing record is `Ok(None)`,
    /// never an error.
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Read-modify-write upsert: fields named by the patch are written onto
    /// the stored record (created fresh when missing); every other stored
    /// field is preserved. Returns the merged record.
    async fn upsert_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<UserProfile>;

    /// Create or replace a game record under its own key.
    async fn put_game(&self, record: &GameRecord) -> Result<()>;
}
