// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scorekeeper_core::cache::CredentialCache;
use scorekeeper_core::db::{FirestoreStore, MemoryStore, RecordStore};
use scorekeeper_core::error::AppError;
use scorekeeper_core::models::{FriendRef, GameRecord, ProfilePatch, Session, UserProfile};
use scorekeeper_core::services::{
    CredentialState, IdentityProvider, LocalPlayer, SessionHandle, SessionService, SocialGraph,
};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test store talking to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create an offline store (no backing client).
#[allow(dead_code)]
pub fn offline_store() -> FirestoreStore {
    FirestoreStore::new_mock()
}

/// Route worker logs through the test harness. Honors RUST_LOG.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─── Mock adapters ───────────────────────────────────────────────

/// Identity provider answering every credential check with a scripted
/// verdict.
pub struct MockIdentity {
    verdict: Mutex<Result<CredentialState, String>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockIdentity {
    pub fn verdict(state: CredentialState) -> Arc<Self> {
        Arc::new(Self {
            verdict: Mutex::new(Ok(state)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn authorized() -> Arc<Self> {
        Self::verdict(CredentialState::Authorized)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            verdict: Mutex::new(Err(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn credential_state(&self, _user_id: &str) -> Result<CredentialState, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.verdict.lock().unwrap() {
            Ok(state) => Ok(*state),
            Err(message) => Err(AppError::Identity(message.clone())),
        }
    }
}

/// Record store wrapping [`MemoryStore`] with call counters, failure
/// switches, and an optional artificial fetch delay for shaking out
/// completion-ordering races.
pub struct MockStore {
    inner: MemoryStore,
    fetch_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    put_game_calls: AtomicUsize,
    fail_fetch: Mutex<Option<String>>,
    fail_upsert: Mutex<Option<String>>,
    fail_put_game: Mutex<Option<String>>,
    fetch_delay: Mutex<Duration>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            fetch_calls: AtomicUsize::new(0),
            upsert_calls: AtomicUsize::new(0),
            put_game_calls: AtomicUsize::new(0),
            fail_fetch: Mutex::new(None),
            fail_upsert: Mutex::new(None),
            fail_put_game: Mutex::new(None),
            fetch_delay: Mutex::new(Duration::ZERO),
        })
    }

    /// Pre-populate a profile record.
    pub async fn seed_profile(&self, user_id: &str, patch: ProfilePatch) {
        self.inner.upsert_profile(user_id, &patch).await.unwrap();
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.inner.profile(user_id)
    }

    pub fn game(&self, game_id: &str) -> Option<GameRecord> {
        self.inner.game(game_id)
    }

    pub fn game_count(&self) -> usize {
        self.inner.game_count()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn put_game_count(&self) -> usize {
        self.put_game_calls.load(Ordering::SeqCst)
    }

    /// Make every profile fetch fail with a store error.
    pub fn fail_fetches(&self, message: &str) {
        *self.fail_fetch.lock().unwrap() = Some(message.to_string());
    }

    /// Make every profile upsert fail with a store error.
    pub fn fail_upserts(&self, message: &str) {
        *self.fail_upsert.lock().unwrap() = Some(message.to_string());
    }

    /// Make every game write fail with a store error.
    pub fn fail_game_puts(&self, message: &str) {
        *self.fail_put_game.lock().unwrap() = Some(message.to_string());
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        *self.fail_fetch.lock().unwrap() = None;
        *self.fail_upsert.lock().unwrap() = None;
        *self.fail_put_game.lock().unwrap() = None;
    }

    /// Delay every profile fetch, so a sign-out can overtake one in flight.
    pub fn delay_fetches(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.fail_fetch.lock().unwrap().clone() {
            return Err(AppError::Store(message));
        }

        self.inner.fetch_profile(user_id).await
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, AppError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_upsert.lock().unwrap().clone() {
            return Err(AppError::Store(message));
        }

        self.inner.upsert_profile(user_id, patch).await
    }

    async fn put_game(&self, record: &GameRecord) -> Result<(), AppError> {
        self.put_game_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_put_game.lock().unwrap().clone() {
            return Err(AppError::Store(message));
        }

        self.inner.put_game(record).await
    }
}

/// Social graph with a scripted local player and friends list.
pub struct MockSocial {
    player: Mutex<Result<LocalPlayer, String>>,
    friends: Mutex<Vec<FriendRef>>,
    player_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockSocial {
    pub fn with_player(player: LocalPlayer) -> Arc<Self> {
        Arc::new(Self {
            player: Mutex::new(Ok(player)),
            friends: Mutex::new(Vec::new()),
            player_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            player: Mutex::new(Err(message.to_string())),
            friends: Mutex::new(Vec::new()),
            player_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_friends(&self, friends: Vec<FriendRef>) {
        *self.friends.lock().unwrap() = friends;
    }

    pub fn player_call_count(&self) -> usize {
        self.player_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SocialGraph for MockSocial {
    async fn local_player(&self) -> Result<LocalPlayer, AppError> {
        self.player_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.player.lock().unwrap() {
            Ok(player) => Ok(player.clone()),
            Err(message) => Err(AppError::Social(message.clone())),
        }
    }

    async fn list_friends(&self) -> Result<Vec<FriendRef>, AppError> {
        Ok(self.friends.lock().unwrap().clone())
    }
}

/// Credential cache held in memory.
pub struct MockCache {
    value: Mutex<Option<String>>,
    fail_load: Mutex<Option<String>>,
    store_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockCache {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(None),
            fail_load: Mutex::new(None),
            store_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
        })
    }

    pub fn holding(user_id: &str) -> Arc<Self> {
        let cache = Self::empty();
        *cache.value.lock().unwrap() = Some(user_id.to_string());
        cache
    }

    pub fn cached(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    pub fn fail_loads(&self, message: &str) {
        *self.fail_load.lock().unwrap() = Some(message.to_string());
    }

    pub fn store_count(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialCache for MockCache {
    async fn load(&self) -> Result<Option<String>, AppError> {
        if let Some(message) = self.fail_load.lock().unwrap().clone() {
            return Err(AppError::Cache(message));
        }
        Ok(self.value.lock().unwrap().clone())
    }

    async fn store(&self, user_id: &str) -> Result<(), AppError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().unwrap() = Some(user_id.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().unwrap() = None;
        Ok(())
    }
}

// ─── Session harness ─────────────────────────────────────────────

/// A spawned session worker together with the mocks behind it.
#[allow(dead_code)]
pub struct SessionHarness {
    pub handle: SessionHandle,
    pub identity: Arc<MockIdentity>,
    pub store: Arc<MockStore>,
    pub social: Arc<MockSocial>,
    pub cache: Arc<MockCache>,
}

/// Spawn a session worker wired to the given mocks.
#[allow(dead_code)]
pub fn spawn_session(
    identity: Arc<MockIdentity>,
    store: Arc<MockStore>,
    social: Arc<MockSocial>,
    cache: Arc<MockCache>,
) -> SessionHarness {
    let handle = SessionService::spawn(
        identity.clone(),
        store.clone(),
        social.clone(),
        cache.clone(),
    );
    SessionHarness {
        handle,
        identity,
        store,
        social,
        cache,
    }
}

/// Harness with the common defaults: authorized identity, empty store,
/// a local player named Casey, empty cache.
#[allow(dead_code)]
pub fn default_session() -> SessionHarness {
    spawn_session(
        MockIdentity::authorized(),
        MockStore::new(),
        MockSocial::with_player(test_player()),
        MockCache::empty(),
    )
}

/// The stock local player used across tests.
#[allow(dead_code)]
pub fn test_player() -> LocalPlayer {
    LocalPlayer {
        player_id: "G:1001".to_string(),
        alias: "casey_plays".to_string(),
        display_name: "Casey".to_string(),
    }
}

/// Wait until the published session satisfies `predicate`, panicking after
/// two seconds. Returns the matching snapshot.
#[allow(dead_code)]
pub async fn wait_for_session<F>(handle: &SessionHandle, predicate: F) -> Session
where
    F: FnMut(&Session) -> bool,
{
    let mut rx = handle.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("Timed out waiting for a session update")
        .expect("Session worker dropped its publisher");
    snapshot.clone()
}

/// Poll until `condition` holds, panicking after two seconds. For effects
/// observed outside the session snapshot (store contents, call counts).
#[allow(dead_code)]
pub async fn wait_until<F>(condition: F)
where
    F: Fn() -> bool,
{
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Timed out waiting for condition");
}

/// Give in-flight worker messages a chance to drain, for asserting that
/// something did NOT happen.
#[allow(dead_code)]
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(80)).await;
}
