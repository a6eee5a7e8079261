// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: the single owner of session state.
//!
//! All session mutation happens on one worker task:
//! 1. Commands from the UI shell arrive over a bounded channel
//! 2. Adapter calls (identity, store, social) are spawned off the worker
//! 3. Their completions are posted back onto the same queue, tagged with
//!    the session epoch current when the call was issued
//! 4. The worker applies each message and publishes a whole-snapshot update
//!
//! Sign-out (and each new sign-in) bumps the epoch, so a completion issued
//! for an earlier session identity is discarded instead of repopulating a
//! signed-out session or leaking one user's profile into the next.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::cache::{CredentialCache, FileCredentialCache};
use crate::config::Config;
use crate::db::{FirestoreStore, RecordStore};
use crate::error::{AppError, Result};
use crate::models::profile::normalize_field;
use crate::models::{ProfileEdit, ProfilePatch, Session, UserProfile};
use crate::services::identity::{CredentialState, IdentityCredential, IdentityProvider};
use crate::services::social::{LocalPlayer, SocialGraph};

/// Command queue depth. Session traffic is human-scale.
const COMMAND_BUFFER: usize = 64;

/// Commands accepted by the session worker.
#[derive(Debug)]
enum Command {
    LoadCachedSession,
    SignIn(Result<IdentityCredential>),
    FetchProfile,
    EditProfile(ProfileEdit),
    SaveProfile,
    ConnectSocial,
    SignOut,
}

/// Adapter completions, redelivered to the worker as messages.
#[derive(Debug)]
enum Completion {
    CredentialChecked {
        user_id: String,
        result: Result<CredentialState>,
    },
    ProfileFetched(Result<Option<UserProfile>>),
    ProfileSaved(Result<UserProfile>),
    SocialLinked(Result<LocalPlayer>),
}

/// Everything the worker consumes flows through one queue, so command and
/// completion ordering is total.
#[derive(Debug)]
enum Msg {
    Command(Command),
    Completion { epoch: u64, completion: Completion },
}

/// Cloneable handle to the session worker.
///
/// Commands are fire-and-forget; outcomes are observed through the session
/// snapshot (see [`SessionHandle::subscribe`]).
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Msg>,
    state: watch::Receiver<Session>,
}

impl SessionHandle {
    /// The current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// A receiver observing every published snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.clone()
    }

    /// Read the credential cache and revalidate any cached identifier.
    pub async fn load_cached_session(&self) {
        self.send(Command::LoadCachedSession).await;
    }

    /// Deliver the platform sign-in result.
    pub async fn sign_in(&self, result: Result<IdentityCredential>) {
        self.send(Command::SignIn(result)).await;
    }

    /// Fetch the profile record for the signed-in user.
    pub async fn fetch_profile(&self) {
        self.send(Command::FetchProfile).await;
    }

    /// Apply UI edits to the in-memory profile fields.
    pub async fn edit_profile(&self, edit: ProfileEdit) {
        self.send(Command::EditProfile(edit)).await;
    }

    /// Persist the in-memory profile fields.
    pub async fn save_profile(&self) {
        self.send(Command::SaveProfile).await;
    }

    /// Social-graph sign-in (alias and display-name acquisition).
    pub async fn connect_social(&self) {
        self.send(Command::ConnectSocial).await;
    }

    /// Sign out and clear the credential cache.
    pub async fn sign_out(&self) {
        self.send(Command::SignOut).await;
    }

    async fn send(&self, command: Command) {
        if self.commands.send(Msg::Command(command)).await.is_err() {
            tracing::warn!("Session worker is gone; command dropped");
        }
    }
}

/// The session worker: owns the only mutable copy of [`Session`].
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn RecordStore>,
    social: Arc<dyn SocialGraph>,
    cache: Arc<dyn CredentialCache>,
    state: Session,
    /// Bumped on sign-out and on each new sign-in; stale completions are
    /// dropped by comparing against it.
    epoch: u64,
    publisher: watch::Sender<Session>,
    internal: mpsc::Sender<Msg>,
}

impl SessionService {
    /// Spawn the session worker and return a handle to it.
    ///
    /// The worker lives for the lifetime of the runtime.
    pub fn spawn(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        social: Arc<dyn SocialGraph>,
        cache: Arc<dyn CredentialCache>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (publisher, state) = watch::channel(Session::default());

        let service = Self {
            identity,
            store,
            social,
            cache,
            state: Session::default(),
            epoch: 0,
            publisher,
            internal: tx.clone(),
        };
        tokio::spawn(service.run(rx));

        SessionHandle {
            commands: tx,
            state,
        }
    }

    /// Spawn the worker over the production adapters.
    ///
    /// The record store and credential cache are built from `config`; the
    /// identity provider and social graph come from the platform layer.
    pub async fn spawn_from_config(
        config: &Config,
        identity: Arc<dyn IdentityProvider>,
        social: Arc<dyn SocialGraph>,
    ) -> Result<SessionHandle> {
        let store = Arc::new(FirestoreStore::new(&config.gcp_project_id).await?);
        let cache = Arc::new(FileCredentialCache::from_config(config)?);
        Ok(Self::spawn(identity, store, social, cache))
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Msg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                Msg::Command(command) => self.handle_command(command).await,
                Msg::Completion { epoch, completion } => {
                    if epoch == self.epoch {
                        self.handle_completion(completion).await;
                    } else {
                        tracing::debug!(
                            stale_epoch = epoch,
                            current_epoch = self.epoch,
                            "Discarding stale adapter completion"
                        );
                    }
                }
            }
            self.publish();
        }
    }

    /// Publish the state to observers when it actually changed.
    fn publish(&self) {
        self.publisher.send_if_modified(|current| {
            if *current == self.state {
                false
            } else {
                *current = self.state.clone();
                true
            }
        });
    }

    /// Spawn an adapter call; its completion is posted back onto the worker
    /// queue tagged with the epoch current right now.
    fn spawn_completion<F>(&self, call: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.internal.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let completion = call.await;
            // The worker only disappears at runtime shutdown.
            let _ = tx.send(Msg::Completion { epoch, completion }).await;
        });
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::LoadCachedSession => self.load_cached_session().await,
            Command::SignIn(result) => self.sign_in(result).await,
            Command::FetchProfile => self.request_profile_fetch(),
            Command::EditProfile(edit) => self.edit_profile(edit),
            Command::SaveProfile => self.request_profile_save(),
            Command::ConnectSocial => self.connect_social(),
            Command::SignOut => self.sign_out().await,
        }
    }

    async fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::CredentialChecked { user_id, result } => {
                self.apply_credential_state(user_id, result).await;
            }
            Completion::ProfileFetched(result) => self.apply_profile_fetch(result),
            Completion::ProfileSaved(result) => self.apply_profile_save(result),
            Completion::SocialLinked(result) => self.apply_social_link(result),
        }
    }

    // ─── Commands ────────────────────────────────────────────────

    /// Startup path: look for a cached identifier and revalidate it.
    async fn load_cached_session(&mut self) {
        match self.cache.load().await {
            Ok(Some(user_id)) => {
                tracing::info!(user_id = %user_id, "Found cached credential, checking state");
                let identity = Arc::clone(&self.identity);
                self.spawn_completion(async move {
                    let result = identity.credential_state(&user_id).await;
                    Completion::CredentialChecked { user_id, result }
                });
            }
            Ok(None) => {
                tracing::debug!("No cached credential; staying signed out");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read credential cache");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Consume the platform sign-in result.
    async fn sign_in(&mut self, result: Result<IdentityCredential>) {
        let credential = match result {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                self.state.last_error = Some(e.to_string());
                return;
            }
        };

        // A new identity starts a new epoch: nothing still in flight for
        // the previous one may land on this session.
        self.epoch += 1;
        self.state.user_id = Some(credential.user_id.clone());

        // 1. Cache the identifier for the next launch.
        if let Err(e) = self.cache.store(&credential.user_id).await {
            tracing::warn!(error = %e, "Failed to cache credential");
        }

        // 2. The provider hands out name/email only on the first-ever
        //    authorization. When present, adopt and persist them; otherwise
        //    the stored record is the source of truth.
        let full_name = normalize_field(credential.full_name);
        let email = normalize_field(credential.email);
        let first_authorization = full_name.is_some() || email.is_some();

        if let Some(name) = full_name {
            self.state.full_name = Some(name);
        }
        if let Some(email) = email {
            self.state.email = Some(email);
        }

        if first_authorization {
            self.state.needs_profile_completion = false;
            self.request_profile_save();
        } else {
            self.request_profile_fetch();
        }

        // 3. Authenticated on both branches.
        self.state.signed_in = true;
        tracing::info!(
            user_id = %credential.user_id,
            first_authorization,
            "Signed in"
        );
    }

    /// Kick off a background profile fetch for the current user.
    fn request_profile_fetch(&mut self) {
        let user_id = match &self.state.user_id {
            Some(id) => id.clone(),
            None => {
                tracing::debug!("No user ID; skipping profile fetch");
                return;
            }
        };

        let store = Arc::clone(&self.store);
        self.spawn_completion(async move {
            Completion::ProfileFetched(store.fetch_profile(&user_id).await)
        });
    }

    /// Apply UI edits to the in-memory profile fields. Blank input clears
    /// the field.
    fn edit_profile(&mut self, edit: ProfileEdit) {
        if let Some(name) = edit.full_name {
            self.state.full_name = normalize_field(Some(name));
        }
        if let Some(email) = edit.email {
            self.state.email = normalize_field(Some(email));
        }
        if let Some(alias) = edit.alias {
            self.state.alias = normalize_field(Some(alias));
        }
    }

    /// Kick off a background save of the in-memory profile fields.
    fn request_profile_save(&mut self) {
        let user_id = match &self.state.user_id {
            Some(id) => id.clone(),
            None => {
                tracing::warn!("Profile save requested without a user ID");
                self.state.last_error = Some(AppError::NotSignedIn.to_string());
                return;
            }
        };

        let patch = ProfilePatch {
            full_name: self.state.full_name.clone(),
            email: self.state.email.clone(),
            alias: self.state.alias.clone(),
        };
        // A patch naming no fields would store an empty record and mark the
        // profile complete; there is nothing to persist.
        if patch.is_empty() {
            tracing::debug!("No profile fields set; skipping save");
            return;
        }

        let store = Arc::clone(&self.store);
        self.spawn_completion(async move {
            Completion::ProfileSaved(store.upsert_profile(&user_id, &patch).await)
        });
    }

    /// Social-graph sign-in.
    fn connect_social(&mut self) {
        let social = Arc::clone(&self.social);
        self.spawn_completion(async move { Completion::SocialLinked(social.local_player().await) });
    }

    /// Sign out: new epoch, cleared cache, default state.
    async fn sign_out(&mut self) {
        // 1. Invalidate anything still in flight.
        self.epoch += 1;

        // 2. Drop the durable credential.
        if let Err(e) = self.cache.clear().await {
            tracing::warn!(error = %e, "Failed to clear credential cache");
        }

        // 3. Blank the in-memory session. Observers see one snapshot change.
        self.state = Session::default();

        tracing::info!("Signed out");
    }

    // ─── Completions ─────────────────────────────────────────────

    /// Cached-credential revalidation verdict.
    async fn apply_credential_state(&mut self, user_id: String, result: Result<CredentialState>) {
        match result {
            Ok(CredentialState::Authorized) => {
                tracing::info!(user_id = %user_id, "Cached credential still authorized");
                self.state.user_id = Some(user_id);
                self.state.signed_in = true;
                self.request_profile_fetch();
            }
            Ok(CredentialState::Revoked) | Ok(CredentialState::NotFound) => {
                tracing::info!(user_id = %user_id, "Credential no longer valid, signing out");
                self.sign_out().await;
            }
            Ok(CredentialState::Unknown) => {
                tracing::debug!(user_id = %user_id, "Credential state unknown; leaving session untouched");
            }
            Err(e) => {
                // The cached identifier is kept so the next launch can retry.
                tracing::warn!(error = %e, "Credential state check failed");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Fetched profile record (or its absence).
    fn apply_profile_fetch(&mut self, result: Result<Option<UserProfile>>) {
        match result {
            Ok(Some(profile)) => {
                // The stored record is authoritative, including absent fields.
                self.state.full_name = profile.full_name;
                self.state.email = profile.email;
                self.state.alias = profile.alias;
                self.state.needs_profile_completion = self.state.profile_is_blank();
                tracing::debug!("Profile record adopted");
            }
            Ok(None) => {
                // First run: no record yet. Not an error.
                tracing::info!("No profile record; completion needed");
                self.state.needs_profile_completion = true;
            }
            Err(e) => {
                // Keep whatever fields we already have.
                tracing::warn!(error = %e, "Profile fetch failed");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Saved profile record.
    fn apply_profile_save(&mut self, result: Result<UserProfile>) {
        match result {
            Ok(profile) => {
                tracing::info!(user_id = %profile.user_id, "Profile saved");
                self.state.needs_profile_completion = false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile save failed");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Social-graph sign-in outcome.
    fn apply_social_link(&mut self, result: Result<LocalPlayer>) {
        match result {
            Ok(player) => {
                tracing::info!(
                    player_id = %player.player_id,
                    alias = %player.alias,
                    "Social player linked"
                );
                self.state.alias = Some(player.alias);
                // The social display name is authoritative for the profile
                // name field.
                self.state.full_name = Some(player.display_name);
                if self.state.signed_in {
                    self.state.needs_profile_completion = false;
                    self.request_profile_save();
                }
            }
            Err(e) => {
                // Not fatal: the session continues without social features.
                tracing::warn!(error = %e, "Social sign-in failed");
            }
        }
    }
}
