// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable credential cache.
//!
//! Holds exactly one entry: the identity-provider user ID of the last
//! signed-in user. Read once at startup, written on sign-in, removed on
//! sign-out.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::time_utils::now_rfc3339;

/// File name of the single cache entry.
const CREDENTIAL_FILE: &str = "credential.json";

/// Durable store for the cached user identifier.
#[async_trait]
pub trait CredentialCache: Send + Sync {
    /// The cached user ID, if one is stored.
    async fn load(&self) -> Result<Option<String>>;

    /// Store the user ID, replacing any previous entry.
    async fn store(&self, user_id: &str) -> Result<()>;

    /// Remove the entry. Clearing an absent entry is not an error.
    async fn clear(&self) -> Result<()>;
}

/// On-disk form of the cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CachedCredential {
    user_id: String,
    stored_at: String,
}

/// File-backed credential cache.
pub struct FileCredentialCache {
    path: PathBuf,
}

impl FileCredentialCache {
    /// Cache rooted at the given directory, which is created if missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::Cache(format!("Failed to create cache directory: {}", e)))?;

        Ok(Self {
            path: dir.join(CREDENTIAL_FILE),
        })
    }

    /// Cache at the default location (`~/.scorekeeper`).
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| AppError::Cache("Failed to get home directory".to_string()))?;
        Self::new(home_dir.join(".scorekeeper"))
    }

    /// Cache honoring the configured directory override.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.cache_dir {
            Some(dir) => Self::new(dir),
            None => Self::default_location(),
        }
    }
}

#[async_trait]
impl CredentialCache for FileCredentialCache {
    async fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Cache(format!("Failed to read credential cache: {}", e)))?;
        let cached: CachedCredential = serde_json::from_str(&content)
            .map_err(|e| AppError::Cache(format!("Malformed credential cache: {}", e)))?;

        Ok(Some(cached.user_id))
    }

    async fn store(&self, user_id: &str) -> Result<()> {
        let cached = CachedCredential {
            user_id: user_id.to_string(),
            stored_at: now_rfc3339(),
        };
        let content = serde_json::to_string_pretty(&cached)
            .map_err(|e| AppError::Cache(e.to_string()))?;

        fs::write(&self.path, content)
            .map_err(|e| AppError::Cache(format!("Failed to write credential cache: {}", e)))?;

        tracing::debug!(path = %self.path.display(), "Credential cached");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| AppError::Cache(format!("Failed to remove credential cache: {}", e)))?;
        }
        Ok(())
    }
}
