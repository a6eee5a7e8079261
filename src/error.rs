// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared across adapters and services.

/// Application error type. Adapter failures are stringified at the seam so
/// the session layer can surface a single display message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Social graph error: {0}")]
    Social(String),

    #[error("Credential cache error: {0}")]
    Cache(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid game draft: {0}")]
    InvalidDraft(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors raised by the remote record store.
    pub fn is_store_error(&self) -> bool {
        matches!(self, AppError::Store(_))
    }
}

/// Result type alias for fallible operations
pub type Result<T> = std::result::Result<T, AppError>;
