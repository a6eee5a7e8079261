// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform identity provider seam.
//!
//! The crate consumes an identity provider but never implements a real one;
//! the UI shell supplies the platform adapter. Tests supply mocks.

use async_trait::async_trait;

use crate::error::Result;

/// Provider's verdict on a previously issued user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// The credential is still valid
    Authorized,
    /// The user revoked access; local credentials must be dropped
    Revoked,
    /// The provider has no record of the identifier
    NotFound,
    /// The provider could not classify the credential
    Unknown,
}

/// Payload of a successful platform sign-in.
///
/// Name and email are only present the first time a user ever authorizes
/// the app; later sign-ins return just the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityCredential {
    /// Stable user identifier
    pub user_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl IdentityCredential {
    /// Credential carrying only the identifier (any later sign-in).
    pub fn bare(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            full_name: None,
            email: None,
        }
    }
}

/// Platform identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check whether a cached user identifier is still authorized.
    async fn credential_state(&self, user_id: &str) -> Result<CredentialState>;
}
