//! User profile records and field-level save semantics.
//!
//! Saves go through [`ProfilePatch`] so a writer only ever touches the
//! fields it explicitly names; everything else on the stored record is
//! preserved.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// User profile stored in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider user ID (also used as document ID)
    pub user_id: String,
    /// Display name (may be None until the profile is completed)
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email address (may be None if never shared)
    #[serde(default)]
    pub email: Option<String>,
    /// Social-graph alias
    #[serde(default)]
    pub alias: Option<String>,
    /// When the profile record was first created
    pub created_at: String,
    /// Last write timestamp
    pub updated_at: String,
}

impl UserProfile {
    /// Fresh record for a user with no stored profile yet.
    pub fn new(user_id: &str) -> Self {
        let now = now_rfc3339();
        Self {
            user_id: user_id.to_string(),
            full_name: None,
            email: None,
            alias: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Overlay a patch onto this record. Only fields the patch names are
    /// written; `None` always means "leave the stored value alone".
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.full_name {
            self.full_name = Some(name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(alias) = &patch.alias {
            self.alias = Some(alias.clone());
        }
    }
}

/// Explicit set of profile fields to write on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub alias: Option<String>,
}

impl ProfilePatch {
    /// True when the patch names no fields at all.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.alias.is_none()
    }
}

/// In-memory profile edits from the UI. Each `Some` field replaces the
/// session's in-memory value; blank input normalizes to absent.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub alias: Option<String>,
}

/// Trim a UI- or provider-supplied value, dropping it entirely when blank.
pub fn normalize_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
