//! Session snapshot observed by the UI shell.

use serde::Serialize;

/// In-memory session state, published to observers as a whole snapshot.
///
/// `Default` is the fully signed-out state: no identifier, no profile
/// fields, both flags off, no error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    /// Stable user identifier from the identity provider
    pub user_id: Option<String>,
    /// Display name (may be None until the profile is completed)
    pub full_name: Option<String>,
    /// Email address (may be None if never shared)
    pub email: Option<String>,
    /// Social-graph alias
    pub alias: Option<String>,
    /// Whether the user is currently authenticated
    pub signed_in: bool,
    /// True when authenticated but neither a name nor an email is resolvable
    pub needs_profile_completion: bool,
    /// Most recent user-displayable error, if any
    pub last_error: Option<String>,
}

impl Session {
    /// True when neither a display name nor an email is resolvable.
    pub fn profile_is_blank(&self) -> bool {
        self.full_name.is_none() && self.email.is_none()
    }
}
