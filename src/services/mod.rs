// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod games;
pub mod identity;
pub mod session;
pub mod social;

pub use games::GameService;
pub use identity::{CredentialState, IdentityCredential, IdentityProvider};
pub use session::{SessionHandle, SessionService};
pub use social::{LocalPlayer, SocialGraph};
