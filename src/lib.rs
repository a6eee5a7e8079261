// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! ScoreKeeper core: session and game-setup engine.
//!
//! The platform-independent core of a score-tracking app for card and
//! board games. It owns the signed-in session (driven through a message
//! worker, observed as snapshots) and the game draft model, behind adapter
//! seams for the platform identity provider, the per-user record store,
//! the social graph, and the local credential cache.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
