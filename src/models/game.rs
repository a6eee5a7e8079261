// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Game draft model and the record it submits.
//!
//! The draft is plain in-memory state owned by whoever drives game setup.
//! Its ID is minted at creation and becomes the stored record's key, so a
//! retried submit upserts the same document instead of duplicating it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::time_utils::now_rfc3339;

/// Smallest allowed player count.
pub const MIN_PLAYER_COUNT: usize = 1;
/// Largest allowed player count.
pub const MAX_PLAYER_COUNT: usize = 12;

/// Top-level game category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCategory {
    #[default]
    #[serde(rename = "Card Game")]
    Card,
    #[serde(rename = "Board Game")]
    Board,
}

impl GameCategory {
    pub fn label(self) -> &'static str {
        match self {
            GameCategory::Card => "Card Game",
            GameCategory::Board => "Board Game",
        }
    }
}

/// Card game catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Solitaire,
    Uno,
    Spades,
    #[serde(rename = "Gin Rummy")]
    GinRummy,
    #[serde(rename = "Crazy Eights")]
    CrazyEights,
}

impl CardKind {
    pub const ALL: [CardKind; 5] = [
        CardKind::Solitaire,
        CardKind::Uno,
        CardKind::Spades,
        CardKind::GinRummy,
        CardKind::CrazyEights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardKind::Solitaire => "Solitaire",
            CardKind::Uno => "Uno",
            CardKind::Spades => "Spades",
            CardKind::GinRummy => "Gin Rummy",
            CardKind::CrazyEights => "Crazy Eights",
        }
    }
}

/// Board game catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardKind {
    #[serde(rename = "Sorry!")]
    Sorry,
    Risk,
    Monopoly,
}

impl BoardKind {
    pub const ALL: [BoardKind; 3] = [BoardKind::Sorry, BoardKind::Risk, BoardKind::Monopoly];

    pub fn label(self) -> &'static str {
        match self {
            BoardKind::Sorry => "Sorry!",
            BoardKind::Risk => "Risk",
            BoardKind::Monopoly => "Monopoly",
        }
    }
}

/// Social friend reference carried on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRef {
    /// Stable social-graph player ID
    pub id: String,
    /// Name shown in the friend picker
    pub display_name: String,
}

/// In-memory draft of a game being configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GameDraft {
    /// Draft ID; becomes the stored record's document ID on submit
    pub id: Uuid,
    #[validate(length(min = 1, message = "game name is required"))]
    pub name: String,
    pub category: GameCategory,
    /// Remembered card-game selection (kept when the category switches away)
    pub card_kind: Option<CardKind>,
    /// Remembered board-game selection
    pub board_kind: Option<BoardKind>,
    #[validate(range(min = 1, max = 12))]
    pub player_count: usize,
    /// Player names; length always equals `player_count`
    pub players: Vec<String>,
    /// Whether scores are tracked as points
    pub includes_points: bool,
    /// Invited friends, insertion-ordered, unique by ID
    pub friends: Vec<FriendRef>,
}

impl GameDraft {
    /// A fresh draft with default field values and a new ID.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            category: GameCategory::default(),
            card_kind: None,
            board_kind: None,
            player_count: MIN_PLAYER_COUNT,
            players: vec![String::new()],
            includes_points: false,
            friends: Vec::new(),
        }
    }

    /// Start over: fresh ID, all fields back to defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Set the player count, clamping it between [`MIN_PLAYER_COUNT`] and
    /// [`MAX_PLAYER_COUNT`]. The name list is resized to match: existing
    /// names are preserved, new slots start empty.
    pub fn set_player_count(&mut self, count: usize) {
        let count = count.clamp(MIN_PLAYER_COUNT, MAX_PLAYER_COUNT);
        self.player_count = count;
        self.players.resize(count, String::new());
    }

    /// Remove the friend if one with the same ID is present, append it
    /// otherwise. Toggling twice restores the original list.
    pub fn toggle_friend(&mut self, friend: FriendRef) {
        if self.friends.iter().any(|f| f.id == friend.id) {
            self.friends.retain(|f| f.id != friend.id);
        } else {
            self.friends.push(friend);
        }
    }

    /// The subtype label matching the current category, if one is selected.
    pub fn subtype(&self) -> Option<&'static str> {
        match self.category {
            GameCategory::Card => self.card_kind.map(CardKind::label),
            GameCategory::Board => self.board_kind.map(BoardKind::label),
        }
    }

    /// Build the record stored on submit.
    pub fn to_record(&self, owner_id: Option<&str>) -> GameRecord {
        GameRecord {
            game_id: self.id.to_string(),
            name: self.name.clone(),
            category: self.category,
            subtype: self.subtype().map(str::to_string),
            player_count: self.player_count,
            includes_points: self.includes_points,
            players: self.players.clone(),
            friend_ids: self.friends.iter().map(|f| f.id.clone()).collect(),
            friend_names: self
                .friends
                .iter()
                .map(|f| f.display_name.clone())
                .collect(),
            owner_id: owner_id.map(str::to_string),
            created_at: now_rfc3339(),
        }
    }
}

impl Default for GameDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored game record, keyed by the originating draft's ID.
///
/// Empty collections and absent optionals are omitted from the serialized
/// form rather than written as empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Draft ID (also used as document ID)
    pub game_id: String,
    pub name: String,
    pub category: GameCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub player_count: usize,
    pub includes_points: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<String>,
    /// Invited friend IDs, parallel to `friend_names`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friend_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friend_names: Vec<String>,
    /// Submitting user, when signed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub created_at: String,
}
