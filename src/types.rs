use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Opaque ID types for type safety
pub type GameId = String;
pub type PlayerName = String;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 20;
pub const DEFAULT_PLAYERS: usize = 5;
pub const MIN_IMPOSTERS: usize = 1;

/// Secret item used when no catalog has any entries
pub const DEFAULT_SECRET_ITEM: &str = "Mystery Item";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStage {
    Configuring,
    Revealing,
    Ready,
    Playing,
}

/// A player's status during an active round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: PlayerName,
    pub is_imposter: bool,
    pub is_eliminated: bool,
    pub role_revealed_on_elimination: bool,
}

/// Resolved configuration for one game. Immutable once a round begins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfiguration {
    pub category: String,
    pub player_count: usize,
    pub imposter_count: usize,
    pub reveal_eliminated_role: bool,
    pub player_names: Vec<PlayerName>,
    pub imposter_names: BTreeSet<PlayerName>,
}

impl GameConfiguration {
    pub fn is_imposter(&self, name: &str) -> bool {
        self.imposter_names.contains(name)
    }
}

/// Entry in the persistent player registry. Only visible entries take part in a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredPlayer {
    pub name: PlayerName,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Last-used setup values, restored at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    #[serde(default = "default_imposter_count")]
    pub imposter_count: usize,
    #[serde(default)]
    pub reveal_eliminated_role: bool,
}

fn default_category() -> String {
    crate::catalog::DEFAULT_CATEGORY.to_string()
}

fn default_player_count() -> usize {
    DEFAULT_PLAYERS
}

fn default_imposter_count() -> usize {
    MIN_IMPOSTERS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category: default_category(),
            player_count: DEFAULT_PLAYERS,
            imposter_count: MIN_IMPOSTERS,
            reveal_eliminated_role: false,
        }
    }
}
