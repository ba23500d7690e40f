use crate::engine::{PlayerView, RevealPhase, RoleCard, RoundOutcome, Survivors};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    // Setup screen
    AddPlayer {
        name: String,
    },
    TogglePlayer {
        index: usize,
    },
    RemovePlayer {
        index: usize,
    },
    SetCategory {
        category: String,
    },
    SetPlayerCount {
        count: usize,
    },
    SetImposterCount {
        count: usize,
    },
    SetRevealRole {
        enabled: bool,
    },
    /// Lock in the setup, pick imposters and the secret item
    Configure,
    /// Show the current player's role
    Reveal,
    BeginRound,
    Eliminate {
        index: usize,
    },
    Reset,
    GetState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        session: SessionInfo,
        setup: SetupInfo,
        server_now: String,
    },
    Setup {
        setup: SetupInfo,
    },
    /// Game configured; imposter identities are never sent in the clear
    Configured {
        category: String,
        player_count: usize,
        imposter_count: usize,
        reveal_eliminated_role: bool,
        player_names: Vec<PlayerName>,
    },
    /// Card for `player` is face down, waiting for them to take the device
    RevealHidden {
        index: usize,
        player: PlayerName,
        total: usize,
    },
    RoleRevealed {
        card: RoleCard,
        hides_in_ms: u64,
    },
    RevealComplete {
        player_names: Vec<PlayerName>,
    },
    RoundUpdate {
        players: Vec<PlayerView>,
        outcome: RoundOutcome,
        survivors: Survivors,
    },
    GameOver {
        outcome: RoundOutcome,
        message: String,
    },
    Session {
        session: SessionInfo,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Category entry for the setup menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryInfo {
    pub key: String,
    pub label: String,
    pub item_count: usize,
}

/// Setup screen state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupInfo {
    pub category: String,
    pub player_count: usize,
    pub imposter_count: usize,
    /// Upper bound for the imposter slider at the current player count
    pub max_imposters: usize,
    pub reveal_eliminated_role: bool,
    pub players: Vec<RegisteredPlayer>,
    pub registered: usize,
}

/// Reveal progress without the role content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealInfo {
    pub phase: RevealPhase,
    pub current_player: Option<PlayerName>,
    pub total: usize,
}

/// Spoiler-free snapshot of the running session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: GameId,
    pub stage: GameStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub player_names: Vec<PlayerName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealInfo>,
    pub players: Vec<PlayerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RoundOutcome>,
}

impl ServerMessage {
    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }

    pub fn round_update(round: &crate::engine::RoundState) -> Self {
        ServerMessage::RoundUpdate {
            players: round.public_view(),
            outcome: round.outcome(),
            survivors: round.survivors(),
        }
    }
}
