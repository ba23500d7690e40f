//! Elimination tracking for one round of play.

use super::outcome::{evaluate, RoundOutcome, Survivors};
use crate::error::{GameError, GameResult};
use crate::types::{GameConfiguration, Player};
use serde::{Deserialize, Serialize};

/// Per-player status plus the outcome derived from it.
///
/// `eliminate` is the only mutation and recomputes `outcome` before returning,
/// so the stored outcome always matches the elimination flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundState {
    players: Vec<Player>,
    initial_imposter_count: usize,
    reveal_eliminated_role: bool,
    outcome: RoundOutcome,
}

impl RoundState {
    pub fn initialize(config: &GameConfiguration) -> Self {
        let players: Vec<Player> = config
            .player_names
            .iter()
            .map(|name| Player {
                name: name.clone(),
                is_imposter: config.is_imposter(name),
                is_eliminated: false,
                role_revealed_on_elimination: false,
            })
            .collect();

        let outcome = evaluate(&players, config.imposter_count);

        Self {
            players,
            initial_imposter_count: config.imposter_count,
            reveal_eliminated_role: config.reveal_eliminated_role,
            outcome,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn survivors(&self) -> Survivors {
        Survivors::count(&self.players)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Vote a player out. Irreversible within the round.
    pub fn eliminate(&mut self, index: usize) -> GameResult<RoundOutcome> {
        if self.is_over() {
            return Err(GameError::transition(format!(
                "Round is already over: {}",
                self.outcome.message()
            )));
        }

        let reveal = self.reveal_eliminated_role;
        let player = self
            .players
            .get_mut(index)
            .ok_or_else(|| GameError::transition(format!("No player at index {}", index)))?;

        if player.is_eliminated {
            return Err(GameError::transition(format!(
                "{} is already eliminated",
                player.name
            )));
        }

        player.is_eliminated = true;
        player.role_revealed_on_elimination = reveal;

        self.outcome = evaluate(&self.players, self.initial_imposter_count);
        Ok(self.outcome)
    }

    pub fn eliminate_by_name(&mut self, name: &str) -> GameResult<RoundOutcome> {
        let index = self
            .index_of(name)
            .ok_or_else(|| GameError::transition(format!("No player named {}", name)))?;
        self.eliminate(index)
    }

    /// Player list as shown to the table: roles stay hidden unless the
    /// player is out and the configuration reveals eliminated roles, or the
    /// round has ended.
    pub fn public_view(&self) -> Vec<PlayerView> {
        let over = self.is_over();
        self.players
            .iter()
            .map(|p| PlayerView {
                name: p.name.clone(),
                is_eliminated: p.is_eliminated,
                is_imposter: (p.role_revealed_on_elimination || over).then_some(p.is_imposter),
            })
            .collect()
    }
}

/// Player status without spoilers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub name: String,
    pub is_eliminated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_imposter: Option<bool>,
}
