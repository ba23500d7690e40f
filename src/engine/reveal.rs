//! Pass-around role reveal.
//!
//! Walks the roster in seating order. Each player's card starts hidden, is
//! shown on `reveal`, and is hidden again by `advance` once the dwell time is
//! over. The dwell timer itself lives in `AppState`; this type only holds the
//! state machine so it can be driven synchronously in tests.

use crate::error::{GameError, GameResult};
use crate::types::{GameConfiguration, PlayerName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label shown to imposters in place of the secret item
pub const IMPOSTER_LABEL: &str = "Imposter";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum RevealPhase {
    Hidden(usize),
    Revealed(usize),
    Complete,
}

/// What a player sees when their card is turned over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleContent {
    /// Other imposters are listed, never the player themself
    Imposter { co_imposters: Vec<PlayerName> },
    SecretItem { item: String },
}

impl RoleContent {
    /// Headline text for the card
    pub fn label(&self) -> &str {
        match self {
            RoleContent::Imposter { .. } => IMPOSTER_LABEL,
            RoleContent::SecretItem { item } => item,
        }
    }

    pub fn is_imposter(&self) -> bool {
        matches!(self, RoleContent::Imposter { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleCard {
    pub index: usize,
    pub player: PlayerName,
    pub role: RoleContent,
}

/// Result of hiding the current card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep {
    Next { index: usize, player: PlayerName },
    Complete { player_names: Vec<PlayerName> },
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    player_names: Vec<PlayerName>,
    imposter_names: BTreeSet<PlayerName>,
    secret_item: String,
    phase: RevealPhase,
}

impl RevealSequencer {
    pub fn new(config: &GameConfiguration, secret_item: impl Into<String>) -> GameResult<Self> {
        if config.player_names.is_empty() {
            return Err(GameError::config("Cannot reveal roles without players"));
        }

        Ok(Self {
            player_names: config.player_names.clone(),
            imposter_names: config.imposter_names.clone(),
            secret_item: secret_item.into(),
            phase: RevealPhase::Hidden(0),
        })
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RevealPhase::Complete
    }

    /// Player whose turn it is, hidden or revealed
    pub fn current_player(&self) -> Option<&str> {
        match self.phase {
            RevealPhase::Hidden(i) | RevealPhase::Revealed(i) => {
                self.player_names.get(i).map(String::as_str)
            }
            RevealPhase::Complete => None,
        }
    }

    /// Turn the current card over. Rejected if it is already showing.
    pub fn reveal(&mut self) -> GameResult<RoleCard> {
        match self.phase {
            RevealPhase::Hidden(i) => {
                self.phase = RevealPhase::Revealed(i);
                Ok(self.card_for(i))
            }
            RevealPhase::Revealed(i) => Err(GameError::transition(format!(
                "Role for player {} is already revealed",
                i + 1
            ))),
            RevealPhase::Complete => Err(GameError::transition("Reveal phase is complete")),
        }
    }

    /// Hide the shown card and move on, called when the dwell time elapses
    pub fn advance(&mut self) -> GameResult<RevealStep> {
        let RevealPhase::Revealed(i) = self.phase else {
            return Err(GameError::transition(format!(
                "Cannot advance reveal from {:?}",
                self.phase
            )));
        };

        let next = i + 1;
        if next < self.player_names.len() {
            self.phase = RevealPhase::Hidden(next);
            Ok(RevealStep::Next {
                index: next,
                player: self.player_names[next].clone(),
            })
        } else {
            self.phase = RevealPhase::Complete;
            Ok(RevealStep::Complete {
                player_names: self.player_names.clone(),
            })
        }
    }

    fn card_for(&self, index: usize) -> RoleCard {
        let player = self.player_names[index].clone();
        let role = if self.imposter_names.contains(&player) {
            RoleContent::Imposter {
                co_imposters: self
                    .player_names
                    .iter()
                    .filter(|n| **n != player && self.imposter_names.contains(*n))
                    .cloned()
                    .collect(),
            }
        } else {
            RoleContent::SecretItem {
                item: self.secret_item.clone(),
            }
        };

        RoleCard {
            index,
            player,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: &[&str], imposters: &[&str]) -> GameConfiguration {
        GameConfiguration {
            category: "food".to_string(),
            player_count: players.len(),
            imposter_count: imposters.len(),
            reveal_eliminated_role: false,
            player_names: players.iter().map(|s| s.to_string()).collect(),
            imposter_names: imposters.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_starts_hidden_on_first_player() {
        let seq = RevealSequencer::new(&config(&["A", "B", "C"], &["B"]), "Pizza").unwrap();
        assert_eq!(seq.phase(), RevealPhase::Hidden(0));
        assert_eq!(seq.current_player(), Some("A"));
    }

    #[test]
    fn test_role_content_matches_imposter_set() {
        let cfg = config(&["A", "B", "C", "D"], &["B"]);
        let mut seq = RevealSequencer::new(&cfg, "Pizza").unwrap();

        for i in 0..4 {
            let card = seq.reveal().unwrap();
            assert_eq!(card.index, i);
            assert_eq!(
                card.role.label() == IMPOSTER_LABEL,
                cfg.is_imposter(&card.player)
            );
            if !card.role.is_imposter() {
                assert_eq!(card.role.label(), "Pizza");
            }
            seq.advance().unwrap();
        }
        assert!(seq.is_complete());
    }

    #[test]
    fn test_imposter_sees_co_imposters_but_not_self() {
        let cfg = config(&["A", "B", "C", "D", "E", "F", "G", "H"], &["C", "F"]);
        let mut seq = RevealSequencer::new(&cfg, "Guitar").unwrap();

        // Skip to C
        for _ in 0..2 {
            seq.reveal().unwrap();
            seq.advance().unwrap();
        }
        let card = seq.reveal().unwrap();
        assert_eq!(card.player, "C");
        assert_eq!(
            card.role,
            RoleContent::Imposter {
                co_imposters: vec!["F".to_string()]
            }
        );
    }

    #[test]
    fn test_reveal_twice_is_rejected() {
        let mut seq = RevealSequencer::new(&config(&["A", "B", "C"], &["A"]), "x").unwrap();
        seq.reveal().unwrap();
        let err = seq.reveal().unwrap_err();
        assert!(err.is_transition());
        assert_eq!(seq.phase(), RevealPhase::Revealed(0));
    }

    #[test]
    fn test_advance_requires_revealed_card() {
        let mut seq = RevealSequencer::new(&config(&["A", "B", "C"], &["A"]), "x").unwrap();
        assert!(seq.advance().is_err());
        assert_eq!(seq.phase(), RevealPhase::Hidden(0));
    }

    #[test]
    fn test_advance_moves_to_next_or_completes() {
        let mut seq = RevealSequencer::new(&config(&["A", "B", "C"], &["C"]), "x").unwrap();

        seq.reveal().unwrap();
        assert_eq!(
            seq.advance().unwrap(),
            RevealStep::Next {
                index: 1,
                player: "B".to_string()
            }
        );

        seq.reveal().unwrap();
        seq.advance().unwrap();

        seq.reveal().unwrap();
        match seq.advance().unwrap() {
            RevealStep::Complete { player_names } => {
                assert_eq!(player_names, vec!["A", "B", "C"]);
            }
            other => panic!("Expected Complete, got {:?}", other),
        }
        assert_eq!(seq.current_player(), None);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut seq = RevealSequencer::new(&config(&["A", "B", "C"], &["C"]), "x").unwrap();
        for _ in 0..3 {
            seq.reveal().unwrap();
            seq.advance().unwrap();
        }
        assert!(seq.reveal().is_err());
        assert!(seq.advance().is_err());
        assert!(seq.is_complete());
    }
}
