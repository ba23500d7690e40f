//! Win-condition evaluation.

use crate::types::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    AllImpostersEliminated,
    AllLoyalEliminated,
    ParityReached,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WinReason::AllImpostersEliminated => "All imposters have been eliminated.",
            WinReason::AllLoyalEliminated => "All loyal players have been eliminated.",
            WinReason::ParityReached => "Their numbers match or exceed the loyal players.",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RoundOutcome {
    InProgress,
    PlayersWin(WinReason),
    ImpostersWin(WinReason),
}

impl RoundOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundOutcome::InProgress)
    }

    /// Human-readable game-over line
    pub fn message(&self) -> String {
        match self {
            RoundOutcome::InProgress => "Round in progress.".to_string(),
            RoundOutcome::PlayersWin(r) => format!("Players Win! {}", r),
            RoundOutcome::ImpostersWin(r) => format!("Imposters Win! {}", r),
        }
    }
}

/// Surviving counts by side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Survivors {
    pub imposters: usize,
    pub loyal: usize,
}

impl Survivors {
    pub fn count(players: &[Player]) -> Self {
        players
            .iter()
            .filter(|p| !p.is_eliminated)
            .fold(Survivors { imposters: 0, loyal: 0 }, |mut acc, p| {
                if p.is_imposter {
                    acc.imposters += 1;
                } else {
                    acc.loyal += 1;
                }
                acc
            })
    }
}

/// Decide the round from the current elimination flags.
///
/// Rules are checked in order: imposters wiped out, loyal players wiped out,
/// imposters at or above parity. Pure in its inputs.
pub fn evaluate(players: &[Player], initial_imposter_count: usize) -> RoundOutcome {
    let Survivors { imposters, loyal } = Survivors::count(players);

    if initial_imposter_count > 0 && imposters == 0 {
        RoundOutcome::PlayersWin(WinReason::AllImpostersEliminated)
    } else if imposters > 0 && loyal == 0 {
        RoundOutcome::ImpostersWin(WinReason::AllLoyalEliminated)
    } else if imposters > 0 && imposters >= loyal {
        RoundOutcome::ImpostersWin(WinReason::ParityReached)
    } else {
        RoundOutcome::InProgress
    }
}
