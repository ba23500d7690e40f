//! Imposter selection and the imposter-count bound.

use crate::error::{GameError, GameResult};
use crate::types::{PlayerName, MIN_IMPOSTERS};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Largest imposter count allowed for a roster of `player_count`
pub fn max_imposters(player_count: usize) -> usize {
    (player_count / 4).max(MIN_IMPOSTERS)
}

/// Clamp a selected imposter count into `MIN_IMPOSTERS..=max_imposters(player_count)`.
///
/// A shrinking bound pulls the selection down; a growing bound never raises it.
pub fn clamp_imposters(current: usize, player_count: usize) -> usize {
    current.min(max_imposters(player_count)).max(MIN_IMPOSTERS)
}

/// Pick `imposter_count` distinct imposters uniformly at random
pub fn assign_imposters(
    players: &[PlayerName],
    imposter_count: usize,
) -> GameResult<BTreeSet<PlayerName>> {
    assign_imposters_with_rng(players, imposter_count, &mut rand::rng())
}

pub fn assign_imposters_with_rng<R: Rng + ?Sized>(
    players: &[PlayerName],
    imposter_count: usize,
    rng: &mut R,
) -> GameResult<BTreeSet<PlayerName>> {
    if imposter_count == 0 || imposter_count > players.len() {
        return Err(GameError::config(format!(
            "Cannot pick {} imposters from {} players",
            imposter_count,
            players.len()
        )));
    }

    let unique: BTreeSet<&PlayerName> = players.iter().collect();
    if unique.len() != players.len() {
        return Err(GameError::config("Player names must be unique"));
    }

    Ok(players
        .choose_multiple(rng, imposter_count)
        .cloned()
        .collect())
}
