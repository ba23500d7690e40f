//! Building a validated `GameConfiguration` from the setup screen's values.

use super::roster::{assign_imposters_with_rng, max_imposters};
use crate::error::{GameError, GameResult};
use crate::types::{GameConfiguration, PlayerName, MAX_PLAYERS, MIN_IMPOSTERS, MIN_PLAYERS};
use rand::Rng;
use std::collections::HashSet;

/// Everything needed to configure a new game
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub category: String,
    /// Registered (visible) players in seating order
    pub roster: Vec<PlayerName>,
    /// Player count chosen on the setup screen; must match the roster
    pub player_count: usize,
    pub imposter_count: usize,
    pub reveal_eliminated_role: bool,
}

pub fn configure(request: ConfigureRequest) -> GameResult<GameConfiguration> {
    configure_with_rng(request, &mut rand::rng())
}

pub fn configure_with_rng<R: Rng + ?Sized>(
    request: ConfigureRequest,
    rng: &mut R,
) -> GameResult<GameConfiguration> {
    validate(&request)?;

    let imposter_names = assign_imposters_with_rng(&request.roster, request.imposter_count, rng)?;

    Ok(GameConfiguration {
        category: request.category.trim().to_string(),
        player_count: request.player_count,
        imposter_count: request.imposter_count,
        reveal_eliminated_role: request.reveal_eliminated_role,
        player_names: request.roster,
        imposter_names,
    })
}

/// Check the invariants of an already-built configuration
pub fn validate_configuration(config: &GameConfiguration) -> GameResult<()> {
    validate(&ConfigureRequest {
        category: config.category.clone(),
        roster: config.player_names.clone(),
        player_count: config.player_count,
        imposter_count: config.imposter_count,
        reveal_eliminated_role: config.reveal_eliminated_role,
    })?;

    if config.imposter_names.len() != config.imposter_count {
        return Err(GameError::config(format!(
            "Expected {} imposters, got {}",
            config.imposter_count,
            config.imposter_names.len()
        )));
    }

    if let Some(stranger) = config
        .imposter_names
        .iter()
        .find(|n| !config.player_names.contains(n))
    {
        return Err(GameError::config(format!(
            "Imposter {} is not in the roster",
            stranger
        )));
    }

    Ok(())
}

fn validate(request: &ConfigureRequest) -> GameResult<()> {
    if request.category.trim().is_empty() {
        return Err(GameError::config(
            "Please select a game category before starting",
        ));
    }

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&request.player_count) {
        return Err(GameError::config(format!(
            "Player count must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }

    if request.roster.len() != request.player_count {
        return Err(GameError::config(format!(
            "Please register exactly {} players before starting the game ({} registered)",
            request.player_count,
            request.roster.len()
        )));
    }

    let mut seen = HashSet::new();
    for name in &request.roster {
        if name.trim().is_empty() {
            return Err(GameError::config("Player names cannot be empty"));
        }
        if !seen.insert(name.as_str()) {
            return Err(GameError::config(format!("Duplicate player name: {}", name)));
        }
    }

    let bound = max_imposters(request.player_count);
    if !(MIN_IMPOSTERS..=bound).contains(&request.imposter_count) {
        return Err(GameError::config(format!(
            "Imposter count must be between {} and {} for {} players",
            MIN_IMPOSTERS, bound, request.player_count
        )));
    }

    Ok(())
}
