use super::{AppState, Session};
use crate::engine::RoundState;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl AppState {
    /// Start play once every role has been revealed
    pub async fn begin_round(&self) -> GameResult<RoundState> {
        let mut session = self.session.write().await;
        if session.stage != GameStage::Ready {
            return Err(GameError::transition(format!(
                "Cannot begin round while {:?}",
                session.stage
            )));
        }

        let config = session
            .config
            .as_ref()
            .ok_or_else(|| GameError::transition("No configuration for this game"))?;
        let round = RoundState::initialize(config);

        session.round = Some(round.clone());
        session.stage = GameStage::Playing;

        tracing::info!("Round started with {} players", round.players().len());
        Ok(round)
    }

    /// Eliminate the player at `index` and re-evaluate the round.
    ///
    /// Holding the session write lock serializes eliminations, so each one
    /// sees the outcome left by the previous one.
    pub async fn eliminate(&self, index: usize) -> GameResult<RoundState> {
        let mut session = self.session.write().await;
        eliminate_in(&mut session, index)
    }

    /// Eliminate by name. The name is looked up under the same lock as the
    /// elimination, so a reset in between cannot retarget it.
    pub async fn eliminate_by_name(&self, name: &str) -> GameResult<RoundState> {
        let mut session = self.session.write().await;
        let index = session
            .round
            .as_ref()
            .and_then(|r| r.index_of(name))
            .ok_or_else(|| GameError::transition(format!("No player named {}", name)))?;
        eliminate_in(&mut session, index)
    }

    pub async fn current_round(&self) -> Option<RoundState> {
        self.session.read().await.round.clone()
    }
}

fn eliminate_in(session: &mut Session, index: usize) -> GameResult<RoundState> {
    if session.stage != GameStage::Playing {
        return Err(GameError::transition(format!(
            "No round in progress ({:?})",
            session.stage
        )));
    }

    let round = session
        .round
        .as_mut()
        .ok_or_else(|| GameError::transition("No round in progress"))?;
    let outcome = round.eliminate(index)?;

    let name = &round.players()[index].name;
    if outcome.is_terminal() {
        tracing::info!("{} eliminated. {}", name, outcome.message());
    } else {
        tracing::info!("{} eliminated, round continues", name);
    }

    Ok(round.clone())
}
