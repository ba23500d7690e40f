use super::AppState;
use crate::engine::{validate_configuration, RevealPhase, RevealSequencer, RevealStep, RoleCard};
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Begin the reveal phase for a resolved configuration and secret item
    pub async fn start_reveal(
        &self,
        config: GameConfiguration,
        secret_item: String,
    ) -> GameResult<RevealPhase> {
        validate_configuration(&config)?;

        let mut session = self.session.write().await;
        if session.stage != GameStage::Configuring {
            return Err(GameError::transition(format!(
                "Cannot start reveal while {:?}; reset first",
                session.stage
            )));
        }

        let sequencer = RevealSequencer::new(&config, secret_item.clone())?;
        let phase = sequencer.phase();

        session.config = Some(config);
        session.secret_item = Some(secret_item);
        session.reveal = Some(sequencer);
        session.round = None;
        session.stage = GameStage::Revealing;

        Ok(phase)
    }

    /// Show the current player's role and start the dwell timer.
    ///
    /// When the timer fires the card is hidden and the sequencer moves to the
    /// next player or completes; the result is broadcast to every socket.
    pub async fn reveal(&self) -> GameResult<RoleCard> {
        let mut session = self.session.write().await;
        if session.stage != GameStage::Revealing {
            return Err(GameError::transition(format!(
                "No reveal in progress ({:?})",
                session.stage
            )));
        }

        let epoch = session.epoch;
        let sequencer = session
            .reveal
            .as_mut()
            .ok_or_else(|| GameError::transition("No reveal in progress"))?;
        let card = sequencer.reveal()?;

        let index = card.index;
        let state = self.clone();
        let generation = self
            .reveal_timer
            .lock()
            .await
            .schedule(self.reveal_dwell, async move {
                state.on_dwell_elapsed(epoch, index).await;
            });

        tracing::debug!(
            "Revealed role {} of {} (timer {})",
            index + 1,
            session.reveal.as_ref().map_or(0, RevealSequencer::player_count),
            generation
        );
        Ok(card)
    }

    /// Timer callback: hide the card shown for `index` and move on.
    ///
    /// Stale callbacks (after a reset, or for a card no longer showing) are
    /// dropped without touching state.
    async fn on_dwell_elapsed(&self, epoch: u64, index: usize) {
        let mut session = self.session.write().await;
        if session.epoch != epoch {
            tracing::debug!("Ignoring dwell timer from epoch {}", epoch);
            return;
        }

        let Some(sequencer) = session.reveal.as_mut() else {
            return;
        };
        if sequencer.phase() != RevealPhase::Revealed(index) {
            tracing::debug!(
                "Ignoring dwell timer for player {}, sequencer is at {:?}",
                index + 1,
                sequencer.phase()
            );
            return;
        }

        let total = sequencer.player_count();
        match sequencer.advance() {
            Ok(RevealStep::Next { index, player }) => {
                self.broadcast_to_all(ServerMessage::RevealHidden {
                    index,
                    player,
                    total,
                });
            }
            Ok(RevealStep::Complete { player_names }) => {
                session.stage = GameStage::Ready;
                tracing::info!("All {} roles revealed, game ready", player_names.len());
                self.broadcast_to_all(ServerMessage::RevealComplete { player_names });
            }
            Err(e) => {
                tracing::warn!("Dwell timer could not advance reveal: {}", e);
            }
        }
    }

    /// Whether a dwell timer is currently waiting to fire
    pub async fn reveal_timer_pending(&self) -> bool {
        self.reveal_timer.lock().await.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::engine::RoleContent;
    use crate::state::SetupState;
    use crate::store::SettingsStore;
    use std::time::Duration;

    const DWELL: Duration = Duration::from_secs(3);

    fn state() -> AppState {
        AppState::with_parts(
            Catalog::builtin(),
            SettingsStore::in_memory(),
            SetupState::default(),
            DWELL,
        )
    }

    fn config() -> GameConfiguration {
        GameConfiguration {
            category: "food".to_string(),
            player_count: 4,
            imposter_count: 1,
            reveal_eliminated_role: false,
            player_names: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            imposter_names: ["B".to_string()].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_start_reveal_requires_configuring() {
        let state = state();
        state.start_reveal(config(), "Pizza".into()).await.unwrap();

        let err = state
            .start_reveal(config(), "Pizza".into())
            .await
            .unwrap_err();
        assert!(err.is_transition());
    }

    #[tokio::test]
    async fn test_start_reveal_validates_configuration() {
        let state = state();
        let mut bad = config();
        bad.imposter_names = ["Z".to_string()].into_iter().collect();

        let err = state.start_reveal(bad, "Pizza".into()).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIGURATION");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dwell_timer_advances_to_next_player() {
        let state = state();
        let mut rx = state.broadcast.subscribe();
        state.start_reveal(config(), "Pizza".into()).await.unwrap();

        let card = state.reveal().await.unwrap();
        assert_eq!(card.player, "A");
        assert_eq!(card.role.label(), "Pizza");
        assert!(state.reveal_timer_pending().await);

        // Second reveal while the card is showing is rejected
        assert!(state.reveal().await.is_err());

        tokio::time::sleep(DWELL + Duration::from_millis(10)).await;

        match rx.recv().await.unwrap() {
            ServerMessage::RevealHidden {
                index,
                player,
                total,
            } => {
                assert_eq!(index, 1);
                assert_eq!(player, "B");
                assert_eq!(total, 4);
            }
            other => panic!("Expected RevealHidden, got {:?}", other),
        }

        let card = state.reveal().await.unwrap();
        assert_eq!(
            card.role,
            RoleContent::Imposter {
                co_imposters: vec![]
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_dwell_completes_reveal() {
        let state = state();
        let mut rx = state.broadcast.subscribe();
        state.start_reveal(config(), "Pizza".into()).await.unwrap();

        for _ in 0..4 {
            state.reveal().await.unwrap();
            tokio::time::sleep(DWELL + Duration::from_millis(10)).await;
        }

        let mut hidden = 0;
        let mut complete = 0;
        while let Ok(msg) = rx.try_recv() {
            match msg {
                ServerMessage::RevealHidden { .. } => hidden += 1,
                ServerMessage::RevealComplete { player_names } => {
                    complete += 1;
                    assert_eq!(player_names, vec!["A", "B", "C", "D"]);
                }
                _ => {}
            }
        }
        assert_eq!(hidden, 3);
        assert_eq!(complete, 1);

        let session = state.get_session().await;
        assert_eq!(session.stage, GameStage::Ready);
        assert!(state.reveal().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_timer() {
        let state = state();
        let mut rx = state.broadcast.subscribe();
        state.start_reveal(config(), "Pizza".into()).await.unwrap();
        state.reveal().await.unwrap();

        state.reset().await;
        assert!(!state.reveal_timer_pending().await);

        // New game started before the old dwell would have elapsed
        state.start_reveal(config(), "Sushi".into()).await.unwrap();
        tokio::time::sleep(DWELL * 2).await;

        assert!(rx.try_recv().is_err());
        let session = state.get_session().await;
        assert_eq!(session.stage, GameStage::Revealing);
        assert_eq!(
            session.reveal.as_ref().map(|s| s.phase()),
            Some(RevealPhase::Hidden(0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_callback_is_ignored() {
        let state = state();
        state.start_reveal(config(), "Pizza".into()).await.unwrap();

        // A callback from a previous epoch must not advance the new game
        state.on_dwell_elapsed(99, 0).await;
        let session = state.get_session().await;
        assert_eq!(
            session.reveal.as_ref().map(|s| s.phase()),
            Some(RevealPhase::Hidden(0))
        );

        // Nor one for a card that is not showing
        state.on_dwell_elapsed(session.epoch, 0).await;
        let session = state.get_session().await;
        assert_eq!(
            session.reveal.as_ref().map(|s| s.phase()),
            Some(RevealPhase::Hidden(0))
        );
    }
}
