use imposter::catalog::Catalog;
use imposter::engine::{RoundOutcome, WinReason};
use imposter::protocol::{ClientMessage, ServerMessage};
use imposter::state::{AppState, SetupState};
use imposter::store::SettingsStore;
use imposter::types::GameStage;
use imposter::ws::handlers::handle_message;
use std::sync::Arc;
use std::time::Duration;

const DWELL: Duration = Duration::from_secs(3);

fn new_state() -> Arc<AppState> {
    Arc::new(AppState::with_parts(
        Catalog::from_json(r#"{"movies": ["Jaws"]}"#).unwrap(),
        SettingsStore::in_memory(),
        SetupState::default(),
        DWELL,
    ))
}

async fn send(state: &Arc<AppState>, msg: ClientMessage) -> ServerMessage {
    handle_message(msg, state)
        .await
        .expect("every command gets a reply")
}

async fn register(state: &Arc<AppState>, count: usize, names: &[&str]) {
    send(state, ClientMessage::SetPlayerCount { count }).await;
    for name in names {
        match send(
            state,
            ClientMessage::AddPlayer {
                name: name.to_string(),
            },
        )
        .await
        {
            ServerMessage::Setup { .. } => {}
            other => panic!("Expected Setup, got {:?}", other),
        }
    }
}

/// Walk through the timed reveal for every player, checking each card
async fn reveal_all(state: &Arc<AppState>, total: usize) -> Vec<String> {
    let mut imposters = Vec::new();
    for i in 0..total {
        match send(state, ClientMessage::Reveal).await {
            ServerMessage::RoleRevealed { card, hides_in_ms } => {
                assert_eq!(card.index, i);
                assert_eq!(hides_in_ms, 3000);
                if card.role.is_imposter() {
                    assert_eq!(card.role.label(), "Imposter");
                    imposters.push(card.player);
                } else {
                    assert_eq!(card.role.label(), "Jaws");
                }
            }
            other => panic!("Expected RoleRevealed, got {:?}", other),
        }
        tokio::time::sleep(DWELL + Duration::from_millis(10)).await;
    }
    imposters
}

/// End-to-end flow: setup, reveal, elimination until a side wins
#[tokio::test(start_paused = true)]
async fn test_full_game_flow() {
    let state = new_state();
    let mut rx = state.broadcast.subscribe();

    register(&state, 4, &["A", "B", "C", "D"]).await;
    send(
        &state,
        ClientMessage::SetCategory {
            category: "Movies".to_string(),
        },
    )
    .await;
    send(&state, ClientMessage::SetRevealRole { enabled: true }).await;

    match send(&state, ClientMessage::Configure).await {
        ServerMessage::Configured {
            category,
            player_count,
            imposter_count,
            reveal_eliminated_role,
            player_names,
        } => {
            assert_eq!(category, "Movies");
            assert_eq!(player_count, 4);
            assert_eq!(imposter_count, 1);
            assert!(reveal_eliminated_role);
            assert_eq!(player_names, vec!["A", "B", "C", "D"]);
        }
        other => panic!("Expected Configured, got {:?}", other),
    }

    let imposters = reveal_all(&state, 4).await;
    assert_eq!(imposters.len(), 1);
    assert_eq!(state.get_session().await.stage, GameStage::Ready);

    // The last broadcast of the reveal phase is the completion signal
    let mut saw_complete = false;
    while let Ok(msg) = rx.try_recv() {
        if let ServerMessage::RevealComplete { player_names } = msg {
            assert_eq!(player_names.len(), 4);
            saw_complete = true;
        }
    }
    assert!(saw_complete);

    match send(&state, ClientMessage::BeginRound).await {
        ServerMessage::RoundUpdate { players, outcome, .. } => {
            assert_eq!(players.len(), 4);
            assert_eq!(outcome, RoundOutcome::InProgress);
        }
        other => panic!("Expected RoundUpdate, got {:?}", other),
    }

    // Vote out the imposter
    let round = state.current_round().await.unwrap();
    let imposter_index = round.index_of(&imposters[0]).unwrap();

    match send(&state, ClientMessage::Eliminate { index: imposter_index }).await {
        ServerMessage::RoundUpdate { players, outcome, survivors } => {
            assert_eq!(
                outcome,
                RoundOutcome::PlayersWin(WinReason::AllImpostersEliminated)
            );
            assert_eq!(survivors.imposters, 0);
            assert_eq!(players[imposter_index].is_imposter, Some(true));
        }
        other => panic!("Expected RoundUpdate, got {:?}", other),
    }

    match rx.try_recv() {
        Ok(ServerMessage::GameOver { message, .. }) => {
            assert_eq!(message, "Players Win! All imposters have been eliminated.");
        }
        other => panic!("Expected GameOver broadcast, got {:?}", other),
    }

    // Round is frozen: later eliminations leave everything unchanged
    let other_index = (imposter_index + 1) % 4;
    match send(&state, ClientMessage::Eliminate { index: other_index }).await {
        ServerMessage::RoundUpdate { players, .. } => {
            assert!(!players[other_index].is_eliminated);
        }
        other => panic!("Expected RoundUpdate, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_imposters_win_by_parity() {
    let state = new_state();
    register(&state, 4, &["A", "B", "C", "D"]).await;
    send(&state, ClientMessage::Configure).await;
    let imposters = reveal_all(&state, 4).await;
    send(&state, ClientMessage::BeginRound).await;

    let round = state.current_round().await.unwrap();
    let loyal: Vec<usize> = round
        .players()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.name != imposters[0])
        .map(|(i, _)| i)
        .collect();

    match send(&state, ClientMessage::Eliminate { index: loyal[0] }).await {
        ServerMessage::RoundUpdate { outcome, survivors, players } => {
            assert_eq!(outcome, RoundOutcome::InProgress);
            assert_eq!(survivors.loyal, 2);
            // Reveal flag is off: eliminated role stays hidden mid-round
            assert_eq!(players[loyal[0]].is_imposter, None);
        }
        other => panic!("Expected RoundUpdate, got {:?}", other),
    }

    match send(&state, ClientMessage::Eliminate { index: loyal[1] }).await {
        ServerMessage::RoundUpdate { outcome, .. } => {
            assert_eq!(outcome, RoundOutcome::ImpostersWin(WinReason::ParityReached));
        }
        other => panic!("Expected RoundUpdate, got {:?}", other),
    }

    let round = state.current_round().await.unwrap();
    send(&state, ClientMessage::Eliminate { index: loyal[2] }).await;
    assert_eq!(state.current_round().await.unwrap(), round);
}

#[tokio::test]
async fn test_configuration_errors_are_reported() {
    let state = new_state();
    register(&state, 4, &["A", "B"]).await;

    match send(&state, ClientMessage::Configure).await {
        ServerMessage::Error { code, msg } => {
            assert_eq!(code, "INVALID_CONFIGURATION");
            assert!(msg.contains("exactly 4 players"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }

    match send(&state, ClientMessage::SetImposterCount { count: 2 }).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, "INVALID_CONFIGURATION"),
        other => panic!("Expected Error, got {:?}", other),
    }

    match send(
        &state,
        ClientMessage::AddPlayer {
            name: "A".to_string(),
        },
    )
    .await
    {
        ServerMessage::Error { msg, .. } => assert!(msg.contains("already exists")),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stale_commands_are_no_ops() {
    let state = new_state();

    // Nothing to reveal, begin or eliminate yet: answered with the session
    for msg in [
        ClientMessage::Reveal,
        ClientMessage::BeginRound,
        ClientMessage::Eliminate { index: 0 },
    ] {
        match send(&state, msg).await {
            ServerMessage::Session { session } => {
                assert_eq!(session.stage, GameStage::Configuring);
            }
            other => panic!("Expected Session, got {:?}", other),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_reset_mid_reveal_discards_progress() {
    let state = new_state();
    let mut rx = state.broadcast.subscribe();
    register(&state, 3, &["A", "B", "C"]).await;
    send(&state, ClientMessage::Configure).await;
    send(&state, ClientMessage::Reveal).await;

    match send(&state, ClientMessage::Reset).await {
        ServerMessage::Session { session } => {
            assert_eq!(session.stage, GameStage::Configuring);
            assert!(session.reveal.is_none());
        }
        other => panic!("Expected Session, got {:?}", other),
    }

    while rx.try_recv().is_ok() {}
    tokio::time::sleep(DWELL * 2).await;
    assert!(rx.try_recv().is_err(), "stale timer fired after reset");

    // Registry survives the reset, so the next game can start straight away
    match send(&state, ClientMessage::Configure).await {
        ServerMessage::Configured { player_names, .. } => {
            assert_eq!(player_names, vec!["A", "B", "C"]);
        }
        other => panic!("Expected Configured, got {:?}", other),
    }
}
