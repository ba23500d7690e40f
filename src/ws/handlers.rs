//! WebSocket message dispatch
//!
//! Maps client commands onto `AppState`. Configuration errors are returned to
//! the client; transition errors come from stale UI events and are answered
//! with the unchanged current state.

use crate::engine::RoundState;
use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        // Setup screen
        ClientMessage::AddPlayer { name } => setup_reply(state, state.add_player(name).await).await,
        ClientMessage::TogglePlayer { index } => {
            setup_reply(state, state.toggle_player(index).await).await
        }
        ClientMessage::RemovePlayer { index } => {
            setup_reply(state, state.remove_player(index).await).await
        }
        ClientMessage::SetCategory { category } => {
            setup_reply(state, state.set_category(category).await).await
        }
        ClientMessage::SetPlayerCount { count } => {
            setup_reply(state, state.set_player_count(count).await).await
        }
        ClientMessage::SetImposterCount { count } => {
            setup_reply(state, state.set_imposter_count(count).await).await
        }
        ClientMessage::SetRevealRole { enabled } => {
            setup_reply(state, state.set_reveal_role(enabled).await).await
        }

        ClientMessage::Configure => handle_configure(state).await,
        ClientMessage::Reveal => handle_reveal(state).await,
        ClientMessage::BeginRound => match state.begin_round().await {
            Ok(round) => Some(ServerMessage::round_update(&round)),
            Err(e) => error_reply(state, e).await,
        },
        ClientMessage::Eliminate { index } => handle_eliminate(state, index).await,

        ClientMessage::Reset => {
            let session = state.reset().await;
            Some(ServerMessage::Session { session })
        }
        ClientMessage::GetState => Some(ServerMessage::Session {
            session: state.session_info().await,
        }),
    }
}

async fn setup_reply(
    state: &Arc<AppState>,
    result: Result<crate::protocol::SetupInfo, GameError>,
) -> Option<ServerMessage> {
    match result {
        Ok(setup) => Some(ServerMessage::Setup { setup }),
        Err(e) => error_reply(state, e).await,
    }
}

/// Surface configuration errors, swallow stale transitions
async fn error_reply(state: &Arc<AppState>, e: GameError) -> Option<ServerMessage> {
    if e.is_transition() {
        tracing::debug!("Ignoring stale command: {}", e);
        Some(ServerMessage::Session {
            session: state.session_info().await,
        })
    } else {
        tracing::info!("Rejected command: {}", e);
        Some(ServerMessage::error(e.code(), e.to_string()))
    }
}

async fn handle_configure(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.configure().await {
        Ok((config, _resolved)) => {
            // First card is face down, waiting for the first player
            if let Some(first) = config.player_names.first() {
                state.broadcast_to_all(ServerMessage::RevealHidden {
                    index: 0,
                    player: first.clone(),
                    total: config.player_names.len(),
                });
            }
            Some(ServerMessage::Configured {
                category: config.category,
                player_count: config.player_count,
                imposter_count: config.imposter_count,
                reveal_eliminated_role: config.reveal_eliminated_role,
                player_names: config.player_names,
            })
        }
        Err(e) => error_reply(state, e).await,
    }
}

async fn handle_reveal(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.reveal().await {
        Ok(card) => Some(ServerMessage::RoleRevealed {
            card,
            hides_in_ms: state.reveal_dwell().as_millis() as u64,
        }),
        Err(e) => error_reply(state, e).await,
    }
}

async fn handle_eliminate(state: &Arc<AppState>, index: usize) -> Option<ServerMessage> {
    match state.eliminate(index).await {
        Ok(round) => {
            announce_if_over(state, &round);
            Some(ServerMessage::round_update(&round))
        }
        Err(e) if e.is_transition() => {
            tracing::debug!("Elimination of {} rejected: {}", index, e);
            match state.current_round().await {
                Some(round) => Some(ServerMessage::round_update(&round)),
                None => error_reply(state, e).await,
            }
        }
        Err(e) => error_reply(state, e).await,
    }
}

fn announce_if_over(state: &Arc<AppState>, round: &RoundState) {
    let outcome = round.outcome();
    if outcome.is_terminal() {
        state.broadcast_to_all(ServerMessage::GameOver {
            outcome,
            message: outcome.message(),
        });
    }
}
