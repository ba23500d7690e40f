mod reveal;
mod round;
mod setup;

pub use setup::SetupState;

use crate::catalog::{Catalog, CATEGORIES};
use crate::config::ServerConfig;
use crate::engine::{RevealSequencer, RoundState};
use crate::protocol::{CategoryInfo, RevealInfo, ServerMessage, SessionInfo};
use crate::store::SettingsStore;
use crate::timer::DelayedTask;
use crate::types::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};

/// One pass-around game, from setup through the end of a round.
///
/// `epoch` changes on every reset; timer callbacks carry the epoch they were
/// scheduled under and do nothing if it no longer matches.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: GameId,
    pub epoch: u64,
    pub stage: GameStage,
    pub config: Option<GameConfiguration>,
    pub secret_item: Option<String>,
    pub reveal: Option<RevealSequencer>,
    pub round: Option<RoundState>,
}

impl Session {
    fn new(epoch: u64) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            epoch,
            stage: GameStage::Configuring,
            config: None,
            secret_item: None,
            reveal: None,
            round: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub setup: Arc<RwLock<SetupState>>,
    pub catalog: Arc<Catalog>,
    /// Lock order: `session` before `reveal_timer`
    reveal_timer: Arc<Mutex<DelayedTask>>,
    reveal_dwell: Duration,
    store: SettingsStore,
    /// Broadcast channel for pushing timer-driven updates to every socket
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// In-memory state with built-in categories and the default dwell time
    pub fn new() -> Self {
        Self::with_parts(
            Catalog::builtin(),
            SettingsStore::in_memory(),
            SetupState::default(),
            crate::config::DEFAULT_REVEAL_DWELL,
        )
    }

    pub fn with_parts(
        catalog: Catalog,
        store: SettingsStore,
        setup: SetupState,
        reveal_dwell: Duration,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(RwLock::new(Session::new(0))),
            setup: Arc::new(RwLock::new(setup)),
            catalog: Arc::new(catalog),
            reveal_timer: Arc::new(Mutex::new(DelayedTask::new())),
            reveal_dwell,
            store,
            broadcast: tx,
        }
    }

    /// Build state from process configuration, restoring persisted setup
    pub async fn load(config: &ServerConfig) -> Self {
        let catalog = Catalog::load(config.catalog_path.as_deref()).await;
        let store = SettingsStore::new(&config.settings_path);
        let setup = SetupState::from_stored(store.load().await);

        tracing::info!(
            "Restored setup: {} players registered, category '{}'",
            setup.players.len(),
            setup.settings.category
        );

        Self::with_parts(catalog, store, setup, config.reveal_dwell)
    }

    pub fn reveal_dwell(&self) -> Duration {
        self.reveal_dwell
    }

    /// Send a message to all connected clients
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }

    pub async fn get_session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Abandon the current game at any stage. The player registry and
    /// settings survive; everything else, including a pending dwell timer,
    /// is dropped.
    pub async fn reset(&self) -> SessionInfo {
        let mut session = self.session.write().await;
        let epoch = session.epoch + 1;
        *session = Session::new(epoch);

        self.reveal_timer.lock().await.cancel();

        tracing::info!("Game reset (epoch {})", epoch);
        Self::session_info_of(&session)
    }

    pub async fn session_info(&self) -> SessionInfo {
        Self::session_info_of(&*self.session.read().await)
    }

    fn session_info_of(session: &Session) -> SessionInfo {
        let reveal = session.reveal.as_ref().map(|seq| RevealInfo {
            phase: seq.phase(),
            current_player: seq.current_player().map(str::to_string),
            total: seq.player_count(),
        });

        SessionInfo {
            id: session.id.clone(),
            stage: session.stage,
            category: session.config.as_ref().map(|c| c.category.clone()),
            player_names: session
                .config
                .as_ref()
                .map(|c| c.player_names.clone())
                .unwrap_or_default(),
            reveal,
            players: session
                .round
                .as_ref()
                .map(RoundState::public_view)
                .unwrap_or_default(),
            outcome: session.round.as_ref().map(RoundState::outcome),
        }
    }

    pub fn categories(&self) -> Vec<CategoryInfo> {
        self.catalog
            .category_keys()
            .into_iter()
            .map(|key| {
                let label = CATEGORIES
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, label)| label.to_string())
                    .unwrap_or_else(|| key.clone());
                let item_count = self.catalog.items(&key).len();
                CategoryInfo {
                    key,
                    label,
                    item_count,
                }
            })
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
