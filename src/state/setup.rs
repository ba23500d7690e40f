use super::AppState;
use crate::catalog::ResolvedItem;
use crate::engine::{clamp_imposters, max_imposters, ConfigureRequest};
use crate::error::{GameError, GameResult};
use crate::protocol::SetupInfo;
use crate::store::StoredSetup;
use crate::types::*;

/// Setup-screen values: the player registry and the last-used settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupState {
    pub settings: Settings,
    pub players: Vec<RegisteredPlayer>,
}

impl SetupState {
    /// Restore from storage, repairing out-of-range values
    pub fn from_stored(stored: StoredSetup) -> Self {
        let mut settings = stored.settings;
        settings.player_count = settings.player_count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        settings.imposter_count = clamp_imposters(settings.imposter_count, settings.player_count);
        if settings.category.trim().is_empty() {
            settings.category = Settings::default().category;
        }

        let mut players: Vec<RegisteredPlayer> = Vec::with_capacity(stored.players.len());
        for p in stored.players {
            let name = p.name.trim().to_string();
            if name.is_empty() || players.iter().any(|q| q.name == name) {
                tracing::warn!("Dropping invalid stored player '{}'", p.name);
                continue;
            }
            players.push(RegisteredPlayer {
                name,
                is_visible: p.is_visible,
            });
        }

        Self { settings, players }
    }

    pub fn to_stored(&self) -> StoredSetup {
        StoredSetup {
            settings: self.settings.clone(),
            players: self.players.clone(),
        }
    }

    /// Visible players in registry order
    pub fn registered(&self) -> Vec<PlayerName> {
        self.players
            .iter()
            .filter(|p| p.is_visible)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn add_player(&mut self, name: &str) -> GameResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::config("Name cannot be empty"));
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(GameError::config("This name already exists"));
        }
        if self.registered().len() >= self.settings.player_count {
            return Err(GameError::config(format!(
                "Already {} players registered",
                self.settings.player_count
            )));
        }

        self.players.push(RegisteredPlayer {
            name: name.to_string(),
            is_visible: true,
        });
        Ok(())
    }

    /// Hide or show a registered player. Showing is refused once the
    /// registry already holds `player_count` visible players.
    pub fn toggle_player(&mut self, index: usize) -> GameResult<bool> {
        let full = self.registered().len() >= self.settings.player_count;
        let player = self.players.get_mut(index).ok_or_else(|| {
            GameError::config(format!("No registered player at index {}", index))
        })?;

        if !player.is_visible && full {
            return Err(GameError::config(format!(
                "Already {} players registered",
                self.settings.player_count
            )));
        }

        player.is_visible = !player.is_visible;
        Ok(player.is_visible)
    }

    pub fn remove_player(&mut self, index: usize) -> GameResult<RegisteredPlayer> {
        if index >= self.players.len() {
            return Err(GameError::config(format!(
                "No registered player at index {}",
                index
            )));
        }
        Ok(self.players.remove(index))
    }

    pub fn set_category(&mut self, category: &str) -> GameResult<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(GameError::config("Please select a game category"));
        }
        self.settings.category = category.to_string();
        Ok(())
    }

    /// Change the player count, pulling the imposter count down if the
    /// bound shrinks
    pub fn set_player_count(&mut self, count: usize) -> GameResult<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::config(format!(
                "Player count must be between {} and {}",
                MIN_PLAYERS, MAX_PLAYERS
            )));
        }

        let before = self.settings.imposter_count;
        self.settings.player_count = count;
        self.settings.imposter_count = clamp_imposters(before, count);

        tracing::debug!(
            "Player count {}: max imposters {}, imposters {} -> {}",
            count,
            max_imposters(count),
            before,
            self.settings.imposter_count
        );
        Ok(())
    }

    pub fn set_imposter_count(&mut self, count: usize) -> GameResult<()> {
        let bound = max_imposters(self.settings.player_count);
        if !(MIN_IMPOSTERS..=bound).contains(&count) {
            return Err(GameError::config(format!(
                "Imposter count must be between {} and {} for {} players",
                MIN_IMPOSTERS, bound, self.settings.player_count
            )));
        }
        self.settings.imposter_count = count;
        Ok(())
    }

    pub fn configure_request(&self) -> ConfigureRequest {
        ConfigureRequest {
            category: self.settings.category.clone(),
            roster: self.registered(),
            player_count: self.settings.player_count,
            imposter_count: self.settings.imposter_count,
            reveal_eliminated_role: self.settings.reveal_eliminated_role,
        }
    }

    pub fn info(&self) -> SetupInfo {
        SetupInfo {
            category: self.settings.category.clone(),
            player_count: self.settings.player_count,
            imposter_count: self.settings.imposter_count,
            max_imposters: max_imposters(self.settings.player_count),
            reveal_eliminated_role: self.settings.reveal_eliminated_role,
            players: self.players.clone(),
            registered: self.registered().len(),
        }
    }
}

impl AppState {
    pub async fn setup_info(&self) -> SetupInfo {
        self.setup.read().await.info()
    }

    /// Apply a change to the setup and persist it on success
    async fn update_setup<T>(
        &self,
        change: impl FnOnce(&mut SetupState) -> GameResult<T>,
    ) -> GameResult<T> {
        // Held across the save so the file follows the order of changes
        let mut setup = self.setup.write().await;
        let result = change(&mut *setup)?;

        // Storage is best effort; the in-memory setup stays authoritative
        if let Err(e) = self.store.save(&setup.to_stored()).await {
            tracing::warn!("Failed to persist settings: {}", e);
        }
        Ok(result)
    }

    pub async fn add_player(&self, name: String) -> GameResult<SetupInfo> {
        self.update_setup(|s| s.add_player(&name)).await?;
        tracing::info!("Registered player '{}'", name.trim());
        Ok(self.setup_info().await)
    }

    pub async fn toggle_player(&self, index: usize) -> GameResult<SetupInfo> {
        self.update_setup(|s| s.toggle_player(index)).await?;
        Ok(self.setup_info().await)
    }

    pub async fn remove_player(&self, index: usize) -> GameResult<SetupInfo> {
        let removed = self.update_setup(|s| s.remove_player(index)).await?;
        tracing::info!("Removed player '{}'", removed.name);
        Ok(self.setup_info().await)
    }

    pub async fn set_category(&self, category: String) -> GameResult<SetupInfo> {
        self.update_setup(|s| s.set_category(&category)).await?;
        Ok(self.setup_info().await)
    }

    pub async fn set_player_count(&self, count: usize) -> GameResult<SetupInfo> {
        self.update_setup(|s| s.set_player_count(count)).await?;
        Ok(self.setup_info().await)
    }

    pub async fn set_imposter_count(&self, count: usize) -> GameResult<SetupInfo> {
        self.update_setup(|s| s.set_imposter_count(count)).await?;
        Ok(self.setup_info().await)
    }

    pub async fn set_reveal_role(&self, enabled: bool) -> GameResult<SetupInfo> {
        self.update_setup(|s| {
            s.settings.reveal_eliminated_role = enabled;
            Ok(())
        })
        .await?;
        Ok(self.setup_info().await)
    }

    /// Lock in the current setup: assign imposters, draw the secret item and
    /// start the reveal phase.
    pub async fn configure(&self) -> GameResult<(GameConfiguration, ResolvedItem)> {
        let request = self.setup.read().await.configure_request();
        let config = crate::engine::configure(request)?;
        let resolved = self.catalog.resolve_item(&config.category);

        self.start_reveal(config.clone(), resolved.item.clone())
            .await?;

        tracing::info!(
            "Configured game: {} players, {} imposter(s), category '{}', reveal role: {}",
            config.player_count,
            config.imposter_count,
            config.category,
            config.reveal_eliminated_role
        );
        Ok((config, resolved))
    }
}
