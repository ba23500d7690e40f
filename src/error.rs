//! Error taxonomy for the game core.
//!
//! Configuration errors block progression and are shown to the user.
//! Transition errors come from stale UI events and are answered as no-ops.

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl GameError {
    /// Stable code sent to clients in `ServerMessage::Error`
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            GameError::InvalidTransition(_) => "INVALID_TRANSITION",
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, GameError::InvalidTransition(_))
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        GameError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn transition(msg: impl Into<String>) -> Self {
        GameError::InvalidTransition(msg.into())
    }
}

/// Errors from reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
