//! Pure game core: no locks, no timers, no I/O.

pub mod outcome;
pub mod reveal;
pub mod roster;
pub mod round;
pub mod setup;

pub use outcome::{evaluate, RoundOutcome, Survivors, WinReason};
pub use reveal::{RevealPhase, RevealSequencer, RevealStep, RoleCard, RoleContent};
pub use roster::{assign_imposters, clamp_imposters, max_imposters};
pub use round::{PlayerView, RoundState};
pub use setup::{configure, validate_configuration, ConfigureRequest};
