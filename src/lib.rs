pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::core::components::{Marble, MarbleRadius, PlayerMarble, PlayerSlot, TargetMarble};
pub use crate::core::config::{config::GameConfig, config::WindowConfig};
pub use crate::gameplay::match_state::{CaptureOutcome, MatchState};
