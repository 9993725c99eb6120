use bevy::prelude::*;

/// High-level app lifecycle state.
/// StartScreen -> Playing (one match per session).
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Waiting for the first click/tap; input is otherwise ignored.
    #[default]
    StartScreen,
    /// Active match.
    Playing,
}
