use std::fmt;

use bevy::prelude::*;

/// Marker component identifying any marble entity (holds physics body & collider).
#[derive(Component)]
pub struct Marble;

/// Logical radius used both for the collider, pickup hit-testing and rendering scale.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct MarbleRadius(pub f32);

/// Marble a player may pick up and launch. Carries the owning slot; in
/// single-player matches only `PlayerSlot::One` is ever spawned.
#[derive(Component, Debug, Copy, Clone)]
pub struct PlayerMarble(pub PlayerSlot);

/// Marble that is removed (captured) when struck by the active player marble.
#[derive(Component)]
pub struct TargetMarble;

/// Static arena boundary segment.
#[derive(Component)]
pub struct Wall;

/// Which player controls the active marble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => write!(f, "Player 1"),
            PlayerSlot::Two => write!(f, "Player 2"),
        }
    }
}
