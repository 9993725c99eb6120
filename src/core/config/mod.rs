pub mod config;

pub use config::{
    ArenaConfig, GameConfig, LaunchConfig, MarbleLayoutConfig, MatchConfig, PhysicsConfig,
    WindowConfig,
};
