pub mod logging;

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "debug")]
        {
            app.init_resource::<logging::DebugLogState>()
                .add_systems(Update, logging::debug_logging_system);
        }
        #[cfg(not(feature = "debug"))]
        {
            let _ = app;
        }
    }
}
