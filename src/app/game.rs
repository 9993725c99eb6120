use bevy::prelude::*;

use crate::app::menu::MenuPlugin;
use crate::app::state::AppState;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::match_state::MatchStatePlugin;
use crate::gameplay::spawn::MarbleSpawnPlugin;
use crate::interaction::drag::DragLaunchPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::physics::rapier::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::hud::HudPlugin;
use crate::rendering::launcher::LauncherPreviewPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .configure_sets(
                Update,
                (PrePhysicsSet, PostPhysicsAdjustSet.after(PrePhysicsSet)),
            )
            .add_plugins((
                CameraPlugin,
                PhysicsSetupPlugin,
                MenuPlugin,
                MarbleSpawnPlugin,
                DragLaunchPlugin,
                MatchStatePlugin,
                LauncherPreviewPlugin,
                HudPlugin,
                DebugPlugin,
                AutoClosePlugin,
            ));
    }
}
