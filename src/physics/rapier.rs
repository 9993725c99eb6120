use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Wires up Rapier and pushes the configured gravity vector into it. Both
/// axes are settable so tilt-style variants only need a config change.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .add_systems(PostStartup, configure_gravity);
    }
}

fn configure_gravity(cfg: Res<GameConfig>, mut rapier_q: Query<&mut RapierConfiguration>) {
    let Ok(mut rapier_cfg) = rapier_q.single_mut() else {
        warn!("no Rapier context found; gravity left at plugin default");
        return;
    };
    rapier_cfg.gravity = Vect::new(cfg.physics.gravity_x, cfg.physics.gravity_y);
}
