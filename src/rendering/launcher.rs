use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::interaction::drag::gesture::LaunchVector;
use crate::interaction::drag::ActiveDrag;

const PREVIEW_COLOR: Color = Color::srgb(0.298, 0.686, 0.314);

/// Draws the launch preview while a gesture is active: a line from the
/// pickup origin to the clamped endpoint plus a marker circle. Geometry
/// comes from the same clamped vector the release will apply, so what the
/// player sees is exactly what they get.
pub struct LauncherPreviewPlugin;

impl Plugin for LauncherPreviewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_launch_preview);
    }
}

fn draw_launch_preview(active: Res<ActiveDrag>, cfg: Res<GameConfig>, mut gizmos: Gizmos) {
    let Some(gesture) = active.gesture else {
        return;
    };
    let Some(launch) = LaunchVector::from_drag(&gesture, cfg.launch.max_drag_distance) else {
        return;
    };
    let end = launch.preview_end(gesture.origin);
    gizmos.line_2d(gesture.origin, end, PREVIEW_COLOR);
    gizmos.circle_2d(end, 10.0, PREVIEW_COLOR);
}
