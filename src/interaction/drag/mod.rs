use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, Velocity};

pub mod gesture;

use crate::app::state::AppState;
use crate::core::components::{MarbleRadius, PlayerMarble, PlayerSlot};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PrePhysicsSet;
use crate::gameplay::match_state::{MatchState, PendingTurnSwitch};
use gesture::{within_pickup, DragGesture, LaunchVector};

/// Pointer went down on the play surface.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragStarted {
    pub world_pos: Vec2,
}

/// Pointer moved while held.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragMoved {
    pub world_pos: Vec2,
}

/// Pointer released. `world_pos` is `None` when the release arrived without a
/// usable position (touch lifted off-screen); the gesture's last known point
/// stands in for it.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragReleased {
    pub world_pos: Option<Vec2>,
}

/// Pointer tracking lost without a release (focus loss, dropped touch).
/// The gesture is discarded with no force applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragCancelled;

/// A launch impulse was handed to the physics engine.
#[derive(Event, Debug, Clone, Copy)]
pub struct LaunchApplied {
    pub slot: PlayerSlot,
    pub impulse: Vec2,
}

/// At most one gesture exists at a time; `entity` is the marble it is bound to.
#[derive(Resource, Default, Debug)]
pub struct ActiveDrag {
    pub entity: Option<Entity>,
    pub gesture: Option<DragGesture>,
}

impl ActiveDrag {
    pub fn clear(&mut self) {
        self.entity = None;
        self.gesture = None;
    }
}

pub struct DragLaunchPlugin;

impl Plugin for DragLaunchPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ActiveDrag::default())
            .add_event::<DragStarted>()
            .add_event::<DragMoved>()
            .add_event::<DragReleased>()
            .add_event::<DragCancelled>()
            .add_event::<LaunchApplied>()
            .add_systems(
                Update,
                (pointer_dispatch, begin_drag, update_drag, release_drag)
                    .chain()
                    .in_set(PrePhysicsSet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

fn cursor_world_pos(
    camera_q: &Query<(&Camera, &GlobalTransform)>,
    screen_pos: Vec2,
) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

fn primary_pointer_world_pos(
    window: &Window,
    touches: &Touches,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(touch) = touches.iter().next() {
        return cursor_world_pos(camera_q, touch.position());
    }
    let cursor = window.cursor_position()?;
    cursor_world_pos(camera_q, cursor)
}

/// Single dispatch point: translates mouse/touch state into drag events so
/// everything downstream is windowless and replayable in tests.
fn pointer_dispatch(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows_q: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    active: Res<ActiveDrag>,
    mut ev_started: EventWriter<DragStarted>,
    mut ev_moved: EventWriter<DragMoved>,
    mut ev_released: EventWriter<DragReleased>,
    mut ev_cancelled: EventWriter<DragCancelled>,
) {
    let Ok(window) = windows_q.single() else {
        return;
    };
    let world_pos = primary_pointer_world_pos(window, &touches, &camera_q);

    let pressed = buttons.just_pressed(MouseButton::Left)
        || touches.iter_just_pressed().next().is_some();
    let released = buttons.just_released(MouseButton::Left)
        || touches.iter_just_released().next().is_some();
    let held = buttons.pressed(MouseButton::Left) || touches.iter().next().is_some();

    if active.gesture.is_some() {
        if released {
            // Prefer the position of the touch that actually ended.
            let release_pos = touches
                .iter_just_released()
                .next()
                .and_then(|t| cursor_world_pos(&camera_q, t.position()))
                .or(world_pos);
            ev_released.write(DragReleased {
                world_pos: release_pos,
            });
        } else if held {
            if let Some(p) = world_pos {
                ev_moved.write(DragMoved { world_pos: p });
            }
        } else {
            // No release event and nothing held: the pointer vanished mid-drag.
            ev_cancelled.write(DragCancelled);
        }
    } else if pressed {
        if let Some(p) = world_pos {
            ev_started.write(DragStarted { world_pos: p });
        }
    }
}

/// Starts a gesture when the pointer lands on the active player marble.
/// Misses are silent; input is ignored while a turn hand-off is pending or
/// after the match is won.
pub fn begin_drag(
    mut ev: EventReader<DragStarted>,
    mut active: ResMut<ActiveDrag>,
    state: Res<MatchState>,
    pending_switch: Option<Res<PendingTurnSwitch>>,
    q: Query<(Entity, &Transform, &MarbleRadius, &PlayerMarble)>,
    cfg: Res<GameConfig>,
) {
    for started in ev.read() {
        if active.gesture.is_some() || state.won() || pending_switch.is_some() {
            continue;
        }
        let slot = state.active_player();
        let Some((entity, tf, radius)) = q
            .iter()
            .find(|(_, _, _, pm)| pm.0 == slot)
            .map(|(e, tf, r, _)| (e, tf, r))
        else {
            continue;
        };
        let pos = tf.translation.truncate();
        if within_pickup(started.world_pos, pos, radius.0, cfg.launch.pickup_tolerance) {
            active.entity = Some(entity);
            active.gesture = Some(DragGesture::new(pos));
            debug!("drag picked up {entity:?} ({slot})");
        }
    }
}

pub fn update_drag(mut ev: EventReader<DragMoved>, mut active: ResMut<ActiveDrag>) {
    for moved in ev.read() {
        if let Some(g) = active.gesture.as_mut() {
            g.current = moved.world_pos;
        }
    }
}

/// Release resolves the gesture into a launch: velocity reset to zero, then
/// the clamped scaled impulse applied, so successive launches never stack.
/// Zero-length drags and cancellations clear the gesture and nothing else.
pub fn release_drag(
    mut ev_released: EventReader<DragReleased>,
    mut ev_cancelled: EventReader<DragCancelled>,
    mut active: ResMut<ActiveDrag>,
    mut q: Query<(&mut Velocity, &mut ExternalImpulse, &PlayerMarble)>,
    cfg: Res<GameConfig>,
    mut ev_launch: EventWriter<LaunchApplied>,
) {
    if ev_cancelled.read().next().is_some() && active.gesture.is_some() {
        debug!("drag cancelled, no force applied");
        active.clear();
    }
    for released in ev_released.read() {
        let (Some(entity), Some(mut gesture)) = (active.entity, active.gesture.take()) else {
            active.clear();
            continue;
        };
        active.clear();
        if let Some(p) = released.world_pos {
            gesture.current = p;
        }
        let Some(launch) = LaunchVector::from_drag(&gesture, cfg.launch.max_drag_distance) else {
            continue; // zero-length drag: no force, no velocity reset
        };
        let Ok((mut vel, mut impulse, pm)) = q.get_mut(entity) else {
            continue;
        };
        vel.linvel = Vec2::ZERO;
        vel.angvel = 0.0;
        let applied = launch.impulse(cfg.launch.force_multiplier);
        impulse.impulse = applied;
        ev_launch.write(LaunchApplied {
            slot: pm.0,
            impulse: applied,
        });
        info!(
            "launch by {} impulse=({:.3},{:.3})",
            pm.0, applied.x, applied.y
        );
    }
}
