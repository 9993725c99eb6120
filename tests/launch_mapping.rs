use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, Velocity};

use marble_flick::core::components::{MarbleRadius, PlayerMarble, PlayerSlot};
use marble_flick::core::config::GameConfig;
use marble_flick::gameplay::match_state::{MatchState, PendingTurnSwitch};
use marble_flick::interaction::drag::{
    begin_drag, release_drag, update_drag, ActiveDrag, DragCancelled, DragMoved, DragReleased,
    DragStarted, LaunchApplied,
};

fn test_app(mutate_cfg: impl FnOnce(&mut GameConfig)) -> App {
    let mut cfg = GameConfig::default();
    mutate_cfg(&mut cfg);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(cfg);
    app.insert_resource(ActiveDrag::default());
    app.insert_resource(MatchState::default());
    app.add_event::<DragStarted>();
    app.add_event::<DragMoved>();
    app.add_event::<DragReleased>();
    app.add_event::<DragCancelled>();
    app.add_event::<LaunchApplied>();
    // Pointer dispatch is bypassed: tests inject drag events directly.
    app.add_systems(Update, (begin_drag, update_drag, release_drag).chain());
    app
}

fn spawn_player(app: &mut App, pos: Vec2, radius: f32, slot: PlayerSlot) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_xyz(pos.x, pos.y, 0.0),
            MarbleRadius(radius),
            PlayerMarble(slot),
            Velocity::zero(),
            ExternalImpulse::default(),
        ))
        .id()
}

fn seed_targets(app: &mut App, two_player: bool) {
    // A dummy target keeps the match in the Active phase.
    let dummy = app.world_mut().spawn_empty().id();
    app.world_mut()
        .resource_mut::<MatchState>()
        .begin_match(two_player, [dummy]);
}

#[test]
fn clamped_drag_applies_exact_impulse() {
    // drag (100,100) -> (300,100) hits the 200px clamp; multiplier 0.0025 yields (-0.5, 0)
    let mut app = test_app(|cfg| {
        cfg.launch.max_drag_distance = 200.0;
        cfg.launch.force_multiplier = 0.0025;
    });
    seed_targets(&mut app, false);
    let player = spawn_player(&mut app, Vec2::new(100.0, 100.0), 15.0, PlayerSlot::One);
    app.world_mut()
        .entity_mut(player)
        .insert(Velocity::linear(Vec2::new(30.0, -10.0)));

    app.world_mut()
        .send_event(DragStarted {
            world_pos: Vec2::new(100.0, 100.0),
        });
    app.world_mut().send_event(DragMoved {
        world_pos: Vec2::new(200.0, 100.0),
    });
    app.world_mut().send_event(DragReleased {
        world_pos: Some(Vec2::new(300.0, 100.0)),
    });
    app.update();

    let impulse = app.world().get::<ExternalImpulse>(player).unwrap();
    assert!((impulse.impulse.x - -0.5).abs() < 1e-6);
    assert!(impulse.impulse.y.abs() < 1e-6);
    // velocity reset before the impulse, so launches never stack
    let vel = app.world().get::<Velocity>(player).unwrap();
    assert_eq!(vel.linvel, Vec2::ZERO);
    assert_eq!(vel.angvel, 0.0);
    // gesture cleared
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());

    let launches = app.world().resource::<Events<LaunchApplied>>();
    assert_eq!(launches.len(), 1);
}

#[test]
fn short_drag_is_unclamped() {
    let mut app = test_app(|cfg| {
        cfg.launch.max_drag_distance = 200.0;
        cfg.launch.force_multiplier = 0.001;
    });
    seed_targets(&mut app, false);
    let player = spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::ZERO,
    });
    app.world_mut().send_event(DragReleased {
        world_pos: Some(Vec2::new(50.0, -50.0)),
    });
    app.update();

    let impulse = app.world().get::<ExternalImpulse>(player).unwrap();
    assert!((impulse.impulse.x - -0.05).abs() < 1e-6);
    assert!((impulse.impulse.y - 0.05).abs() < 1e-6);
}

#[test]
fn zero_length_release_mutates_nothing() {
    let mut app = test_app(|_| {});
    seed_targets(&mut app, false);
    let player = spawn_player(&mut app, Vec2::new(10.0, 20.0), 15.0, PlayerSlot::One);
    let initial = Vec2::new(5.0, 5.0);
    app.world_mut()
        .entity_mut(player)
        .insert(Velocity::linear(initial));

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::new(10.0, 20.0),
    });
    app.world_mut().send_event(DragReleased {
        world_pos: Some(Vec2::new(10.0, 20.0)),
    });
    app.update();

    // no force, no velocity reset, gesture cleared
    let vel = app.world().get::<Velocity>(player).unwrap();
    assert_eq!(vel.linvel, initial);
    let impulse = app.world().get::<ExternalImpulse>(player).unwrap();
    assert_eq!(impulse.impulse, Vec2::ZERO);
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());
    assert!(app.world().resource::<Events<LaunchApplied>>().is_empty());
}

#[test]
fn pickup_misses_outside_tolerance() {
    let mut app = test_app(|cfg| {
        cfg.launch.pickup_tolerance = 15.0;
    });
    seed_targets(&mut app, false);
    spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);

    // 31 > radius(15) + tolerance(15)
    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::new(31.0, 0.0),
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());
}

#[test]
fn cancellation_discards_without_force() {
    let mut app = test_app(|_| {});
    seed_targets(&mut app, false);
    let player = spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::ZERO,
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_some());

    app.world_mut().send_event(DragMoved {
        world_pos: Vec2::new(120.0, 0.0),
    });
    app.world_mut().send_event(DragCancelled);
    app.update();

    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());
    let impulse = app.world().get::<ExternalImpulse>(player).unwrap();
    assert_eq!(impulse.impulse, Vec2::ZERO);
    assert!(app.world().resource::<Events<LaunchApplied>>().is_empty());
}

#[test]
fn release_without_position_uses_last_known_point() {
    let mut app = test_app(|cfg| {
        cfg.launch.force_multiplier = 0.001;
    });
    seed_targets(&mut app, false);
    let player = spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::ZERO,
    });
    app.world_mut().send_event(DragMoved {
        world_pos: Vec2::new(100.0, 0.0),
    });
    app.world_mut().send_event(DragReleased { world_pos: None });
    app.update();

    let impulse = app.world().get::<ExternalImpulse>(player).unwrap();
    assert!((impulse.impulse.x - -0.1).abs() < 1e-6);
}

#[test]
fn drag_only_picks_up_active_player_marble() {
    let mut app = test_app(|_| {});
    seed_targets(&mut app, true);
    spawn_player(&mut app, Vec2::new(-100.0, 0.0), 15.0, PlayerSlot::One);
    spawn_player(&mut app, Vec2::new(100.0, 0.0), 15.0, PlayerSlot::Two);

    // Player One is active; grabbing Two's marble does nothing.
    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::new(100.0, 0.0),
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::new(-100.0, 0.0),
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_some());
}

#[test]
fn input_ignored_while_turn_switch_pending() {
    let mut app = test_app(|_| {});
    seed_targets(&mut app, true);
    spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);
    let generation = app.world().resource::<MatchState>().generation();
    app.world_mut().insert_resource(PendingTurnSwitch {
        timer: Timer::from_seconds(0.6, TimerMode::Once),
        generation,
    });

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::ZERO,
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());
}

#[test]
fn input_ignored_after_win() {
    let mut app = test_app(|_| {});
    seed_targets(&mut app, false);
    spawn_player(&mut app, Vec2::ZERO, 15.0, PlayerSlot::One);
    app.world_mut()
        .resource_mut::<MatchState>()
        .try_mark_won();

    app.world_mut().send_event(DragStarted {
        world_pos: Vec2::ZERO,
    });
    app.update();
    assert!(app.world().resource::<ActiveDrag>().gesture.is_none());
}
