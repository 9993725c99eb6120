use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::app::state::AppState;
use crate::core::components::{Marble, MarbleRadius, PlayerMarble, PlayerSlot, TargetMarble, Wall};
use crate::core::config::GameConfig;
use crate::gameplay::match_state::MatchState;

/// Target palette, cycled when target_count exceeds it.
const TARGET_COLORS: [Color; 5] = [
    Color::srgb(0.906, 0.298, 0.235), // red
    Color::srgb(0.204, 0.596, 0.859), // blue
    Color::srgb(0.180, 0.800, 0.443), // green
    Color::srgb(0.608, 0.349, 0.714), // purple
    Color::srgb(0.953, 0.612, 0.071), // orange
];

const PLAYER_ONE_COLOR: Color = Color::srgb(0.298, 0.686, 0.314);
const PLAYER_TWO_COLOR: Color = Color::srgb(0.129, 0.588, 0.953);
const WALL_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

pub struct MarbleSpawnPlugin;

impl Plugin for MarbleSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), (spawn_arena, spawn_marbles));
    }
}

/// Four static walls hugging the window edges so marbles bounce at the
/// visible boundary.
fn spawn_arena(mut commands: Commands, windows_q: Query<&Window>, cfg: Res<GameConfig>) {
    let (w, h) = arena_extent(&windows_q, &cfg);
    let t = cfg.arena.wall_thickness;
    let (half_w, half_h) = (w * 0.5, h * 0.5);

    let walls = [
        // position, half extents
        (Vec2::new(0.0, half_h + t * 0.5), Vec2::new(half_w + t, t * 0.5)),
        (Vec2::new(0.0, -half_h - t * 0.5), Vec2::new(half_w + t, t * 0.5)),
        (Vec2::new(-half_w - t * 0.5, 0.0), Vec2::new(t * 0.5, half_h + t)),
        (Vec2::new(half_w + t * 0.5, 0.0), Vec2::new(t * 0.5, half_h + t)),
    ];
    for (pos, half) in walls {
        commands.spawn((
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Restitution::coefficient(cfg.physics.restitution),
            Friction::coefficient(cfg.physics.friction),
            Sprite::from_color(WALL_COLOR, half * 2.0),
            Wall,
        ));
    }
}

/// Player marble(s) on the horizontal axis, targets on a ring around the
/// center, then the match state is (re)seeded with the target population.
fn spawn_marbles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    windows_q: Query<&Window>,
    cfg: Res<GameConfig>,
    mut state: ResMut<MatchState>,
) {
    let (w, h) = arena_extent(&windows_q, &cfg);
    let circle = meshes.add(Mesh::from(Circle { radius: 0.5 }));
    let m = &cfg.marbles;

    let player_x = w * 0.3;
    spawn_marble(
        &mut commands,
        &mut materials,
        &circle,
        &cfg,
        Vec2::new(-player_x, 0.0),
        m.player_radius,
        PLAYER_ONE_COLOR,
        MarbleKind::Player(PlayerSlot::One),
    );
    if cfg.match_rules.two_player {
        spawn_marble(
            &mut commands,
            &mut materials,
            &circle,
            &cfg,
            Vec2::new(player_x, 0.0),
            m.player_radius,
            PLAYER_TWO_COLOR,
            MarbleKind::Player(PlayerSlot::Two),
        );
    }

    let phase = if m.ring_jitter {
        rand::thread_rng().gen_range(0.0..TAU)
    } else {
        0.0
    };
    let mut targets = Vec::with_capacity(m.target_count);
    for i in 0..m.target_count {
        let angle = phase + (i as f32 / m.target_count as f32) * TAU;
        let pos = Vec2::new(
            angle.cos() * w * m.ring_scale,
            angle.sin() * h * m.ring_scale,
        );
        let color = TARGET_COLORS[i % TARGET_COLORS.len()];
        let e = spawn_marble(
            &mut commands,
            &mut materials,
            &circle,
            &cfg,
            pos,
            m.target_radius,
            color,
            MarbleKind::Target,
        );
        targets.push(e);
    }

    state.begin_match(cfg.match_rules.two_player, targets);
    info!(
        targets = m.target_count,
        two_player = cfg.match_rules.two_player,
        "match started"
    );
}

enum MarbleKind {
    Player(PlayerSlot),
    Target,
}

#[allow(clippy::too_many_arguments)]
fn spawn_marble(
    commands: &mut Commands,
    materials: &mut Assets<ColorMaterial>,
    circle: &Handle<Mesh>,
    cfg: &GameConfig,
    pos: Vec2,
    radius: f32,
    color: Color,
    kind: MarbleKind,
) -> Entity {
    let material = materials.add(color);
    let mut entity = commands.spawn((
        Transform::from_translation(pos.extend(0.0)),
        RigidBody::Dynamic,
        Collider::ball(radius),
        Velocity::zero(),
        Restitution::coefficient(cfg.physics.restitution),
        Friction::coefficient(cfg.physics.friction),
        Damping {
            linear_damping: cfg.physics.linear_damping,
            angular_damping: 1.0,
        },
        ActiveEvents::COLLISION_EVENTS,
        Marble,
        MarbleRadius(radius),
    ));
    match kind {
        MarbleKind::Player(slot) => {
            entity.insert((
                PlayerMarble(slot),
                ExternalImpulse::default(),
                AdditionalMassProperties::Mass(1.0),
            ));
        }
        MarbleKind::Target => {
            entity.insert(TargetMarble);
        }
    }
    entity.with_children(|parent| {
        parent.spawn((
            Mesh2d(circle.clone()),
            MeshMaterial2d(material),
            Transform::from_scale(Vec3::splat(radius * 2.0)),
        ));
    });
    entity.id()
}

fn arena_extent(windows_q: &Query<&Window>, cfg: &GameConfig) -> (f32, f32) {
    match windows_q.single() {
        Ok(window) => (window.width(), window.height()),
        // Headless runs fall back to the configured resolution.
        Err(_) => (cfg.window.width, cfg.window.height),
    }
}
