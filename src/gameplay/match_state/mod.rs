use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use crate::app::state::AppState;
use crate::core::components::{PlayerMarble, PlayerSlot};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PostPhysicsAdjustSet;
use crate::interaction::drag::LaunchApplied;

/// A target marble was captured by the active player marble.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetCaptured {
    pub target: Entity,
    pub by: PlayerSlot,
    pub remaining: usize,
}

/// One-shot win signal, emitted after the configured settle delay.
#[derive(Event, Debug, Clone, Copy)]
pub struct MatchWon {
    pub winner: PlayerSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured { remaining: usize },
    /// Not a registered target (never was, or already removed). Always a no-op.
    Ignored,
}

/// All mutable match bookkeeping: remaining targets, active player, win flag.
/// The `generation` counter keys delayed tasks so a reset invalidates stale
/// timers instead of racing them.
#[derive(Resource, Debug)]
pub struct MatchState {
    targets: HashSet<Entity>,
    active: PlayerSlot,
    two_player: bool,
    won: bool,
    generation: u32,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            targets: HashSet::default(),
            active: PlayerSlot::One,
            two_player: false,
            won: false,
            generation: 0,
        }
    }
}

impl MatchState {
    pub fn new(two_player: bool) -> Self {
        Self {
            two_player,
            ..Default::default()
        }
    }

    /// Start a fresh match with the given target population. Bumps the
    /// generation so pending delayed tasks from the previous match are dropped.
    pub fn begin_match(&mut self, two_player: bool, targets: impl IntoIterator<Item = Entity>) {
        self.targets = targets.into_iter().collect();
        self.two_player = two_player;
        self.active = PlayerSlot::One;
        self.won = false;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn capture(&mut self, target: Entity) -> CaptureOutcome {
        if self.targets.remove(&target) {
            CaptureOutcome::Captured {
                remaining: self.targets.len(),
            }
        } else {
            CaptureOutcome::Ignored
        }
    }

    /// Flips the win flag; true only on the first call per match.
    pub fn try_mark_won(&mut self) -> bool {
        if self.won {
            false
        } else {
            self.won = true;
            true
        }
    }

    pub fn switch_player(&mut self) {
        if self.two_player {
            self.active = self.active.other();
        }
    }

    pub fn active_player(&self) -> PlayerSlot {
        self.active
    }

    pub fn two_player(&self) -> bool {
        self.two_player
    }

    pub fn remaining(&self) -> usize {
        self.targets.len()
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Scheduled hand-off to the other player after a launch. Exists only while
/// the delay runs; new drags are ignored while it is pending.
#[derive(Resource, Debug)]
pub struct PendingTurnSwitch {
    pub timer: Timer,
    pub generation: u32,
}

/// Scheduled win announcement, delayed so the final collision settles
/// visually before play is interrupted.
#[derive(Resource, Debug)]
pub struct PendingWinAnnounce {
    pub timer: Timer,
    pub generation: u32,
    pub winner: PlayerSlot,
}

pub struct MatchStatePlugin;

impl Plugin for MatchStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchState>()
            .add_event::<TargetCaptured>()
            .add_event::<MatchWon>()
            .add_systems(
                Update,
                (
                    handle_captures,
                    schedule_turn_switch,
                    tick_turn_switch,
                    tick_win_announce,
                )
                    .chain()
                    .in_set(PostPhysicsAdjustSet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// Consumes Rapier contact-onset events. A capture requires the currently
/// active player marble on one side and a still-registered target on the
/// other; anything else (target/target contact, the idle player's marble,
/// walls, duplicate notifications) falls through as a no-op.
pub fn handle_captures(
    mut collisions: EventReader<CollisionEvent>,
    mut state: ResMut<MatchState>,
    players: Query<&PlayerMarble>,
    cfg: Res<GameConfig>,
    mut ev_captured: EventWriter<TargetCaptured>,
    mut commands: Commands,
) {
    for ev in collisions.read() {
        let CollisionEvent::Started(a, b, _) = ev else {
            continue;
        };
        let (slot, other) = if let Ok(pm) = players.get(*a) {
            (pm.0, *b)
        } else if let Ok(pm) = players.get(*b) {
            (pm.0, *a)
        } else {
            continue;
        };
        if slot != state.active_player() {
            continue;
        }
        match state.capture(other) {
            CaptureOutcome::Captured { remaining } => {
                if let Ok(mut ec) = commands.get_entity(other) {
                    ec.despawn();
                }
                info!("capture by {slot}: {other:?}, {remaining} remaining");
                ev_captured.write(TargetCaptured {
                    target: other,
                    by: slot,
                    remaining,
                });
                if remaining == 0 && state.try_mark_won() {
                    commands.insert_resource(PendingWinAnnounce {
                        timer: Timer::from_seconds(
                            cfg.match_rules.win_delay.max(0.0),
                            TimerMode::Once,
                        ),
                        generation: state.generation(),
                        winner: slot,
                    });
                }
            }
            CaptureOutcome::Ignored => {}
        }
    }
}

/// Two-player only: queue the hand-off strictly after the force was applied.
pub fn schedule_turn_switch(
    mut ev: EventReader<LaunchApplied>,
    state: Res<MatchState>,
    cfg: Res<GameConfig>,
    pending: Option<Res<PendingTurnSwitch>>,
    mut commands: Commands,
) {
    for launch in ev.read() {
        if !state.two_player() || state.won() || pending.is_some() {
            continue;
        }
        debug!("turn switch queued after launch by {}", launch.slot);
        commands.insert_resource(PendingTurnSwitch {
            timer: Timer::from_seconds(cfg.match_rules.turn_delay.max(0.0), TimerMode::Once),
            generation: state.generation(),
        });
    }
}

pub fn tick_turn_switch(
    time: Res<Time>,
    pending: Option<ResMut<PendingTurnSwitch>>,
    mut state: ResMut<MatchState>,
    mut commands: Commands,
) {
    let Some(mut p) = pending else {
        return;
    };
    p.timer.tick(time.delta());
    if !p.timer.finished() {
        return;
    }
    let current = p.generation == state.generation();
    commands.remove_resource::<PendingTurnSwitch>();
    // A won or reset match drops the hand-off instead of firing it late.
    if current && !state.won() {
        state.switch_player();
        info!("turn: {} now active", state.active_player());
    }
}

pub fn tick_win_announce(
    time: Res<Time>,
    pending: Option<ResMut<PendingWinAnnounce>>,
    state: Res<MatchState>,
    mut ev_won: EventWriter<MatchWon>,
    mut commands: Commands,
) {
    let Some(mut p) = pending else {
        return;
    };
    p.timer.tick(time.delta());
    if !p.timer.finished() {
        return;
    }
    let current = p.generation == state.generation();
    let winner = p.winner;
    commands.remove_resource::<PendingWinAnnounce>();
    if current {
        info!("match won by {winner}");
        ev_won.write(MatchWon { winner });
    }
}
