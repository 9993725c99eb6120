#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use crate::gameplay::match_state::MatchState;
#[cfg(feature = "debug")]
use crate::interaction::drag::ActiveDrag;

#[cfg(feature = "debug")]
#[derive(Resource)]
pub struct DebugLogState {
    pub time_accum: f32,
    pub log_interval: f32,
}

#[cfg(feature = "debug")]
impl Default for DebugLogState {
    fn default() -> Self {
        Self {
            time_accum: 0.0,
            log_interval: 2.0,
        }
    }
}

#[cfg(feature = "debug")]
pub fn debug_logging_system(
    time: Res<Time>,
    mut log_state: ResMut<DebugLogState>,
    state: Res<MatchState>,
    drag: Res<ActiveDrag>,
) {
    log_state.time_accum += time.delta_secs();
    if log_state.time_accum >= log_state.log_interval {
        log_state.time_accum = 0.0;
        info!(
            "MATCH t={:.1}s targets={} active={} won={} dragging={}",
            time.elapsed_secs(),
            state.remaining(),
            state.active_player(),
            state.won(),
            drag.gesture.is_some()
        );
    }
}
