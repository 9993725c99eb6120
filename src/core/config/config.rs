use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Marble Flick".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_x: f32,
    pub gravity_y: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
}
impl Default for PhysicsConfig {
    // Top-down table: gravity off on both axes, marbles coast to rest via damping.
    fn default() -> Self {
        Self {
            gravity_x: 0.0,
            gravity_y: 0.0,
            restitution: 0.6,
            friction: 0.1,
            linear_damping: 0.4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub wall_thickness: f32,
}
impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MarbleLayoutConfig {
    pub player_radius: f32,
    pub target_radius: f32,
    pub target_count: usize,
    /// Target ring radius as a fraction of the arena half-extent per axis.
    pub ring_scale: f32,
    /// Randomize the angular phase of the target ring each match.
    pub ring_jitter: bool,
}
impl Default for MarbleLayoutConfig {
    fn default() -> Self {
        Self {
            player_radius: 15.0,
            target_radius: 12.0,
            target_count: 5,
            ring_scale: 0.2,
            ring_jitter: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    pub force_multiplier: f32,
    pub max_drag_distance: f32,
    /// Extra pickup slack beyond the marble radius.
    pub pickup_tolerance: f32,
}
impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            force_multiplier: 0.001,
            max_drag_distance: 200.0,
            pickup_tolerance: 15.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    pub two_player: bool,
    /// Seconds between the final capture and the win announcement.
    pub win_delay: f32,
    /// Seconds between a launch and the hand-off to the other player.
    pub turn_delay: f32,
}
impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            two_player: false,
            win_delay: 0.3,
            turn_delay: 0.6,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub arena: ArenaConfig,
    pub marbles: MarbleLayoutConfig,
    pub launch: LaunchConfig,
    #[serde(rename = "match")]
    pub match_rules: MatchConfig,
    pub rapier_debug: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            physics: Default::default(),
            arena: Default::default(),
            marbles: Default::default(),
            launch: Default::default(),
            match_rules: Default::default(),
            rapier_debug: false,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Layered load: later paths override earlier ones key-by-key. Missing or
    /// unparsable layers are reported, never fatal.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        let mut replaced = false;
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                let val = incoming.take().unwrap();
                                merge_value(ev, val);
                                replaced = true;
                                break;
                            }
                        }
                        if !replaced {
                            bm.insert(k, incoming.unwrap());
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        if let Some(val) = merged {
            match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => (GameConfig::default(), used, {
                    let mut evec = errors;
                    evec.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    evec
                }),
            }
        } else {
            (GameConfig::default(), used, errors)
        }
    }

    /// Non-fatal sanity warnings. Logic stays permissive; this only surfaces
    /// configs that would make the game unplayable or visibly odd.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if !(0.0..=1.5).contains(&self.physics.restitution) {
            w.push(format!(
                "physics.restitution {} outside recommended 0..1.5",
                self.physics.restitution
            ));
        }
        if self.physics.friction < 0.0 {
            w.push("physics.friction negative".into());
        }
        if self.physics.linear_damping < 0.0 {
            w.push("physics.linear_damping negative -> marbles never settle".into());
        }
        if self.arena.wall_thickness <= 0.0 {
            w.push("arena.wall_thickness must be > 0".into());
        }
        if self.marbles.player_radius <= 0.0 {
            w.push("marbles.player_radius must be > 0".into());
        }
        if self.marbles.target_radius <= 0.0 {
            w.push("marbles.target_radius must be > 0".into());
        }
        if self.marbles.target_count == 0 {
            w.push("marbles.target_count is 0; the match is won immediately".into());
        }
        if !(0.0..=0.5).contains(&self.marbles.ring_scale) {
            w.push(format!(
                "marbles.ring_scale {} outside 0..0.5; targets may spawn inside walls",
                self.marbles.ring_scale
            ));
        }
        if self.launch.force_multiplier <= 0.0 {
            w.push("launch.force_multiplier must be > 0; launches will do nothing".into());
        }
        if self.launch.max_drag_distance <= 0.0 {
            w.push("launch.max_drag_distance must be > 0".into());
        }
        if self.launch.pickup_tolerance < 0.0 {
            w.push("launch.pickup_tolerance negative -> pickup zone smaller than the marble".into());
        }
        if self.match_rules.win_delay < 0.0 {
            w.push("match.win_delay negative -> treated as immediate".into());
        }
        if self.match_rules.turn_delay < 0.0 {
            w.push("match.turn_delay negative -> treated as immediate".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_clean() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn bad_values_warn() {
        let mut cfg = GameConfig::default();
        cfg.launch.force_multiplier = 0.0;
        cfg.marbles.target_count = 0;
        cfg.match_rules.turn_delay = -1.0;
        let warns = cfg.validate();
        assert!(warns.iter().any(|w| w.contains("force_multiplier")));
        assert!(warns.iter().any(|w| w.contains("target_count")));
        assert!(warns.iter().any(|w| w.contains("turn_delay")));
    }
}
