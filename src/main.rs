use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierDebugRenderPlugin;

use marble_flick::{GameConfig, GamePlugin};

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "marble-flick", about = "Flick the marble, clear the board")]
    pub struct Args {
        /// Extra config layers applied over assets/config/game.ron.
        #[arg(long = "config")]
        pub config: Vec<PathBuf>,
        /// Force two-player mode regardless of config.
        #[arg(long)]
        pub two_player: bool,
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> (GameConfig, Vec<String>) {
    // Embed base config (no layered local override on wasm).
    const RAW: &str = include_str!("../assets/config/game.ron");
    match ron::from_str(RAW) {
        Ok(cfg) => (cfg, Vec::new()),
        Err(e) => (
            GameConfig::default(),
            vec![format!("embedded config parse failure: {e}; using defaults")],
        ),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(extra: &[std::path::PathBuf]) -> (GameConfig, Vec<String>) {
    let mut paths = vec![
        std::path::PathBuf::from("assets/config/game.ron"),
        std::path::PathBuf::from("assets/config/game.local.ron"),
    ];
    paths.extend_from_slice(extra);
    let (cfg, used, errors) = GameConfig::load_layered(&paths);
    let mut notes = errors;
    if used.is_empty() {
        notes.push("no config layers found; using defaults".into());
    }
    (cfg, notes)
}

/// Config issues are logged once logging is up, not lost to pre-init macros.
#[derive(Resource)]
struct ConfigLoadNotes(Vec<String>);

fn log_config_notes(notes: Res<ConfigLoadNotes>, cfg: Res<GameConfig>) {
    for n in &notes.0 {
        warn!("CONFIG: {n}");
    }
    for w in cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!(
        two_player = cfg.match_rules.two_player,
        targets = cfg.marbles.target_count,
        "starting match setup"
    );
}

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    #[cfg(not(target_arch = "wasm32"))]
    let (cfg, notes) = {
        use clap::Parser;
        let args = cli::Args::parse();
        for p in &args.config {
            if !p.exists() {
                anyhow::bail!("config layer not found: {}", p.display());
            }
        }
        let (mut cfg, notes) = load_config(&args.config);
        if args.two_player {
            cfg.match_rules.two_player = true;
        }
        (cfg, notes)
    };
    #[cfg(target_arch = "wasm32")]
    let (cfg, notes) = {
        let (mut cfg, notes) = load_config();
        // No timed exit on the web; resolution comes from the canvas.
        cfg.window.auto_close = 0.0;
        (cfg, notes)
    };

    let rapier_debug = cfg.rapier_debug;
    let mut app = App::new();
    app.insert_resource(ConfigLoadNotes(notes))
        .insert_resource(cfg.clone())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .add_systems(Startup, log_config_notes);

    if rapier_debug {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }

    app.run();
    Ok(())
}
