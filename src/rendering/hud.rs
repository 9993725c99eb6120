use bevy::prelude::*;

use crate::app::state::AppState;
use crate::gameplay::match_state::{MatchState, MatchWon};

#[derive(Component)]
struct HudStatusText;

#[derive(Component)]
struct WinBanner;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), spawn_hud)
            .add_systems(
                Update,
                (update_status_text, show_win_banner).run_if(in_state(AppState::Playing)),
            );
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudStatusText,
    ));
}

fn update_status_text(
    state: Res<MatchState>,
    mut q: Query<&mut Text, With<HudStatusText>>,
) {
    if !state.is_changed() {
        return;
    }
    let Ok(mut text) = q.single_mut() else {
        return;
    };
    text.0 = if state.two_player() {
        format!(
            "Targets left: {}   {} to play",
            state.remaining(),
            state.active_player()
        )
    } else {
        format!("Targets left: {}", state.remaining())
    };
}

fn show_win_banner(
    mut ev: EventReader<MatchWon>,
    state: Res<MatchState>,
    existing: Query<(), With<WinBanner>>,
    mut commands: Commands,
) {
    for won in ev.read() {
        if !existing.is_empty() {
            continue;
        }
        let label = if state.two_player() {
            format!("{} wins!", won.winner)
        } else {
            "All targets cleared!".to_string()
        };
        commands.spawn((
            Text::new(label),
            TextFont {
                font_size: 52.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 0.92, 0.3)),
            TextLayout::new_with_justify(JustifyText::Center),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Percent(42.0),
                ..default()
            },
            WinBanner,
        ));
    }
}
