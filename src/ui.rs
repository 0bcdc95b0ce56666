//! Score HUD and the victory overlay.
//!
//! UI entities live in Bevy's ECS; despawning the overlay on state exit drops all of its style
//! and text components automatically.

use bevy::prelude::*;

use crate::round::RoundState;
use crate::score::Identity;
use crate::state::GameState;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud)
            .add_systems(OnEnter(GameState::Won), spawn_win_overlay)
            .add_systems(OnExit(GameState::Won), despawn_win_overlay);
    }
}

#[derive(Component)]
struct ScoreHud;

#[derive(Component)]
struct WinOverlay;

/// One line of black text pinned to the top-left corner, rewritten every frame.
fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        ScoreHud,
        Name::new("ScoreHud"),
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 20.0,
                color: Color::BLACK,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        }),
    ));
}

fn update_hud(
    identity: Res<Identity>,
    round: Res<RoundState>,
    mut query: Query<&mut Text, With<ScoreHud>>,
) {
    for mut text in &mut query {
        text.sections[0].value = format!(
            "{}( {}) - Score: {}",
            identity.username, identity.wallet, round.score
        );
    }
}

/// Full-screen blue fill with the victory text and the frozen final score, centered. The score
/// read here no longer changes; the round clock stopped when the win was detected.
fn spawn_win_overlay(round: Res<RoundState>, mut commands: Commands) {
    commands
        .spawn((
            WinOverlay,
            Name::new("WinOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgb(0.0, 0.0, 1.0)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "You won!",
                TextStyle {
                    font_size: 30.0,
                    color: Color::WHITE,
                    ..default()
                },
            ));
            parent.spawn(TextBundle::from_section(
                format!("Final score: {}", round.score),
                TextStyle {
                    font_size: 30.0,
                    color: Color::WHITE,
                    ..default()
                },
            ));
        });
}

fn despawn_win_overlay(mut commands: Commands, query: Query<Entity, With<WinOverlay>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
