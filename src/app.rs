//! High-level plugin composition.
//!
//! `HillsideRunnerPlugin` glues together all domain-specific plugins (world, player, movement,
//! scrolling, collisions, animation, round lifecycle, UI) and pins down system ordering. Each
//! subsystem owns its own state; this orchestrator merely registers them with the Bevy
//! application.

use bevy::prelude::*;

use crate::animation::AnimationPlugin;
use crate::camera::CameraPlugin;
use crate::collision::CollisionPlugin;
use crate::level::LevelPlugin;
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::round::RoundPlugin;
use crate::state::{GameSet, GameState};
use crate::ui::UiPlugin;

/// Bundles every gameplay plugin into a single unit added to the Bevy `App`. Memory for each
/// plugin is managed by Bevy; when the app shuts down, everything these plugins own is dropped
/// automatically.
pub struct HillsideRunnerPlugin;

impl Plugin for HillsideRunnerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                LevelPlugin,     // World art loading + geometry capture.
                PlayerPlugin,    // Sprite sheet loading + avatar spawning.
                MovementPlugin,  // Keyboard intents + frame-stepped physics.
                CameraPlugin,    // Scroll decision + canvas-to-world transform.
                CollisionPlugin, // Landing resolution against the platforms.
                AnimationPlugin, // Pose selection + strip cycling.
                RoundPlugin,     // Score clock, win/lose, round resets.
                UiPlugin,        // Score HUD + victory overlay.
            ))
            // One simulation step per rendered frame. `chain()` enforces
            // Input → Physics → Scroll → Collision → Animate → Round, so velocities written by
            // the scroll controller and the landing resolver land in deterministic stages.
            .configure_sets(
                Update,
                (
                    GameSet::Input,
                    GameSet::Physics,
                    GameSet::Scroll,
                    GameSet::Collision,
                    GameSet::Animate,
                    GameSet::Round,
                )
                    .chain()
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(Startup, setup_camera);
    }
}

/// Spawns the fixed 2D camera. It never moves; scrolling shifts the world entities instead, so
/// there is no follow behaviour to maintain.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Name::new("MainCamera"), Camera2dBundle::default()));
}
