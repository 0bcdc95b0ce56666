//! Keyboard tracking and the frame-stepped physics for the player body.
//!
//! The simulation is deliberately frame-stepped rather than delta-scaled: one rendered frame is
//! one integration step, with velocity in pixels per frame. Gravity accumulates only while the
//! body is airborne; the landing resolver zeroes vertical velocity for frames where the player
//! rests on a platform.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::animation::advance_frames;
use crate::level::{CanvasRect, CANVAS_HEIGHT};
use crate::player::Player;
use crate::state::{GameSet, GameState};

/// Downward acceleration, in pixels per frame per frame.
pub const GRAVITY: f32 = 0.5;

/// Instant upward impulse applied on a jump key-down edge, in pixels per frame.
pub const JUMP_IMPULSE: f32 = 15.0;

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
const JUMP_KEYS: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>().add_systems(
            Update,
            (
                track_input.in_set(GameSet::Input),
                apply_kinematics.in_set(GameSet::Physics),
            )
                .run_if(in_state(GameState::Running)),
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

/// Logical movement intent derived from the keyboard. This resource outlives rounds: the round
/// reset rebuilds the world but never touches pressed flags or the remembered direction, so a
/// key held across a reset keeps working.
#[derive(Resource, Default)]
pub struct InputState {
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Most recently pressed direction key, held or not. `None` until the first directional
    /// press; disambiguates which standing sprite to show once both directions are released.
    pub last_direction: Option<Direction>,
}

/// Maps raw key state onto logical intents. Two physical keys are bound per action. The jump
/// impulse applies on every key-down edge with no ground check, so a press while airborne stacks
/// another impulse onto the current fall.
fn track_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<InputState>,
    mut query: Query<&mut Velocity, With<Player>>,
) {
    input.left_pressed = keyboard.any_pressed(LEFT_KEYS);
    input.right_pressed = keyboard.any_pressed(RIGHT_KEYS);

    if keyboard.any_just_pressed(LEFT_KEYS) {
        input.last_direction = Some(Direction::Left);
    }
    if keyboard.any_just_pressed(RIGHT_KEYS) {
        input.last_direction = Some(Direction::Right);
    }

    if keyboard.any_just_pressed(JUMP_KEYS) {
        for mut velocity in &mut query {
            velocity.y -= JUMP_IMPULSE;
        }
    }
}

/// Velocity in canvas pixels per frame, y growing downward.
#[derive(Component, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

/// One integration step: advance the animation frame counter, move by the current velocity, then
/// accumulate gravity if the projected next position is still above the canvas floor. When the
/// projection reaches the floor the velocity is left exactly as the resolver set it.
fn apply_kinematics(mut query: Query<(&mut Player, &mut CanvasRect, &mut Velocity)>) {
    for (mut player, mut rect, mut velocity) in &mut query {
        player.frames = advance_frames(player.frames, player.sprite);
        integrate(&mut rect.pos, &mut velocity.0, rect.size.y);
    }
}

/// The body step itself, pure for testing: `position += velocity`, then gravity while airborne.
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, height: f32) {
    pos.x += vel.x;
    pos.y += vel.y;

    if pos.y + height + vel.y <= CANVAS_HEIGHT {
        vel.y += GRAVITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_advances_by_velocity_each_step() {
        let mut pos = Vec2::new(100.0, 100.0);
        let mut vel = Vec2::new(10.0, 2.0);

        integrate(&mut pos, &mut vel, 150.0);

        assert_eq!(pos, Vec2::new(110.0, 102.0));
    }

    #[test]
    fn gravity_accumulates_while_airborne() {
        let mut pos = Vec2::new(100.0, 100.0);
        let mut vel = Vec2::new(0.0, 0.0);

        integrate(&mut pos, &mut vel, 150.0);
        assert_eq!(vel.y, GRAVITY);

        integrate(&mut pos, &mut vel, 150.0);
        assert_eq!(vel.y, GRAVITY * 2.0);
    }

    #[test]
    fn gravity_stops_at_the_canvas_floor() {
        // Bottom edge projected past the floor: velocity must be left untouched.
        let mut pos = Vec2::new(100.0, CANVAS_HEIGHT - 150.0);
        let mut vel = Vec2::new(0.0, 1.0);

        integrate(&mut pos, &mut vel, 150.0);

        assert_eq!(vel.y, 1.0);
    }

    #[test]
    fn zeroed_velocity_regrows_only_once_airborne_again() {
        // A resolver-zeroed body hovering above a platform far from the floor starts falling
        // again on the next step.
        let mut pos = Vec2::new(100.0, 320.0);
        let mut vel = Vec2::new(0.0, 0.0);

        integrate(&mut pos, &mut vel, 150.0);

        assert_eq!(vel.y, GRAVITY);
    }
}
