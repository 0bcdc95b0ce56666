//! Sprite selection for the player: a four-state machine picking the active sheet from the
//! current movement intent and the remembered direction, plus the frame-cycling that loops each
//! strip.

use bevy::prelude::*;

use crate::level::CanvasRect;
use crate::movement::{Direction, InputState};
use crate::player::{Player, PlayerSprites, PLAYER_HEIGHT};
use crate::state::{GameSet, GameState};

/// Every sheet is a single row of frames this tall.
pub const SHEET_ROW_HEIGHT: u32 = 400;

/// Crop and display metadata for one family of sheets. The standing and running sheets are cut
/// differently and render at different widths, which also changes the collision hitbox.
pub struct SpriteVariant {
    pub crop_width: u32,
    pub display_width: f32,
    pub frame_count: usize,
    /// Highest frame index before the counter wraps to 0.
    pub frame_cap: usize,
}

pub const STAND_VARIANT: SpriteVariant = SpriteVariant {
    crop_width: 177,
    display_width: 66.0,
    frame_count: 60,
    frame_cap: 59,
};

pub const RUN_VARIANT: SpriteVariant = SpriteVariant {
    crop_width: 341,
    display_width: 127.875,
    frame_count: 30,
    frame_cap: 29,
};

/// The four poses the avatar can show.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpriteState {
    StandRight,
    StandLeft,
    RunRight,
    RunLeft,
}

impl SpriteState {
    pub fn is_running(self) -> bool {
        matches!(self, SpriteState::RunRight | SpriteState::RunLeft)
    }

    pub fn variant(self) -> &'static SpriteVariant {
        if self.is_running() {
            &RUN_VARIANT
        } else {
            &STAND_VARIANT
        }
    }
}

/// The transition table, evaluated in order with the first match winning:
/// run in the held direction when it is also the remembered one, otherwise fall back to the
/// standing pose of the remembered direction once that key is released. Returns `None` when the
/// current pose already matches, so a transition fires exactly once per change.
pub fn next_sprite(input: &InputState, current: SpriteState) -> Option<SpriteState> {
    if input.right_pressed
        && input.last_direction == Some(Direction::Right)
        && current != SpriteState::RunRight
    {
        Some(SpriteState::RunRight)
    } else if input.left_pressed
        && input.last_direction == Some(Direction::Left)
        && current != SpriteState::RunLeft
    {
        Some(SpriteState::RunLeft)
    } else if !input.left_pressed
        && input.last_direction == Some(Direction::Left)
        && current != SpriteState::StandLeft
    {
        Some(SpriteState::StandLeft)
    } else if !input.right_pressed
        && input.last_direction == Some(Direction::Right)
        && current != SpriteState::StandRight
    {
        Some(SpriteState::StandRight)
    } else {
        None
    }
}

/// Advances the frame counter and wraps it at the active strip's own cap. The running strips
/// are half the length of the standing ones, so the cap follows the current pose.
pub fn advance_frames(frames: usize, sprite: SpriteState) -> usize {
    let next = frames + 1;
    if next > sprite.variant().frame_cap {
        0
    } else {
        next
    }
}

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            select_sprite
                .in_set(GameSet::Animate)
                .run_if(in_state(GameState::Running)),
        );
    }
}

/// Applies the transition table to the avatar: on a pose change, swap the sheet and atlas
/// layout, restart the strip at frame 1, and resize the hitbox to the new display width. The
/// atlas index is re-synced every frame so the advancing counter actually plays the strip.
fn select_sprite(
    input: Res<InputState>,
    sprites: Res<PlayerSprites>,
    mut query: Query<(
        &mut Player,
        &mut CanvasRect,
        &mut Handle<Image>,
        &mut TextureAtlas,
        &mut Sprite,
    )>,
) {
    for (mut player, mut rect, mut texture, mut atlas, mut sprite) in &mut query {
        if let Some(next) = next_sprite(&input, player.sprite) {
            let variant = next.variant();
            player.sprite = next;
            player.frames = 1;
            rect.size.x = variant.display_width;
            *texture = sprites.sheet_for(next);
            atlas.layout = sprites.layout_for(next);
            sprite.custom_size = Some(Vec2::new(variant.display_width, PLAYER_HEIGHT));
        }

        atlas.index = player.frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(left: bool, right: bool, last: Option<Direction>) -> InputState {
        InputState {
            left_pressed: left,
            right_pressed: right,
            last_direction: last,
        }
    }

    #[test]
    fn holding_right_switches_to_run_right_once() {
        let held = input(false, true, Some(Direction::Right));

        assert_eq!(
            next_sprite(&held, SpriteState::StandRight),
            Some(SpriteState::RunRight)
        );
        // Already running right: no re-entry, so the frame counter keeps cycling.
        assert_eq!(next_sprite(&held, SpriteState::RunRight), None);
    }

    #[test]
    fn releasing_right_with_no_left_history_ends_standing_right() {
        let released = input(false, false, Some(Direction::Right));

        assert_eq!(
            next_sprite(&released, SpriteState::RunRight),
            Some(SpriteState::StandRight)
        );
        assert_ne!(
            next_sprite(&released, SpriteState::RunRight),
            Some(SpriteState::StandLeft)
        );
    }

    #[test]
    fn remembered_direction_wins_over_released_key() {
        // Left still held but the last press was right: the run-right arm matches first.
        let both = input(true, true, Some(Direction::Right));
        assert_eq!(
            next_sprite(&both, SpriteState::StandRight),
            Some(SpriteState::RunRight)
        );
    }

    #[test]
    fn no_transition_before_any_direction_was_pressed() {
        let idle = input(false, false, None);
        assert_eq!(next_sprite(&idle, SpriteState::StandRight), None);

        let pressed_without_history = input(false, true, None);
        assert_eq!(next_sprite(&pressed_without_history, SpriteState::StandRight), None);
    }

    #[test]
    fn stand_strip_wraps_after_its_cap() {
        assert_eq!(advance_frames(58, SpriteState::StandRight), 59);
        assert_eq!(advance_frames(59, SpriteState::StandRight), 0);
    }

    #[test]
    fn run_strip_wraps_at_its_own_shorter_cap() {
        assert_eq!(advance_frames(28, SpriteState::RunLeft), 29);
        assert_eq!(advance_frames(29, SpriteState::RunLeft), 0);
        // The standing cap does not apply to a running pose.
        assert_eq!(advance_frames(30, SpriteState::RunLeft), 0);
    }
}
