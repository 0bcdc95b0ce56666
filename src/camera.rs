//! Scroll control and the canvas-to-world transform.
//!
//! The camera never moves. Near the screen edges the player walks in canvas space; everywhere
//! else the world slides underneath a stationary player, with backdrops moving at a reduced
//! rate for depth. The accumulated scroll offset is what the round driver measures progress
//! against.

use bevy::prelude::*;

use crate::level::{CanvasRect, Collidable, WorldGeometry, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::movement::{InputState, Velocity};
use crate::player::Player;
use crate::round::RoundState;
use crate::state::{GameSet, GameState};

/// The player walks freely rightward while left of this line; past it, holding right scrolls
/// the world instead.
const WALK_RIGHT_LIMIT: f32 = 400.0;

/// The player walks freely leftward while right of this line. With the world fully scrolled
/// back the limit relaxes to the canvas edge so the player can reach the start of the map.
const WALK_LEFT_LIMIT: f32 = 100.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            run_scroll
                .in_set(GameSet::Scroll)
                .run_if(in_state(GameState::Running)),
        )
        .add_systems(PostUpdate, sync_canvas_transforms);
    }
}

/// What the controller does with one frame of horizontal input. The walk cases always win over
/// the scroll cases; scroll deltas are pre-clamped so the offset never leaves `[0, map_length]`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ScrollAction {
    WalkRight,
    WalkLeft,
    Advance(f32),
    Retreat(f32),
    Stand,
}

/// The four-way decision, pure for testing. Evaluation order is the precedence order.
pub fn decide_scroll(
    input: &InputState,
    player_x: f32,
    scroll_offset: f32,
    map_length: f32,
    speed: f32,
) -> ScrollAction {
    if input.right_pressed && player_x < WALK_RIGHT_LIMIT {
        ScrollAction::WalkRight
    } else if (input.left_pressed && player_x > WALK_LEFT_LIMIT)
        || (input.left_pressed && scroll_offset == 0.0 && player_x > 0.0)
    {
        ScrollAction::WalkLeft
    } else if input.right_pressed && scroll_offset < map_length {
        ScrollAction::Advance(speed.min(map_length - scroll_offset))
    } else if input.left_pressed && scroll_offset > 0.0 {
        ScrollAction::Retreat(speed.min(scroll_offset))
    } else {
        ScrollAction::Stand
    }
}

/// Applies the decision: walking writes the player's horizontal velocity, scrolling shifts
/// every world entity by the applied delta times its parallax factor.
fn run_scroll(
    geometry: Res<WorldGeometry>,
    input: Res<InputState>,
    mut round: ResMut<RoundState>,
    mut player_query: Query<(&Player, &CanvasRect, &mut Velocity)>,
    mut scrollables: Query<(&Collidable, &mut CanvasRect), Without<Player>>,
) {
    let Ok((player, rect, mut velocity)) = player_query.get_single_mut() else {
        return;
    };

    match decide_scroll(
        &input,
        rect.pos.x,
        round.scroll_offset,
        geometry.map_length(),
        player.speed,
    ) {
        ScrollAction::WalkRight => velocity.x = player.speed,
        ScrollAction::WalkLeft => velocity.x = -player.speed,
        ScrollAction::Advance(delta) => {
            velocity.x = 0.0;
            round.scroll_offset += delta;
            shift_world(&mut scrollables, -delta);
        }
        ScrollAction::Retreat(delta) => {
            velocity.x = 0.0;
            round.scroll_offset -= delta;
            shift_world(&mut scrollables, delta);
        }
        ScrollAction::Stand => velocity.x = 0.0,
    }
}

fn shift_world(
    scrollables: &mut Query<(&Collidable, &mut CanvasRect), Without<Player>>,
    delta: f32,
) {
    for (collidable, mut rect) in scrollables {
        rect.pos.x += delta * collidable.kind.parallax();
    }
}

/// Maps canvas rectangles (top-left anchored, y-down) onto Bevy's centered, y-up world so the
/// 2D pipeline can draw them. Z is left untouched; draw depth is fixed at spawn.
pub fn sync_canvas_transforms(mut query: Query<(&CanvasRect, &mut Transform)>) {
    for (rect, mut transform) in &mut query {
        transform.translation.x = rect.pos.x + rect.size.x * 0.5 - CANVAS_WIDTH * 0.5;
        transform.translation.y = CANVAS_HEIGHT * 0.5 - rect.pos.y - rect.size.y * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Direction;
    use crate::player::PLAYER_SPEED;

    const MAP_LENGTH: f32 = 3900.0;

    fn pressing(left: bool, right: bool) -> InputState {
        InputState {
            left_pressed: left,
            right_pressed: right,
            last_direction: if right {
                Some(Direction::Right)
            } else if left {
                Some(Direction::Left)
            } else {
                None
            },
        }
    }

    #[test]
    fn near_left_edge_the_player_walks_instead_of_scrolling() {
        let action = decide_scroll(&pressing(false, true), 50.0, 0.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(action, ScrollAction::WalkRight);
    }

    #[test]
    fn past_the_walk_limit_holding_right_scrolls_the_world() {
        let action = decide_scroll(&pressing(false, true), 500.0, 0.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(action, ScrollAction::Advance(PLAYER_SPEED));
    }

    #[test]
    fn walking_wins_over_scrolling_at_the_boundary() {
        // x just under the limit with scroll room available: the walk case still takes it.
        let action = decide_scroll(&pressing(false, true), 399.0, 1000.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(action, ScrollAction::WalkRight);
    }

    #[test]
    fn left_walk_relaxes_to_the_canvas_edge_when_fully_scrolled_back() {
        // Between 0 and 100 only works while the scroll offset is zero.
        let at_start = decide_scroll(&pressing(true, false), 50.0, 0.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(at_start, ScrollAction::WalkLeft);

        let mid_map = decide_scroll(&pressing(true, false), 50.0, 500.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(mid_map, ScrollAction::Retreat(PLAYER_SPEED));
    }

    #[test]
    fn scroll_clamps_at_the_end_of_the_map() {
        let action = decide_scroll(
            &pressing(false, true),
            500.0,
            MAP_LENGTH - 4.0,
            MAP_LENGTH,
            PLAYER_SPEED,
        );
        assert_eq!(action, ScrollAction::Advance(4.0));

        let at_end = decide_scroll(&pressing(false, true), 500.0, MAP_LENGTH, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(at_end, ScrollAction::Stand);
    }

    #[test]
    fn scroll_clamps_at_the_start_of_the_map() {
        let action = decide_scroll(&pressing(true, false), 120.0, 3.0, MAP_LENGTH, PLAYER_SPEED);
        // x > 100 walks; drop below the walk band to force the scroll branch.
        assert_eq!(action, ScrollAction::WalkLeft);

        let low = decide_scroll(&pressing(true, false), 100.0, 3.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(low, ScrollAction::Retreat(3.0));
    }

    #[test]
    fn no_input_stands_still() {
        let action = decide_scroll(&pressing(false, false), 250.0, 500.0, MAP_LENGTH, PLAYER_SPEED);
        assert_eq!(action, ScrollAction::Stand);
    }
}
