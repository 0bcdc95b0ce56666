//! Landing resolution: converts downward motion into a stop when the player falls onto the top
//! of a platform. Side and bottom contacts are deliberately not detected.

use bevy::prelude::*;

use crate::level::{CanvasRect, Collidable, CollidableKind};
use crate::movement::Velocity;
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            resolve_landings
                .in_set(GameSet::Collision)
                .run_if(in_state(GameState::Running)),
        );
    }
}

/// The landing predicate: the player's bottom edge is at or above the platform's top, the
/// projected bottom edge (current + vertical velocity) reaches or passes it, and the player's
/// right edge lies within the platform's horizontal span.
pub fn lands_on(player: &CanvasRect, vertical_velocity: f32, platform: &CanvasRect) -> bool {
    player.bottom() <= platform.pos.y
        && player.bottom() + vertical_velocity >= platform.pos.y
        && player.right() >= platform.pos.x
        && player.right() <= platform.right()
}

/// Tests the player against every platform each frame and zeroes vertical velocity on a hit.
/// Every platform is evaluated; there is no early exit.
fn resolve_landings(
    mut player_query: Query<(&CanvasRect, &mut Velocity), With<Player>>,
    platforms: Query<(&Collidable, &CanvasRect), Without<Player>>,
) {
    for (player_rect, mut velocity) in &mut player_query {
        for (collidable, platform_rect) in &platforms {
            if collidable.kind != CollidableKind::Platform {
                continue;
            }
            if lands_on(player_rect, velocity.y, platform_rect) {
                velocity.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> CanvasRect {
        CanvasRect::new(Vec2::new(x, y), Vec2::new(66.0, 150.0))
    }

    fn platform_at(x: f32, y: f32) -> CanvasRect {
        CanvasRect::new(Vec2::new(x, y), Vec2::new(580.0, 125.0))
    }

    #[test]
    fn descending_onto_a_platform_top_lands() {
        // Bottom edge at 450, platform top at 470, falling 25 px this frame.
        let player = player_at(100.0, 300.0);
        let platform = platform_at(0.0, 470.0);

        assert!(lands_on(&player, 25.0, &platform));
    }

    #[test]
    fn landing_holds_for_any_velocity_that_reaches_the_top() {
        let player = player_at(100.0, 320.0);
        let platform = platform_at(0.0, 470.0);

        assert!(lands_on(&player, 0.0, &platform));
        assert!(lands_on(&player, 300.0, &platform));
    }

    #[test]
    fn slow_fall_short_of_the_top_keeps_falling() {
        let player = player_at(100.0, 300.0);
        let platform = platform_at(0.0, 470.0);

        // 450 + 5 never reaches 470.
        assert!(!lands_on(&player, 5.0, &platform));
    }

    #[test]
    fn a_body_already_below_the_top_is_ignored() {
        // One-sided test: rising through or clipping a platform from below never lands.
        let player = player_at(100.0, 400.0);
        let platform = platform_at(0.0, 470.0);

        assert!(!lands_on(&player, -10.0, &platform));
    }

    #[test]
    fn only_the_right_edge_decides_horizontal_overlap() {
        let platform = platform_at(200.0, 470.0);

        // Right edge 186, left of the platform: miss.
        let short = player_at(120.0, 300.0);
        assert!(!lands_on(&short, 25.0, &platform));

        // Right edge 266, inside [200, 780]: hit, even though the left edge hangs off.
        let clipped = player_at(200.0, 300.0);
        assert!(lands_on(&clipped, 25.0, &platform));

        // Right edge past the platform's right end: miss.
        let past = player_at(780.0, 300.0);
        assert!(!lands_on(&past, 25.0, &platform));
    }
}
