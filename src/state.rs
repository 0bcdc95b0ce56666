//! Round lifecycle definitions. Bevy stores the active state as a plain enum value; switching
//! states simply triggers the matching on-enter/on-exit schedules, so no heap allocations occur
//! when a round ends or restarts.

use bevy::prelude::*;

/// High-level state machine for a round of play.
///
/// `Loading` waits for the world art to resolve so entity sizes are known, `Running` steps the
/// simulation once per rendered frame, and `Won` shows the victory overlay while a one-shot
/// timer counts down to the next round. A lost round never leaves `Running`; the world is
/// rebuilt in place.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Running,
    Won,
}

/// Named system sets that order one simulation step. The chain runs
/// Input → Physics → Scroll → Collision → Animate → Round, so velocity written by the scroll
/// controller and zeroed by the landing resolver is what the next frame's integration reads.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Physics,
    Scroll,
    Collision,
    Animate,
    Round,
}
