//! Round lifecycle: the score clock, the win/lose evaluation, and the reset path that rebuilds
//! the world for the next round.
//!
//! Everything a round owns hangs off the `RoundState` resource; resetting it plus respawning
//! the world entities is all a restart takes. Keyboard state is deliberately left alone so keys
//! held across a reset keep working.

use bevy::prelude::*;
use bevy::time::Stopwatch;

use crate::level::{self, CanvasRect, Collidable, WorldAssets, WorldGeometry, CANVAS_HEIGHT};
use crate::player::{self, Player, PlayerSprites};
use crate::score;
use crate::state::{GameSet, GameState};

/// How far before the end of the map the win line sits, in scroll-offset pixels.
const WIN_MARGIN: f32 = 400.0;

/// Delay between winning and the next round starting.
const RESTART_DELAY_SECS: f32 = 2.0;

/// Fired whenever the world must be rebuilt: after loading finishes, after a loss, and when the
/// post-win timer runs out.
#[derive(Event)]
pub struct ResetRound;

/// Everything one round owns. The scroll offset is kept in `[0, map_length]` by the scroll
/// controller; `score_sent` guarantees at most one relay submission per round no matter how
/// many frames the win condition stays true.
#[derive(Resource)]
pub struct RoundState {
    pub scroll_offset: f32,
    pub clock: Stopwatch,
    pub score: u64,
    pub ended: bool,
    pub score_sent: bool,
    pub restart: Timer,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            scroll_offset: 0.0,
            clock: Stopwatch::new(),
            score: 0,
            ended: false,
            score_sent: false,
            restart: Timer::from_seconds(RESTART_DELAY_SECS, TimerMode::Once),
        }
    }
}

impl RoundState {
    /// Back to a fresh round: zero offset, zero score, all flags cleared.
    pub fn reset(&mut self) {
        self.scroll_offset = 0.0;
        self.clock.reset();
        self.score = 0;
        self.ended = false;
        self.score_sent = false;
        self.restart.reset();
    }

    /// Claims the one score submission a round is allowed. The first caller gets `true`,
    /// everyone after gets `false`.
    pub fn take_submission(&mut self) -> bool {
        if self.score_sent {
            return false;
        }
        self.score_sent = true;
        true
    }
}

/// The round has been won once the camera has scrolled to within the margin of the map's end.
pub fn round_won(scroll_offset: f32, map_length: f32) -> bool {
    scroll_offset > map_length - WIN_MARGIN
}

/// The round is lost once the player's top edge drops below the canvas.
pub fn round_lost(player_top: f32) -> bool {
    player_top > CANVAS_HEIGHT
}

pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoundState>()
            .add_event::<ResetRound>()
            .add_systems(
                Update,
                (tick_score, evaluate_round)
                    .chain()
                    .in_set(GameSet::Round)
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(OnEnter(GameState::Won), (score::report_score, arm_restart))
            .add_systems(Update, tick_restart.run_if(in_state(GameState::Won)))
            .add_systems(Update, reset_round.after(GameSet::Round));
    }
}

fn tick_score(time: Res<Time>, mut round: ResMut<RoundState>) {
    advance_clock(&mut round, time.delta());
}

/// Advances the round clock and derives the score: whole seconds since the round began. Stops
/// writing once the round has ended, freezing the value the overlay and the relay see.
pub fn advance_clock(round: &mut RoundState, delta: std::time::Duration) {
    if round.ended {
        return;
    }
    round.clock.tick(delta);
    round.score = round.clock.elapsed().as_secs();
}

/// Win before lose: a frame satisfying both resolves in favour of the win.
fn evaluate_round(
    geometry: Res<WorldGeometry>,
    mut round: ResMut<RoundState>,
    player_query: Query<&CanvasRect, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut resets: EventWriter<ResetRound>,
) {
    let Ok(rect) = player_query.get_single() else {
        return;
    };

    if round_won(round.scroll_offset, geometry.map_length()) {
        round.ended = true;
        info!("Round won with score {}.", round.score);
        next_state.set(GameState::Won);
    } else if round_lost(rect.pos.y) {
        info!("Round lost after {} seconds.", round.score);
        resets.send(ResetRound);
    }
}

fn arm_restart(mut round: ResMut<RoundState>) {
    round.restart.reset();
}

fn tick_restart(
    time: Res<Time>,
    mut round: ResMut<RoundState>,
    mut resets: EventWriter<ResetRound>,
) {
    if round.restart.tick(time.delta()).just_finished() {
        resets.send(ResetRound);
    }
}

/// Tears the world down and builds the next round: despawn every world entity and the avatar,
/// respawn both from the cached geometry and art, and clear the round bookkeeping. Runs on the
/// reset event from any state; multiple events in one frame collapse into a single rebuild.
fn reset_round(
    mut resets: EventReader<ResetRound>,
    mut commands: Commands,
    geometry: Res<WorldGeometry>,
    world_assets: Res<WorldAssets>,
    sprites: Res<PlayerSprites>,
    mut round: ResMut<RoundState>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    stale: Query<Entity, Or<(With<Collidable>, With<Player>)>>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    for entity in &stale {
        commands.entity(entity).despawn_recursive();
    }

    level::spawn_world(&mut commands, &geometry, &world_assets);
    player::spawn_player(&mut commands, &sprites);
    round.reset();

    if *state.get() != GameState::Running {
        next_state.set(GameState::Running);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_LENGTH: f32 = 3900.0;

    #[test]
    fn win_line_sits_inside_the_margin() {
        assert!(!round_won(MAP_LENGTH - 400.0, MAP_LENGTH));
        assert!(round_won(MAP_LENGTH - 399.0, MAP_LENGTH));
        assert!(round_won(MAP_LENGTH, MAP_LENGTH));
    }

    #[test]
    fn falling_past_the_canvas_loses() {
        assert!(!round_lost(CANVAS_HEIGHT));
        assert!(round_lost(CANVAS_HEIGHT + 1.0));
    }

    #[test]
    fn score_counts_whole_seconds_and_freezes_once_ended() {
        use std::time::Duration;

        let mut round = RoundState::default();
        advance_clock(&mut round, Duration::from_millis(1500));
        assert_eq!(round.score, 1);
        advance_clock(&mut round, Duration::from_millis(700));
        assert_eq!(round.score, 2);

        round.ended = true;
        advance_clock(&mut round, Duration::from_secs(5));
        assert_eq!(round.score, 2);
    }

    #[test]
    fn only_one_submission_per_round() {
        let mut round = RoundState::default();

        assert!(round.take_submission());
        // The win condition stays true frame after frame; further claims must fail.
        assert!(!round.take_submission());
        assert!(!round.take_submission());
    }

    #[test]
    fn reset_clears_the_round_but_rearms_submission() {
        let mut round = RoundState::default();
        round.scroll_offset = 1234.0;
        round.score = 42;
        round.ended = true;
        assert!(round.take_submission());

        round.reset();

        assert_eq!(round.scroll_offset, 0.0);
        assert_eq!(round.score, 0);
        assert!(!round.ended);
        assert!(round.take_submission());
    }
}
