//! Player entity lifecycle: sprite sheet loading, spawning a fresh avatar at round start, and
//! the component carrying its per-frame animation bookkeeping.
//!
//! All component memory is owned by Bevy's ECS tables; the round-reset path despawns the old
//! avatar and this module spawns the replacement, letting Rust drop the stale components.

use bevy::prelude::*;

use crate::animation::{SpriteState, SHEET_ROW_HEIGHT};
use crate::level::CanvasRect;
use crate::movement::Velocity;
use crate::state::GameState;

/// Top-left corner of a freshly spawned avatar, in canvas pixels.
pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 100.0);

/// Hitbox height. The width varies with the active sprite variant.
pub const PLAYER_HEIGHT: f32 = 150.0;

/// Horizontal speed, in pixels per frame. Applied instantly: there is no acceleration ramp and
/// no drag.
pub const PLAYER_SPEED: f32 = 10.0;

/// The controllable character. `frames` indexes into the active sprite strip and `sprite` names
/// the strip itself; both are rewritten by the animation selector.
#[derive(Component)]
pub struct Player {
    pub speed: f32,
    pub frames: usize,
    pub sprite: SpriteState,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            frames: 0,
            sprite: SpriteState::StandRight,
        }
    }
}

/// Handles to the four sprite sheets and the two atlas layouts slicing them into frames. Kept in
/// a resource so the decoded sheets stay alive across round resets.
#[derive(Resource, Default)]
pub struct PlayerSprites {
    pub stand_right: Handle<Image>,
    pub stand_left: Handle<Image>,
    pub run_right: Handle<Image>,
    pub run_left: Handle<Image>,
    pub stand_layout: Handle<TextureAtlasLayout>,
    pub run_layout: Handle<TextureAtlasLayout>,
}

impl PlayerSprites {
    pub fn sheet_for(&self, sprite: SpriteState) -> Handle<Image> {
        match sprite {
            SpriteState::StandRight => self.stand_right.clone(),
            SpriteState::StandLeft => self.stand_left.clone(),
            SpriteState::RunRight => self.run_right.clone(),
            SpriteState::RunLeft => self.run_left.clone(),
        }
    }

    pub fn layout_for(&self, sprite: SpriteState) -> Handle<TextureAtlasLayout> {
        if sprite.is_running() {
            self.run_layout.clone()
        } else {
            self.stand_layout.clone()
        }
    }
}

/// Registers sprite sheet loading. Spawning itself happens from the round-reset path so a new
/// avatar appears with every rebuilt world.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSprites>()
            .add_systems(OnEnter(GameState::Loading), load_player_sprites);
    }
}

fn load_player_sprites(
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut sprites: ResMut<PlayerSprites>,
) {
    sprites.stand_right = asset_server.load("textures/stand_right.png");
    sprites.stand_left = asset_server.load("textures/stand_left.png");
    sprites.run_right = asset_server.load("textures/run_right.png");
    sprites.run_left = asset_server.load("textures/run_left.png");

    let stand = SpriteState::StandRight.variant();
    let run = SpriteState::RunRight.variant();
    sprites.stand_layout = layouts.add(TextureAtlasLayout::from_grid(
        UVec2::new(stand.crop_width, SHEET_ROW_HEIGHT),
        stand.frame_count as u32,
        1,
        None,
        None,
    ));
    sprites.run_layout = layouts.add(TextureAtlasLayout::from_grid(
        UVec2::new(run.crop_width, SHEET_ROW_HEIGHT),
        run.frame_count as u32,
        1,
        None,
        None,
    ));
}

/// Spawns a fresh avatar facing right in the standing pose. The entity tuple lands in one
/// archetype row, keeping the per-frame queries cache-friendly.
pub fn spawn_player(commands: &mut Commands, sprites: &PlayerSprites) {
    let player = Player::default();
    let variant = player.sprite.variant();
    let hitbox = Vec2::new(variant.display_width, PLAYER_HEIGHT);

    commands.spawn((
        Name::new("Player"),
        CanvasRect::new(PLAYER_SPAWN, hitbox),
        Velocity::default(),
        SpriteBundle {
            texture: sprites.sheet_for(player.sprite),
            sprite: Sprite {
                custom_size: Some(hitbox),
                ..default()
            },
            transform: Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            ..default()
        },
        TextureAtlas {
            layout: sprites.layout_for(player.sprite),
            index: 0,
        },
        player,
    ));
}
