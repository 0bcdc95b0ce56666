//! World construction: the platform strip, the parallax backdrops, and the end-of-map flag.
//!
//! All persistent data lives in Bevy resources (`WorldGeometry`, `WorldAssets`). Entity sizes are
//! derived from the loaded art so the layout survives asset swaps; when an image cannot be
//! loaded, the module warns and falls back to the shipped pixel dimensions so a round can still
//! be played against untextured sprites.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::round::ResetRound;
use crate::state::GameState;

/// Logical drawing surface, in pixels. The window is created at exactly this size and is not
/// resizable, so canvas coordinates map 1:1 to screen pixels.
pub const CANVAS_WIDTH: f32 = 1024.0;
pub const CANVAS_HEIGHT: f32 = 576.0;

/// Axis-aligned rectangle in canvas space: origin at the top-left of the screen, y growing
/// downward, `pos` anchored at the rectangle's own top-left corner. The whole simulation runs in
/// this space; `camera::sync_canvas_transforms` maps it onto Bevy's centered, y-up world once
/// per frame.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl CanvasRect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// What a world entity is for. Platforms take part in landing collision, backdrops only scroll
/// (at a reduced rate, for depth), and the marker is the visual end-of-map flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollidableKind {
    Platform,
    Backdrop,
    Marker,
}

impl CollidableKind {
    /// Scroll-rate multiplier. Backdrops move slower than the foreground to fake depth.
    pub fn parallax(self) -> f32 {
        match self {
            CollidableKind::Backdrop => 0.66,
            CollidableKind::Platform | CollidableKind::Marker => 1.0,
        }
    }
}

/// Shared shape for every static world entity. Behaviour differs only by `kind`, so one
/// component covers platforms, backdrops, and the flag alike.
#[derive(Component, Clone, Copy, Debug)]
pub struct Collidable {
    pub kind: CollidableKind,
}

/// The five pieces of art the world is assembled from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WorldArt {
    PlatformStrip,
    SmallTall,
    Background,
    Hills,
    EndFlag,
}

impl WorldArt {
    pub fn kind(self) -> CollidableKind {
        match self {
            WorldArt::PlatformStrip | WorldArt::SmallTall => CollidableKind::Platform,
            WorldArt::Background | WorldArt::Hills => CollidableKind::Backdrop,
            WorldArt::EndFlag => CollidableKind::Marker,
        }
    }

    pub fn size(self, geometry: &WorldGeometry) -> Vec2 {
        match self {
            WorldArt::PlatformStrip => geometry.platform,
            WorldArt::SmallTall => geometry.small_tall,
            WorldArt::Background => geometry.background,
            WorldArt::Hills => geometry.hills,
            WorldArt::EndFlag => geometry.flag,
        }
    }

    /// Draw depth: backdrops behind everything, then the flag, then platforms. The player is
    /// spawned above all of these.
    fn depth(self) -> f32 {
        match self {
            WorldArt::Background => 0.0,
            WorldArt::Hills => 0.1,
            WorldArt::EndFlag => 0.5,
            WorldArt::PlatformStrip | WorldArt::SmallTall => 1.0,
        }
    }
}

/// Pixel dimensions of each art piece. Defaults are the shipped image sizes; the loading monitor
/// overwrites them with the real sizes once the images resolve.
#[derive(Resource, Clone, Debug)]
pub struct WorldGeometry {
    pub platform: Vec2,
    pub small_tall: Vec2,
    pub background: Vec2,
    pub hills: Vec2,
    pub flag: Vec2,
}

impl Default for WorldGeometry {
    fn default() -> Self {
        Self {
            platform: Vec2::new(580.0, 125.0),
            small_tall: Vec2::new(291.0, 227.0),
            background: Vec2::new(11643.0, 732.0),
            hills: Vec2::new(7545.0, 592.0),
            flag: Vec2::new(135.0, 255.0),
        }
    }
}

impl WorldGeometry {
    /// Total scrollable distance of the map, derived from the platform strip width.
    pub fn map_length(&self) -> f32 {
        self.platform.x * 5.0 + 1000.0
    }

    fn set_size(&mut self, art: WorldArt, size: Vec2) {
        match art {
            WorldArt::PlatformStrip => self.platform = size,
            WorldArt::SmallTall => self.small_tall = size,
            WorldArt::Background => self.background = size,
            WorldArt::Hills => self.hills = size,
            WorldArt::EndFlag => self.flag = size,
        }
    }
}

/// Handles to the world art. Handles are reference-counted pointers into Bevy's asset storage;
/// keeping them in a resource keeps the decoded images alive across round resets.
#[derive(Resource, Default)]
pub struct WorldAssets {
    pub platform: Handle<Image>,
    pub small_tall: Handle<Image>,
    pub background: Handle<Image>,
    pub hills: Handle<Image>,
    pub end_flag: Handle<Image>,
}

impl WorldAssets {
    pub fn image_for(&self, art: WorldArt) -> Handle<Image> {
        match art {
            WorldArt::PlatformStrip => self.platform.clone(),
            WorldArt::SmallTall => self.small_tall.clone(),
            WorldArt::Background => self.background.clone(),
            WorldArt::Hills => self.hills.clone(),
            WorldArt::EndFlag => self.end_flag.clone(),
        }
    }

    fn slots(&self) -> [(WorldArt, &Handle<Image>); 5] {
        [
            (WorldArt::PlatformStrip, &self.platform),
            (WorldArt::SmallTall, &self.small_tall),
            (WorldArt::Background, &self.background),
            (WorldArt::Hills, &self.hills),
            (WorldArt::EndFlag, &self.end_flag),
        ]
    }
}

/// Registers asset loading and the geometry monitor that ends the `Loading` state.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldGeometry>()
            .init_resource::<WorldAssets>()
            .add_systems(OnEnter(GameState::Loading), load_world_assets)
            .add_systems(
                Update,
                monitor_world_loading.run_if(in_state(GameState::Loading)),
            );
    }
}

fn load_world_assets(asset_server: Res<AssetServer>, mut assets: ResMut<WorldAssets>) {
    assets.platform = asset_server.load("textures/platform.png");
    assets.small_tall = asset_server.load("textures/platform_small_tall.png");
    assets.background = asset_server.load("textures/background.png");
    assets.hills = asset_server.load("textures/hills.png");
    assets.end_flag = asset_server.load("textures/end_flag.png");
}

/// Waits until every world image has either loaded or failed, then captures the real pixel sizes
/// and kicks off the first round. A failed image keeps its fallback dimensions so the collision
/// layout stays playable.
fn monitor_world_loading(
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    assets: Res<WorldAssets>,
    mut geometry: ResMut<WorldGeometry>,
    mut resets: EventWriter<ResetRound>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (_, handle) in assets.slots() {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) | Some(LoadState::Failed(_)) => {}
            _ => return,
        }
    }

    for (art, handle) in assets.slots() {
        if let Some(image) = images.get(handle) {
            geometry.set_size(art, image.size_f32());
        } else {
            warn!(
                "Unable to load {:?} art; using built-in {}x{} px placeholder geometry.",
                art,
                art.size(&geometry).x,
                art.size(&geometry).y
            );
        }
    }

    info!(
        "World geometry ready; map length is {} px.",
        geometry.map_length()
    );
    resets.send(ResetRound);
    next_state.set(GameState::Running);
}

/// Where each art piece sits at round start, in canvas coordinates. The platform strip repeats
/// five times with gaps, a raised small platform sits near the end, and the flag marks the
/// scroll distance that wins the round. Pure so the layout can be asserted against directly.
pub fn world_layout(geometry: &WorldGeometry) -> Vec<(WorldArt, Vec2)> {
    let pw = geometry.platform.x;
    let stw = geometry.small_tall.x;

    vec![
        (WorldArt::Background, Vec2::new(-1.0, -1.0)),
        (WorldArt::Hills, Vec2::new(-1.0, -1.0)),
        (
            WorldArt::SmallTall,
            Vec2::new(pw * 4.0 + 400.0 - 3.0 + pw - stw, 270.0),
        ),
        (WorldArt::PlatformStrip, Vec2::new(-1.0, 470.0)),
        (WorldArt::PlatformStrip, Vec2::new(pw - 3.0, 470.0)),
        (WorldArt::PlatformStrip, Vec2::new(pw * 2.0 + 150.0, 470.0)),
        (WorldArt::PlatformStrip, Vec2::new(pw * 3.0 + 400.0, 470.0)),
        (
            WorldArt::PlatformStrip,
            Vec2::new(pw * 4.0 + 400.0 - 3.0, 470.0),
        ),
        (WorldArt::PlatformStrip, Vec2::new(pw * 5.0 + 1000.0, 470.0)),
        (WorldArt::EndFlag, Vec2::new(geometry.map_length(), 240.0)),
    ]
}

/// Spawns the whole static world. Called from the round-reset path, after any previous world has
/// been despawned.
pub fn spawn_world(commands: &mut Commands, geometry: &WorldGeometry, assets: &WorldAssets) {
    for (art, pos) in world_layout(geometry) {
        let size = art.size(geometry);
        commands.spawn((
            Name::new(format!("{art:?}")),
            Collidable { kind: art.kind() },
            CanvasRect::new(pos, size),
            SpriteBundle {
                texture: assets.image_for(art),
                sprite: Sprite {
                    custom_size: Some(size),
                    ..default()
                },
                transform: Transform::from_translation(Vec3::new(0.0, 0.0, art.depth())),
                ..default()
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_length_follows_platform_width() {
        let geometry = WorldGeometry::default();
        assert_eq!(geometry.map_length(), 580.0 * 5.0 + 1000.0);

        let mut wider = geometry.clone();
        wider.platform.x = 600.0;
        assert_eq!(wider.map_length(), 4000.0);
    }

    #[test]
    fn layout_has_seven_platforms_two_backdrops_one_marker() {
        let geometry = WorldGeometry::default();
        let layout = world_layout(&geometry);

        let count = |kind: CollidableKind| {
            layout
                .iter()
                .filter(|(art, _)| art.kind() == kind)
                .count()
        };

        assert_eq!(count(CollidableKind::Platform), 7);
        assert_eq!(count(CollidableKind::Backdrop), 2);
        assert_eq!(count(CollidableKind::Marker), 1);
    }

    #[test]
    fn flag_sits_at_map_length() {
        let geometry = WorldGeometry::default();
        let layout = world_layout(&geometry);

        let (_, flag_pos) = layout
            .iter()
            .find(|(art, _)| *art == WorldArt::EndFlag)
            .expect("layout always places the flag");

        assert_eq!(flag_pos.x, geometry.map_length());
        assert_eq!(flag_pos.y, 240.0);
    }

    #[test]
    fn raised_platform_aligns_with_last_full_strip() {
        let geometry = WorldGeometry::default();
        let layout = world_layout(&geometry);
        let pw = geometry.platform.x;

        let (_, raised) = layout
            .iter()
            .find(|(art, _)| *art == WorldArt::SmallTall)
            .expect("layout always places the raised platform");

        // Right edge of the raised platform matches the right edge of the strip below it.
        assert_eq!(
            raised.x + geometry.small_tall.x,
            pw * 4.0 + 400.0 - 3.0 + pw
        );
        assert_eq!(raised.y, 270.0);
    }

    #[test]
    fn backdrops_scroll_slower_than_platforms() {
        assert_eq!(CollidableKind::Backdrop.parallax(), 0.66);
        assert_eq!(CollidableKind::Platform.parallax(), 1.0);
        assert_eq!(CollidableKind::Marker.parallax(), 1.0);
    }
}
