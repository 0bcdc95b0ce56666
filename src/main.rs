//! Application entry point: composes the Bevy runtime, core plugins, and window configuration.
//!
//! The window doubles as the game's canvas: a fixed 1024×576 surface the whole simulation is
//! expressed against, cleared to white every frame. This file wires the runtime together and
//! defers the gameplay wiring to the `HillsideRunnerPlugin` defined in `app.rs`.

mod animation;
mod app;
mod camera;
mod collision;
mod level;
mod movement;
mod player;
mod round;
mod score;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::HillsideRunnerPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::render::texture::ImagePlugin;
use bevy::window::{Window, WindowResolution};

use crate::level::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::score::Identity;

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // Who the relay attributes scores to is fixed before the app starts; nothing re-reads it.
    let identity = Identity::from_startup();

    // The window resource drives swap-chain configuration. The resolution is the simulation's
    // coordinate system, so resizing is disabled outright: canvas pixels stay 1:1 with screen
    // pixels for the process lifetime.
    let primary_window = Window {
        title: "Hillside Runner".to_string(),
        resolution: WindowResolution::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        resizable: false,
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#hillside-canvas".to_owned()),
        ..default()
    };

    // `DefaultPlugins` spins up rendering, input, windowing, etc. Overrides: nearest-neighbor
    // sampling so the pixel art stays crisp, and asset settings for desktop vs web.
    let mut default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(ImagePlugin::default_nearest());

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    App::new()
        .insert_resource(ClearColor(Color::WHITE))
        .insert_resource(identity)
        .add_plugins(default_plugins)
        .add_plugins(HillsideRunnerPlugin)
        .run();
}
