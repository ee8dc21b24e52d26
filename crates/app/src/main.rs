use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use terrain::{RegenerateTerrain, TerrainConfig, TerrainPlugin};

mod config_file;
mod quicksave;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Terrain Sandbox".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    });

    // Logging is live once DefaultPlugins is added; the config must be in
    // place before TerrainPlugin so init_resource keeps it.
    app.insert_resource(config_file::load_terrain_config())
        .add_plugins((TerrainPlugin, rendering::RenderingPlugin))
        .add_systems(Startup, log_controls)
        .add_systems(Update, (regenerate_hotkeys, quicksave::quicksave_hotkeys));

    app.run();
}

fn log_controls() {
    info!("Controls: WASD pan, right-drag orbit, middle-drag pan, wheel zoom");
    info!("R new seed, Shift+R rebuild, F5 quicksave, F9 quickload");
}

fn regenerate_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<TerrainConfig>,
    mut requests: EventWriter<RegenerateTerrain>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let seed = if shift {
        None
    } else {
        Some(config.seed.wrapping_add(1))
    };
    requests.send(RegenerateTerrain { seed });
}
