use bevy::prelude::*;

use terrain::TerrainSet;

pub mod camera;
pub mod terrain_render;
pub mod water_render;

use camera::CameraDrags;
use terrain_render::TerrainPalette;
use water_render::WaterPalette;

/// Clear colour; the water horizon fades into it.
pub const SKY_COLOR: Color = Color::srgb(0.62, 0.74, 0.86);

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainPalette>()
            .init_resource::<WaterPalette>()
            .init_resource::<CameraDrags>()
            .insert_resource(ClearColor(SKY_COLOR))
            .add_systems(
                Startup,
                (
                    camera::setup_camera,
                    setup_lighting,
                    terrain_render::setup_terrain_materials,
                ),
            )
            .add_systems(
                Update,
                (
                    terrain_render::sync_terrain_meshes,
                    water_render::sync_water_mesh,
                )
                    .after(TerrainSet),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan_keyboard,
                    camera::camera_mouse_drag,
                    camera::camera_zoom,
                    camera::rest_focus_on_terrain,
                    camera::apply_orbit_camera,
                )
                    .chain()
                    .after(TerrainSet),
            );
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });

    // Low afternoon sun so relief reads clearly.
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_6,
            std::f32::consts::FRAC_PI_4,
            0.0,
        )),
    ));
}
