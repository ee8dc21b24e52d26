use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use terrain::WaterMesh;

/// Colours for the water surface. The horizon colour should match the sky
/// so the far ring fades into the clear colour.
#[derive(Resource, Debug, Clone)]
pub struct WaterPalette {
    pub near: Color,
    pub horizon: Color,
    pub near_alpha: f32,
}

impl Default for WaterPalette {
    fn default() -> Self {
        Self {
            near: Color::srgb(0.12, 0.32, 0.45),
            horizon: crate::SKY_COLOR,
            near_alpha: 0.8,
        }
    }
}

impl WaterPalette {
    pub fn vertex_color(&self, fog: f32) -> [f32; 4] {
        let fog = fog.clamp(0.0, 1.0);
        let near = self.near.to_linear();
        let far = self.horizon.to_linear();
        [
            near.red + (far.red - near.red) * fog,
            near.green + (far.green - near.green) * fog,
            near.blue + (far.blue - near.blue) * fog,
            self.near_alpha + (1.0 - self.near_alpha) * fog,
        ]
    }
}

#[derive(Component)]
pub struct WaterSurface;

pub fn build_water_render_mesh(water: &WaterMesh, palette: &WaterPalette) -> Mesh {
    let positions: Vec<[f32; 3]> = water.vertices.iter().map(|v| v.position.to_array()).collect();
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = water
        .vertices
        .iter()
        .map(|v| [v.position.x, v.position.z])
        .collect();
    let colors: Vec<[f32; 4]> = water
        .vertices
        .iter()
        .map(|v| palette.vertex_color(v.fog))
        .collect();
    let indices: Vec<u32> = water.triangles.iter().flatten().copied().collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Respawn the water entity when `WaterMesh` is rebuilt.
pub fn sync_water_mesh(
    mut commands: Commands,
    water: Res<WaterMesh>,
    palette: Res<WaterPalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<&Mesh3d, With<WaterSurface>>,
) {
    if !water.is_changed() || water.vertices.is_empty() {
        return;
    }
    let mesh = build_water_render_mesh(&water, &palette);

    if let Ok(handle) = existing.get_single() {
        meshes.insert(&handle.0, mesh);
        return;
    }

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.15,
            reflectance: 0.6,
            ..default()
        })),
        Transform::IDENTITY,
        WaterSurface,
    ));
    debug!(
        "Water mesh spawned: {} vertices, {} triangles",
        water.vertices.len(),
        water.triangles.len()
    );
}
