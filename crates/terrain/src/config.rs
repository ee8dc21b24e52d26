/// Vertical drop of the sea-bed skirt below `min_elevation`.
pub const SKIRT_DEPTH: f32 = 20.0;
/// Skirt ring radius as a multiple of the terrain's half-diagonal.
pub const SEABED_RADIUS_FACTOR: f32 = 2.5;
/// Approximate arc length between neighbouring skirt vertices, in world units.
pub const SKIRT_SPACING: f32 = 30.0;
/// Lower bound on skirt ring vertex count for tiny terrains.
pub const MIN_SKIRT_VERTICES: usize = 8;

/// Jitter is never allowed below this fraction of a grid cell, so the
/// triangulator always receives points in general position.
pub const MIN_RELATIVE_JITTER: f32 = 0.02;

/// Amplitude damping applied per diamond-square subdivision level.
pub const HEIGHTMAP_DAMPING: f32 = 0.5;
/// Box-blur passes over the macro heightmap.
pub const HEIGHTMAP_BLUR_PASSES: usize = 1;

/// Size of the random unit-gradient template pool in a `NoiseField`.
pub const NOISE_TEMPLATES: usize = 128;
/// Lattice cells per axis of the roughness / texture noise fields.
pub const NOISE_LATTICE: usize = 32;
/// Octaves summed for the roughness detail layer.
pub const ROUGHNESS_OCTAVES: u32 = 9;
/// Roughness detail at `roughness = 1.0`, as a fraction of the elevation span.
pub const ROUGHNESS_SCALE: f32 = 0.05;

/// Edge melt starts this far (0 = centre, 1 = border) from the grid centre.
pub const EDGE_MELT_START: f32 = 0.75;

/// Triangles within this distance of the water level land in both index ranges.
pub const WATER_SPLIT_TOLERANCE: f32 = 0.05;

/// UV-space distance from the border over which sand is forced in.
pub const BORDER_SAND_WIDTH: f32 = 0.06;

/// Water surface: height of the horizon ring above the water level, per
/// world unit of `outer_extent`.
pub const HORIZON_RAISE: f32 = 0.02;
/// Horizon ring vertex spacing, in world units.
pub const HORIZON_SPACING: f32 = 60.0;

/// Buckets per axis of the triangle height index.
pub const HEIGHT_INDEX_BUCKETS: usize = 64;
