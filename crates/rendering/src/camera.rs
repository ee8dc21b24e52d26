use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use terrain::{Terrain, TerrainConfig};

const PAN_SPEED: f32 = 300.0;
const ZOOM_SPEED: f32 = 0.15;
const MIN_DISTANCE: f32 = 10.0;
const MAX_DISTANCE: f32 = 3000.0;
const MIN_PITCH: f32 = 5.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;
/// How far past the terrain edge the focus may wander.
const FOCUS_MARGIN: f32 = 50.0;

/// Orbital camera: orbits a focus point resting on the terrain surface.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub focus: Vec3,
    /// Radians around +Y.
    pub yaw: f32,
    /// Radians above the ground plane, clamped to `[MIN_PITCH, MAX_PITCH]`.
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: 0.6,
            pitch: 35.0_f32.to_radians(),
            distance: 320.0,
        }
    }
}

/// Press/move/release tracking for one mouse button.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragTracker {
    last_pos: Option<Vec2>,
}

impl DragTracker {
    /// Cursor movement since the previous frame while `button` is held.
    pub fn update(
        &mut self,
        buttons: &ButtonInput<MouseButton>,
        button: MouseButton,
        cursor: Option<Vec2>,
    ) -> Option<Vec2> {
        if buttons.just_pressed(button) {
            self.last_pos = cursor;
            return None;
        }
        if !buttons.pressed(button) {
            self.last_pos = None;
            return None;
        }
        let (last, pos) = (self.last_pos?, cursor?);
        self.last_pos = Some(pos);
        Some(pos - last)
    }
}

/// Middle button pans, right button orbits.
#[derive(Resource, Debug, Default)]
pub struct CameraDrags {
    pub pan: DragTracker,
    pub orbit: DragTracker,
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    let (pos, look_at) = orbit_to_transform(&orbit);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(pos).looking_at(look_at, Vec3::Y),
    ));
    commands.insert_resource(orbit);
}

fn clamp_focus(focus: &mut Vec3, config: &TerrainConfig) {
    let half_w = config.width * 0.5 + FOCUS_MARGIN;
    let half_l = config.length * 0.5 + FOCUS_MARGIN;
    focus.x = focus.x.clamp(-half_w, half_w);
    focus.z = focus.z.clamp(-half_l, half_l);
}

pub fn orbit_to_transform(orbit: &OrbitCamera) -> (Vec3, Vec3) {
    let x = orbit.distance * orbit.pitch.cos() * orbit.yaw.sin();
    let y = orbit.distance * orbit.pitch.sin();
    let z = orbit.distance * orbit.pitch.cos() * orbit.yaw.cos();
    (orbit.focus + Vec3::new(x, y, z), orbit.focus)
}

/// Move a screen-space delta onto the ground plane, relative to yaw.
fn pan_offset(yaw: f32, delta: Vec2) -> Vec2 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec2::new(
        delta.x * cos_yaw + delta.y * sin_yaw,
        -delta.x * sin_yaw + delta.y * cos_yaw,
    )
}

pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let (pos, look_at) = orbit_to_transform(&orbit);
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = Transform::from_translation(pos).looking_at(look_at, Vec3::Y);
}

/// Keep the focus on the terrain surface (or the water plane over holes).
pub fn rest_focus_on_terrain(
    terrain: Res<Terrain>,
    config: Res<TerrainConfig>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let ground = terrain
        .get_height_value(orbit.focus.x, orbit.focus.z)
        .unwrap_or(config.water_level)
        .max(config.water_level);
    if (orbit.focus.y - ground).abs() > 1e-3 {
        orbit.focus.y = ground;
    }
}

/// WASD/Arrow keys: pan focus along the ground.
pub fn camera_pan_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<TerrainConfig>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let step = PAN_SPEED * (orbit.distance / 1000.0) * time.delta_secs();
    let offset = pan_offset(orbit.yaw, dir.normalize() * step);
    orbit.focus.x += offset.x;
    orbit.focus.z += offset.y;
    clamp_focus(&mut orbit.focus, &config);
}

/// Middle-drag pans the focus, right-drag orbits.
pub fn camera_mouse_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    config: Res<TerrainConfig>,
    mut drags: ResMut<CameraDrags>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let cursor = window.cursor_position();

    if let Some(delta) = drags.pan.update(&buttons, MouseButton::Middle, cursor) {
        let offset = pan_offset(orbit.yaw, -delta * (orbit.distance / 1000.0));
        orbit.focus.x += offset.x;
        orbit.focus.z += offset.y;
        clamp_focus(&mut orbit.focus, &config);
    }
    if let Some(delta) = drags.orbit.update(&buttons, MouseButton::Right, cursor) {
        orbit.yaw += delta.x * ORBIT_SENSITIVITY;
        orbit.pitch = (orbit.pitch - delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }
}

/// Scroll wheel: zoom.
pub fn camera_zoom(mut scroll_evts: EventReader<MouseWheel>, mut orbit: ResMut<OrbitCamera>) {
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        let factor = 1.0 - dy * ZOOM_SPEED;
        orbit.distance = (orbit.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_looks_at_focus_from_above() {
        let orbit = OrbitCamera {
            focus: Vec3::new(10.0, 2.0, -5.0),
            ..Default::default()
        };
        let (pos, look_at) = orbit_to_transform(&orbit);
        assert_eq!(look_at, orbit.focus);
        assert!((pos.distance(orbit.focus) - orbit.distance).abs() < 1e-3);
        assert!(pos.y > orbit.focus.y);
    }

    #[test]
    fn test_clamp_focus_to_terrain_margin() {
        let config = TerrainConfig::default();
        let mut focus = Vec3::new(1.0e4, 0.0, -1.0e4);
        clamp_focus(&mut focus, &config);
        assert_eq!(focus.x, config.width * 0.5 + FOCUS_MARGIN);
        assert_eq!(focus.z, -(config.length * 0.5 + FOCUS_MARGIN));
    }

    #[test]
    fn test_drag_tracker_reports_motion_while_held() {
        let mut buttons = ButtonInput::<MouseButton>::default();
        let mut drag = DragTracker::default();

        buttons.press(MouseButton::Right);
        assert_eq!(drag.update(&buttons, MouseButton::Right, Some(Vec2::new(10.0, 10.0))), None);

        buttons.clear();
        assert_eq!(
            drag.update(&buttons, MouseButton::Right, Some(Vec2::new(13.0, 6.0))),
            Some(Vec2::new(3.0, -4.0))
        );

        buttons.release(MouseButton::Right);
        buttons.clear();
        assert_eq!(drag.update(&buttons, MouseButton::Right, Some(Vec2::new(20.0, 20.0))), None);
        assert_eq!(drag.update(&buttons, MouseButton::Middle, Some(Vec2::ZERO)), None);
    }

    #[test]
    fn test_pan_offset_without_yaw_is_identity() {
        let offset = pan_offset(0.0, Vec2::new(3.0, -2.0));
        assert!((offset - Vec2::new(3.0, -2.0)).length() < 1e-6);
    }
}
