use glam::{Quat, Vec2, Vec3};

use crate::camera::Camera;
use crate::config::FocusFractions;
use crate::tile::Tile;
use crate::transform::{look_rotation, shortest_path, SphereGroup};

/// Largest `aspect`-shaped box that fits inside `bounds` ("contain", never "cover").
pub fn contain_fit(bounds: Vec2, aspect: f32) -> Vec2 {
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        bounds.x / bounds.y
    };
    let mut w = bounds.x;
    let mut h = w / aspect;
    if h > bounds.y {
        h = bounds.y;
        w = h * aspect;
    }
    Vec2::new(w.min(bounds.x), h.min(bounds.y))
}

/// Room available to a focused tile: the visible extent at the group centre
/// times the configured fractions.
pub fn focus_bounds(camera: &Camera, group: &SphereGroup, fractions: FocusFractions) -> Vec2 {
    let distance = camera.eye.distance(group.world_center());
    camera.visible_extent(distance) * fractions.as_vec2()
}

/// Orientation, in the group's local space, that turns a tile's front face
/// (+Z) towards `eye` from `target_world`.
pub fn facing_camera(target_world: Vec3, eye: Vec3, parent_rotation: Quat) -> Quat {
    let world = look_rotation(target_world, eye, Vec3::Y);
    let local = parent_rotation.inverse() * world;
    // look_rotation points +Z away from the eye; turn the front face around.
    (local * Quat::from_rotation_y(std::f32::consts::PI)).normalize()
}

/// End state of a focus-in, all in the group's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTarget {
    pub position: Vec3,
    pub scale: Vec3,
    pub orientation: Quat,
    pub size: Vec2,
}

pub fn focus_target(
    tile: &Tile,
    group: &SphereGroup,
    camera: &Camera,
    fractions: FocusFractions,
) -> FocusTarget {
    let center = group.world_center();
    let size = contain_fit(
        focus_bounds(camera, group, fractions),
        tile.presentation_aspect(),
    );
    let orientation = shortest_path(
        tile.transform.orientation,
        facing_camera(center, camera.eye, group.world_rotation()),
    );
    FocusTarget {
        position: group.world_to_local(center),
        scale: Vec3::new(size.x / tile.base_size.x, size.y / tile.base_size.y, 1.0),
        orientation,
        size,
    }
}
