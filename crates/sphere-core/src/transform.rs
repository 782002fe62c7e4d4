use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::rotation::YawPitch;

/// Position/orientation/scale of a tile relative to the sphere group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            scale: Vec3::ONE,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }
}

/// The parent of every tile. Rotating the group rotates the whole arrangement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphereGroup {
    pub position: Vec3,
    pub rotation: YawPitch,
}

impl SphereGroup {
    /// Pitch about X first, then yaw about Y.
    pub fn world_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.pitch, self.rotation.yaw, 0.0)
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.world_rotation(), self.position)
    }

    pub fn world_center(&self) -> Vec3 {
        self.position
    }

    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.world_rotation().inverse() * (point - self.position)
    }
}

/// Rotation whose local +Z axis points from `target` towards `eye`, with `up`
/// resolving roll. When the view direction is parallel to `up` the direction
/// is nudged slightly so the basis stays defined.
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();
    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 1e-4;
        } else {
            z.z += 1e-4;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Return `to` or its negation, whichever lies on the shorter arc from `from`.
#[inline]
pub fn shortest_path(from: Quat, to: Quat) -> Quat {
    if from.dot(to) < 0.0 {
        -to
    } else {
        to
    }
}
