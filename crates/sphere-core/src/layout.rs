use glam::{Quat, Vec3};

use crate::transform::look_rotation;

/// Golden angle in radians, `π(3 − √5)`.
pub const GOLDEN_ANGLE: f32 = std::f32::consts::PI * (3.0 - 2.236_068);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPoint {
    pub position: Vec3,
    /// Local +Z faces the sphere centre.
    pub orientation: Quat,
    pub equatorial: bool,
}

/// Fibonacci-sphere sampling: `n` points swept from `y = +radius` down to
/// `y = -radius`, each turned by the golden angle from the previous one.
pub fn fibonacci_sphere(n: usize, radius: f32) -> Vec<Vec3> {
    if n == 1 {
        return vec![Vec3::new(0.0, radius, 0.0)];
    }
    let last = n.saturating_sub(1) as f32;
    (0..n)
        .map(|i| {
            let y = 1.0 - (i as f32 / last) * 2.0;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = GOLDEN_ANGLE * i as f32;
            Vec3::new(theta.cos() * r, y, theta.sin() * r) * radius
        })
        .collect()
}

/// Resting orientation for a tile at `position`, facing the centre with +Y up.
pub fn facing_center(position: Vec3) -> Quat {
    look_rotation(Vec3::ZERO, position, Vec3::Y)
}

pub fn generate(n: usize, radius: f32, equator_band_fraction: f32) -> Vec<LayoutPoint> {
    let band = radius * equator_band_fraction;
    fibonacci_sphere(n, radius)
        .into_iter()
        .map(|position| LayoutPoint {
            position,
            orientation: facing_center(position),
            equatorial: position.y.abs() <= band,
        })
        .collect()
}
