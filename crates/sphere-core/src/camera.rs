//! Camera and viewport types shared by the controller and both frontends.
//!
//! These avoid platform-specific APIs: frontends report window and canvas
//! sizes, and the controller derives rays and visible extents from them.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::{camera_start_eye, CAMERA_FOV_DEG, CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::hit::Ray;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The pulled-back camera used while the gallery is dormant.
    pub fn gallery(aspect: f32) -> Self {
        Self {
            eye: camera_start_eye(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through a point in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        Ray::new(self.eye, (p1 - self.eye).normalize())
    }

    /// World-space width/height visible at `distance` in front of the eye.
    pub fn visible_extent(&self, distance: f32) -> Vec2 {
        let height = 2.0 * distance * (self.fovy_radians / 2.0).tan();
        Vec2::new(height * self.aspect, height)
    }
}

/// The render surface's bounding rectangle in client (CSS) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Client coordinates to NDC relative to this rectangle (y up).
    pub fn to_ndc(&self, client: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        Some(Vec2::new(
            ((client.x - self.left) / self.width) * 2.0 - 1.0,
            -((client.y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// Window size (for gesture mappings) plus the render surface rectangle (for picking).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub window: Vec2,
    pub surface: SurfaceRect,
}

impl Viewport {
    /// A surface that fills the whole window.
    pub fn fullscreen(width: f32, height: f32) -> Self {
        Self {
            window: Vec2::new(width, height),
            surface: SurfaceRect::new(0.0, 0.0, width, height),
        }
    }

    pub fn aspect(&self) -> Option<f32> {
        (!self.surface.is_empty()).then(|| self.surface.width / self.surface.height)
    }
}
