use glam::{Vec2, Vec3};

// Shared layout/interaction/animation tuning used by both web and native frontends.

// Sphere layout
pub const DEFAULT_TILE_COUNT: usize = 36;
pub const DEFAULT_SPHERE_RADIUS: f32 = 15.0;
pub const DEFAULT_TILE_SIZE: [f32; 2] = [2.5, 3.5]; // world units, width x height
pub const EQUATOR_BAND_FRACTION: f32 = 0.12; // |y| <= radius * fraction counts as equatorial

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_START_Z: f32 = 25.0; // pulled back while dormant
pub const CAMERA_WORK_Z: f32 = 12.0; // after reveal

// Rotation
pub const ROTATION_DAMPING: f32 = 0.05; // fraction of the remaining gap closed per frame
pub const POINTER_YAW_RANGE: f32 = std::f32::consts::FRAC_PI_2; // yaw at the window edge
pub const TOUCH_YAW_PER_WIDTH: f32 = std::f32::consts::PI; // one window width of swipe
pub const TOUCH_DRIFT_PER_FRAME: f32 = 0.003; // radians
pub const IDLE_SPEED: f64 = 0.8; // rad/s phase speed of the dormant wobble
pub const IDLE_YAW_AMPLITUDE: f32 = 0.1;
pub const IDLE_PITCH_AMPLITUDE: f32 = 0.05;
pub const IDLE_PITCH_FREQ_RATIO: f64 = 0.7;

// Tap classification
pub const TAP_MAX_MS: f64 = 250.0;
pub const TAP_MAX_TRAVEL_PX: f32 = 10.0;

// Focus presentation
pub const FOCUS_FRACTION_DESKTOP: f32 = 0.6; // of the visible world extent
pub const FOCUS_FRACTION_TOUCH_MULTIPLIER: f32 = 3.0;
pub const FOCUS_FRACTION_TOUCH_MAX: f32 = 0.9;
pub const DIMMED_OPACITY: f32 = 0.4;
pub const FOCUS_DRAW_ORDER: i32 = 999;

// Timeline durations (seconds)
pub const FOCUS_FADE_SEC: f32 = 0.4;
pub const FOCUS_MOVE_SEC: f32 = 1.0;
pub const UNFOCUS_FADE_SEC: f32 = 0.3;
pub const UNFOCUS_MOVE_SEC: f32 = 0.9;
pub const REVEAL_CAMERA_SEC: f32 = 2.5;
pub const REVEAL_FADE_AT_SEC: f32 = 0.8;
pub const REVEAL_FADE_SEC: f32 = 1.8;
pub const REVEAL_GROW_AT_SEC: f32 = 1.0;
pub const REVEAL_GROW_SEC: f32 = 2.0;
pub const REVEAL_STAGGER_SEC: f32 = 0.05; // per tile index
pub const REVEAL_ROTATION_SEC: f32 = 1.5;
pub const REVEAL_START_SCALE: f32 = 0.1;
pub const REVEAL_OVERSHOOT: f32 = 1.2;

#[inline]
pub fn default_tile_size() -> Vec2 {
    Vec2::from(DEFAULT_TILE_SIZE)
}

#[inline]
pub fn camera_start_eye() -> Vec3 {
    Vec3::new(0.0, 0.0, CAMERA_START_Z)
}

#[inline]
pub fn camera_work_eye() -> Vec3 {
    Vec3::new(0.0, 0.0, CAMERA_WORK_Z)
}
