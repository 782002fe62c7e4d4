use crate::constants::{
    IDLE_PITCH_AMPLITUDE, IDLE_PITCH_FREQ_RATIO, IDLE_SPEED, IDLE_YAW_AMPLITUDE, ROTATION_DAMPING,
};

/// Horizontal (`yaw`, about Y) and vertical (`pitch`, about X) angles in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YawPitch {
    pub yaw: f32,
    pub pitch: f32,
}

impl YawPitch {
    pub const ZERO: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
    };

    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            yaw: self.yaw + (to.yaw - self.yaw) * t,
            pitch: self.pitch + (to.pitch - self.pitch) * t,
        }
    }
}

/// Eases the sphere's rotation towards a gesture-driven target.
///
/// Rotation is yaw-only once the user is in control: every write to the
/// target pins pitch to zero.
#[derive(Clone, Debug)]
pub struct RotationIntegrator {
    target: YawPitch,
    current: YawPitch,
    damping: f32,
}

impl Default for RotationIntegrator {
    fn default() -> Self {
        Self::new(ROTATION_DAMPING)
    }
}

impl RotationIntegrator {
    pub fn new(damping: f32) -> Self {
        Self {
            target: YawPitch::ZERO,
            current: YawPitch::ZERO,
            damping,
        }
    }

    pub fn target(&self) -> YawPitch {
        self.target
    }

    pub fn current(&self) -> YawPitch {
        self.current
    }

    /// Absolute target, used by the pointer mapping.
    pub fn set_target_yaw(&mut self, yaw: f32) {
        self.target.yaw = yaw;
        self.target.pitch = 0.0;
    }

    /// Relative target, used by touch swipes and ambient drift.
    pub fn add_target_yaw(&mut self, delta: f32) {
        self.target.yaw += delta;
        self.target.pitch = 0.0;
    }

    /// One frame of damping; returns the new current rotation.
    pub fn step(&mut self) -> YawPitch {
        self.current.yaw += (self.target.yaw - self.current.yaw) * self.damping;
        self.current.pitch += (self.target.pitch - self.current.pitch) * self.damping;
        self.current
    }
}

/// Cosmetic wobble shown before the reveal; `time_sec` is wall-clock seconds.
pub fn idle_pose(time_sec: f64) -> YawPitch {
    let phase = time_sec * IDLE_SPEED;
    YawPitch {
        yaw: phase.sin() as f32 * IDLE_YAW_AMPLITUDE,
        pitch: (phase * IDLE_PITCH_FREQ_RATIO).cos() as f32 * IDLE_PITCH_AMPLITUDE,
    }
}
