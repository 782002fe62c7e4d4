//! Easing curves used by timeline tracks.
//!
//! Names follow the common `power{n}` convention where `power1` is quadratic,
//! `power2` cubic and `power3` quartic. Every curve maps 0 to 0 and 1 to 1;
//! `BackOut` overshoots 1 in between.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    Power2Out,
    Power2InOut,
    Power3InOut,
    /// Back-out with the given overshoot amount.
    BackOut(f32),
}

impl Ease {
    /// Evaluate the curve at `t`, clamped to \[0, 1\]. Both ends are exact.
    pub fn apply(self, t: f32) -> f32 {
        if t <= 0.0 || t.is_nan() {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Ease::Linear => t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::Power3InOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Ease::BackOut(overshoot) => {
                let p = t - 1.0;
                p * p * ((overshoot + 1.0) * p + overshoot) + 1.0
            }
        }
    }
}

/// Curve selection for every animated property, one field per track family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EasingSet {
    pub reveal_camera: Ease,
    pub reveal_fade: Ease,
    pub reveal_grow: Ease,
    pub reveal_rotation: Ease,
    pub focus_fade: Ease,
    pub focus_move: Ease,
    pub focus_turn: Ease,
}

impl Default for EasingSet {
    fn default() -> Self {
        Self {
            reveal_camera: Ease::Power2InOut,
            reveal_fade: Ease::Power2Out,
            reveal_grow: Ease::BackOut(crate::constants::REVEAL_OVERSHOOT),
            reveal_rotation: Ease::Power2InOut,
            focus_fade: Ease::Power2Out,
            focus_move: Ease::Power3InOut,
            focus_turn: Ease::Power2InOut,
        }
    }
}
