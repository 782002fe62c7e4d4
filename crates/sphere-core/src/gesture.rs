//! Pointer and touch interpretation.
//!
//! The two input models differ on purpose:
//! - pointer position maps *absolutely* onto a target yaw (the sphere follows
//!   the cursor across the window);
//! - touch swipes add *relative* yaw deltas (a finger has no resting position
//!   once lifted).
//!
//! A touch sequence ends in exactly one outcome: a tap (quick and nearly
//! stationary) or a drag.

use glam::Vec2;

use crate::constants::{POINTER_YAW_RANGE, TAP_MAX_MS, TAP_MAX_TRAVEL_PX, TOUCH_YAW_PER_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchKind {
    Tap,
    Drag,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchOutcome {
    /// Quick, stationary touch; carries the release point.
    Tap(Vec2),
    Drag,
}

/// Tap iff strictly under both the time and the per-axis travel limits.
#[inline]
pub fn classify_touch(elapsed_ms: f64, travel: Vec2) -> TouchKind {
    if elapsed_ms < TAP_MAX_MS
        && travel.x.abs() < TAP_MAX_TRAVEL_PX
        && travel.y.abs() < TAP_MAX_TRAVEL_PX
    {
        TouchKind::Tap
    } else {
        TouchKind::Drag
    }
}

/// Absolute pointer mapping: `[0, width]` → `[-π/2, π/2]`.
#[inline]
pub fn pointer_yaw(x: f32, window_width: f32) -> Option<f32> {
    (window_width > 0.0).then(|| ((x / window_width) * 2.0 - 1.0) * POINTER_YAW_RANGE)
}

/// Relative touch mapping: one window width of swipe is half a turn.
#[inline]
pub fn touch_yaw_delta(dx: f32, window_width: f32) -> Option<f32> {
    (window_width > 0.0).then(|| (dx / window_width) * TOUCH_YAW_PER_WIDTH)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TouchSequence {
    start: Vec2,
    start_ms: f64,
    last: Vec2,
}

/// Tracks one touch sequence between press and release.
#[derive(Clone, Debug, Default)]
pub struct GestureInterpreter {
    touch: Option<TouchSequence>,
}

impl GestureInterpreter {
    pub fn is_touching(&self) -> bool {
        self.touch.is_some()
    }

    pub fn touch_start(&mut self, point: Vec2, now_ms: f64) {
        self.touch = Some(TouchSequence {
            start: point,
            start_ms: now_ms,
            last: point,
        });
    }

    /// Returns the yaw delta since the previous move, or `None` outside a sequence.
    pub fn touch_move(&mut self, point: Vec2, window_width: f32) -> Option<f32> {
        let seq = self.touch.as_mut()?;
        let dx = point.x - seq.last.x;
        seq.last = point;
        touch_yaw_delta(dx, window_width)
    }

    /// Ends the sequence. A release without a recorded press yields nothing.
    pub fn touch_end(&mut self, now_ms: f64) -> Option<TouchOutcome> {
        let seq = self.touch.take()?;
        let elapsed = now_ms - seq.start_ms;
        match classify_touch(elapsed, seq.last - seq.start) {
            TouchKind::Tap => Some(TouchOutcome::Tap(seq.last)),
            TouchKind::Drag => Some(TouchOutcome::Drag),
        }
    }

    /// Drop any in-progress sequence without classifying it.
    pub fn cancel(&mut self) {
        self.touch = None;
    }
}
