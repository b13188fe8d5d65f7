//! Timed tweens: exit cross-fade and resize interpolation

use crate::math::{Size, Vec2};
use super::easing::{accelerate_decelerate, overshoot, EXIT_CURVE};
use super::session::SurfaceFrame;
use super::{
    EXIT_DURATION_MS, LEAVE_BUTTON_EXIT_ALPHA, OVERSHOOT_TENSION, SNAP_BACK_DURATION_MS,
    TOGGLE_RESIZE_DURATION_MS,
};

#[inline]
fn progress(start_ms: f64, duration_ms: u32, now_ms: f64) -> f32 {
    let elapsed = (now_ms - start_ms) as f32;
    (elapsed / duration_ms as f32).clamp(0.0, 1.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fade-out played when a window leaves its floating mode
///
/// A window dropped on the dismiss target is already dimmed, so it fades
/// from half alpha while shrinking to nothing around its center. Any other
/// exit fades from full alpha at a constant scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ExitTween {
    pub start_ms: f64,
    from: SurfaceFrame,
    center: Vec2,
    start_alpha: f32,
    end_scale: f32,
}

impl ExitTween {
    pub fn new(start_ms: f64, from: SurfaceFrame, from_leave_button: bool) -> Self {
        let center = Vec2::new(
            from.position.x + from.crop.width * from.scale / 2.0,
            from.position.y + from.crop.height * from.scale / 2.0,
        );
        let (start_alpha, end_scale) = if from_leave_button {
            (LEAVE_BUTTON_EXIT_ALPHA, 0.0)
        } else {
            (1.0, from.scale)
        };
        Self {
            start_ms,
            from,
            center,
            start_alpha,
            end_scale,
        }
    }

    /// Get the progress (0.0 to 1.0)
    pub fn progress(&self, now_ms: f64) -> f32 {
        progress(self.start_ms, EXIT_DURATION_MS, now_ms)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Frame at `now_ms`
    pub fn current(&self, now_ms: f64) -> SurfaceFrame {
        let t = EXIT_CURVE.ease(self.progress(now_ms));
        let scale = lerp(self.from.scale, self.end_scale, t);
        let size = self.from.crop.scale(scale);
        SurfaceFrame {
            position: Vec2::new(
                self.center.x - size.width / 2.0,
                self.center.y - size.height / 2.0,
            ),
            scale,
            alpha: self.start_alpha * (1.0 - t),
            ..self.from
        }
    }
}

/// Timing curve of a resize tween
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeCurve {
    /// Pinned size toggle: short, overshooting
    Overshoot,
    /// Drag-resize released between thresholds: slower, smooth
    SnapBack,
}

impl ResizeCurve {
    pub fn duration_ms(self) -> u32 {
        match self {
            ResizeCurve::Overshoot => TOGGLE_RESIZE_DURATION_MS,
            ResizeCurve::SnapBack => SNAP_BACK_DURATION_MS,
        }
    }

    fn ease(self, t: f32) -> f32 {
        match self {
            ResizeCurve::Overshoot => overshoot(t, OVERSHOOT_TENSION),
            ResizeCurve::SnapBack => accelerate_decelerate(t),
        }
    }
}

/// Interpolates position and scale between two explicit frames
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeTween {
    pub start_ms: f64,
    pub curve: ResizeCurve,
    from: SurfaceFrame,
    to: SurfaceFrame,
}

impl ResizeTween {
    pub fn new(start_ms: f64, curve: ResizeCurve, from: SurfaceFrame, to: SurfaceFrame) -> Self {
        Self {
            start_ms,
            curve,
            from,
            to,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        progress(self.start_ms, self.curve.duration_ms(), now_ms)
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Target frame
    pub fn target(&self) -> SurfaceFrame {
        self.to
    }

    /// Frame at `now_ms`
    pub fn current(&self, now_ms: f64) -> SurfaceFrame {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to;
        }
        let t = self.curve.ease(p);
        SurfaceFrame {
            position: Vec2::lerp(self.from.position, self.to.position, t),
            crop: Size::new(
                lerp(self.from.crop.width, self.to.crop.width, t),
                lerp(self.from.crop.height, self.to.crop.height, t),
            ),
            scale: lerp(self.from.scale, self.to.scale, t),
            corner_radius: lerp(self.from.corner_radius, self.to.corner_radius, t),
            alpha: self.to.alpha,
        }
    }
}
