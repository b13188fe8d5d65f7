//! Animation sessions and the surface frames they produce

use floatwin_hal::SurfaceUpdate;
use serde::Serialize;

use crate::math::{Size, Vec2};
use super::spring::SpringFling;
use super::tween::{ExitTween, ResizeTween};

/// Geometry written to a surface for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceFrame {
    /// Top-left of the scaled surface
    pub position: Vec2,
    /// Unscaled crop size
    pub crop: Size,
    /// Total surface scale (scale times scale factor)
    pub scale: f32,
    pub corner_radius: f32,
    pub alpha: f32,
}

impl SurfaceFrame {
    /// Convert to a compositor update
    pub fn to_update(&self) -> SurfaceUpdate {
        SurfaceUpdate::new()
            .position(self.position.x, self.position.y)
            .crop(self.crop.width, self.crop.height)
            .scale(self.scale)
            .corner_radius(self.corner_radius)
            .alpha(self.alpha)
            .visible(true)
    }

    /// Same frame with a different alpha
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Animation family tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationFamily {
    Spring,
    CrossFade,
    ToggleResize,
    DragResize,
}

/// The state of one running animation
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationSession {
    /// Post-fling settle to the snap position
    Spring(SpringFling),
    /// Exit fade
    CrossFade(ExitTween),
    /// Pinned size toggle or drag-resize snap-back
    ToggleResize(ResizeTween),
    /// Live drag; frames are pushed by the input handler
    DragResize,
}

impl AnimationSession {
    pub fn family(&self) -> AnimationFamily {
        match self {
            AnimationSession::Spring(_) => AnimationFamily::Spring,
            AnimationSession::CrossFade(_) => AnimationFamily::CrossFade,
            AnimationSession::ToggleResize(_) => AnimationFamily::ToggleResize,
            AnimationSession::DragResize => AnimationFamily::DragResize,
        }
    }

    /// Advance to `now_ms`
    ///
    /// Returns the frame to write and whether the session has finished, or
    /// `None` for sessions that do not produce frames on their own.
    pub fn advance(&mut self, now_ms: f64) -> Option<(SurfaceFrame, bool)> {
        match self {
            AnimationSession::Spring(spring) => Some(spring.advance(now_ms)),
            AnimationSession::CrossFade(exit) => {
                Some((exit.current(now_ms), exit.is_complete(now_ms)))
            }
            AnimationSession::ToggleResize(tween) => {
                Some((tween.current(now_ms), tween.is_complete(now_ms)))
            }
            AnimationSession::DragResize => None,
        }
    }
}
