//! Animation engine for floating windows
//!
//! Four families of animation drive a window's surface: the post-fling
//! spring, the exit cross-fade, the resize tween and the live drag push.
//! Each window owns one [`AnimationEngine`]; the [`Animator`] runs the frame
//! loop for all of them.

mod easing;
mod spring;
mod tween;
mod session;
mod engine;
mod animator;

pub use easing::{accelerate_decelerate, overshoot, CubicBezier, DIM_FADE_CURVE, EXIT_CURVE};
pub use spring::{SpringAxis, SpringFling};
pub use tween::{ExitTween, ResizeCurve, ResizeTween};
pub use session::{AnimationFamily, AnimationSession, SurfaceFrame};
pub use engine::{AnimationEnd, AnimationEngine, Completion, FrameOutcome, SharedAnimation};
pub use animator::{animator_channel, Animator, AnimatorLink, AnimatorMsg};

/// Duration of the exit cross-fade in milliseconds
pub const EXIT_DURATION_MS: u32 = 150;

/// Duration of the pinned size toggle in milliseconds
pub const TOGGLE_RESIZE_DURATION_MS: u32 = 200;

/// Duration of the drag-resize snap-back in milliseconds
pub const SNAP_BACK_DURATION_MS: u32 = 336;

/// Overshoot tension of the pinned size toggle
pub const OVERSHOOT_TENSION: f32 = 1.8;

/// Fling spring stiffness
pub const SPRING_STIFFNESS: f32 = 200.0;

/// Fling spring damping ratio
pub const SPRING_DAMPING_RATIO: f32 = 0.75;

/// Alpha of a window hovering over the dismiss target
pub const LEAVE_BUTTON_EXIT_ALPHA: f32 = 0.5;
