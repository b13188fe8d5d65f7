//! Floatwin Engine - Floating Window Lifecycle and Resizing
//!
//! This crate moves application windows between three presentations:
//! fullscreen, a draggable mini window above a dim backdrop, and a small
//! pinned window docked to a display corner. It owns the geometry model,
//! the per-window animation engines, drag and resize input, and the
//! bookkeeping of which window occupies which slot.
//!
//! # Architecture
//!
//! ```text
//! FloatingService
//! ├── command worker ── FloatingController (global lock)
//! │                     ├── WindowStateRecord per window
//! │                     ├── SlotTracker (own lock, shared for queries)
//! │                     ├── Positioner (drag sessions)
//! │                     └── DimBackdrop / PinnedOverlay
//! └── animation thread ── Animator
//!                         └── AnimationEngine per window (own lock)
//! ```
//!
//! All platform access goes through [`floatwin_hal::Host`].
//!
//! # Example
//!
//! ```ignore
//! let (mut controller, mut animator) =
//!     FloatingController::new(host, FloatingSettings::default(), EngineConfig::default());
//! controller.enter_mini(window, now_ms);
//! controller.run_frame(&mut animator, now_ms + 16.0);
//! controller.tick(now_ms + 16.0);
//! ```
//!
//! # Design Principles
//!
//! 1. **Single writer**: only the controller mutates records and slots
//! 2. **Nothing throws across the API**: failed requests are logged and
//!    reported as `false`
//! 3. **Stale work is dropped**: animation completions carry a generation,
//!    exit finalization checks the window is still exiting for the same reason
//!
//! # Module Organization
//!
//! - `animation` - Spring, cross-fade and resize sessions, per-window engines
//! - `controller` - Mode transitions, exit pipeline, input routing
//! - `geometry` - On-screen placement, snapping and resize thresholds
//! - `input` - Pointer events, gestures, drag sessions, velocity
//! - `overlay` - Dim backdrop with edge handle, pinned overlay
//! - `service` - Command worker and animation thread
//! - `slots` - Top-fullscreen, mini and pinned slot tracking

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod overlay;
pub mod record;
pub mod service;
pub mod settings;
pub mod slots;
pub mod window;


// Re-export commonly used items
pub use config::EngineConfig;
pub use controller::{FloatingController, LaunchDecision, LaunchRequest};
pub use error::{FloatError, FloatResult};
pub use input::{InputResult, PointerEvent};
pub use math::{BoundaryGap, Rect, Size, Vec2};
pub use record::WindowStateRecord;
pub use service::FloatingService;
pub use settings::{FloatingSettings, TapAction};
pub use slots::{FocusObserver, SlotTracker};
pub use window::{ExitReason, FloatState, WindowId, WindowMode};
