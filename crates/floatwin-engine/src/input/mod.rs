//! Drag/resize input handling
//!
//! Raw pointer events enter through the controller and are routed either to
//! an overlay (taps, long presses, drag starts) or, while a drag is active,
//! to the [`Positioner`], which owns the press-move-release cycle of one
//! drag session.

mod event;
mod velocity;
mod gesture;
mod dismiss;
mod drag;
mod positioner;
mod result;

pub use event::{PointerAction, PointerEvent};
pub use velocity::{VelocityTracker, VELOCITY_HORIZON_MS};
pub use gesture::{Gesture, GestureDetector};
pub use dismiss::DismissTarget;
pub use drag::DragSession;
pub use positioner::{DragArea, DragRelease, DragStep, Positioner};
pub use result::InputResult;
