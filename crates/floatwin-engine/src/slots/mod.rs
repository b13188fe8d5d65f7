//! Focus and slot tracking
//!
//! Records which window occupies the top-fullscreen, mini and pinned slots.
//! This is the single source of truth for "who is where"; every mutation
//! moves a window between collections inside one critical section.

mod tracker;
mod observer;

pub use tracker::{SlotClear, SlotEntry, SlotKind, SlotState, SlotTracker};
pub use observer::FocusObserver;
