//! Core geometry types for floating windows
//!
//! These types provide the 2D math used for surface placement,
//! edge snapping and drag tracking.

mod vec2;
mod rect;
mod size;
mod gap;

pub use vec2::Vec2;
pub use rect::Rect;
pub use size::Size;
pub use gap::BoundaryGap;
