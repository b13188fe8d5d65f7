//! Pointer events

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Pointer action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    /// The press was taken away (treated like a release without a fling)
    Cancel,
}

/// A single pointer event in display coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Vec2,
    /// Event time in milliseconds
    pub time_ms: f64,
}

impl PointerEvent {
    #[inline]
    pub fn new(action: PointerAction, x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            action,
            position: Vec2::new(x, y),
            time_ms,
        }
    }

    #[inline]
    pub fn down(x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(PointerAction::Down, x, y, time_ms)
    }

    #[inline]
    pub fn move_to(x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(PointerAction::Move, x, y, time_ms)
    }

    #[inline]
    pub fn up(x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(PointerAction::Up, x, y, time_ms)
    }

    #[inline]
    pub fn cancel(x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(PointerAction::Cancel, x, y, time_ms)
    }

    /// Check if the event ends a press
    #[inline]
    pub fn is_release(&self) -> bool {
        matches!(self.action, PointerAction::Up | PointerAction::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_actions() {
        assert!(PointerEvent::up(0.0, 0.0, 0.0).is_release());
        assert!(PointerEvent::cancel(0.0, 0.0, 0.0).is_release());
        assert!(!PointerEvent::move_to(0.0, 0.0, 0.0).is_release());
    }

    #[test]
    fn test_event_json() {
        let event = PointerEvent::down(10.0, 20.0, 5.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"down\""));
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
