//! Tap, double-tap and long-press recognition
//!
//! Time-driven gestures (confirmed single taps, long presses) are reported
//! from [`GestureDetector::poll`], which the controller calls on every tick.

use serde::Serialize;

use crate::math::Vec2;
use super::event::{PointerAction, PointerEvent};

/// A recognized gesture
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// A press released without moving; may still become a double tap
    SingleTapUp { position: Vec2 },
    /// No second tap followed within the double-tap timeout
    SingleTapConfirmed { position: Vec2 },
    /// Second press of a double tap
    DoubleTap { position: Vec2 },
    LongPress { position: Vec2 },
    /// The pointer moved past the touch slop
    DragStart { origin: Vec2, position: Vec2 },
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Vec2,
    time_ms: f64,
    moved: bool,
    long_pressed: bool,
    second_tap: bool,
}

#[derive(Clone, Copy, Debug)]
struct Tap {
    position: Vec2,
    time_ms: f64,
}

/// Gesture recognizer for one overlay
#[derive(Clone, Debug)]
pub struct GestureDetector {
    slop: f32,
    double_tap_timeout_ms: f64,
    long_press_timeout_ms: Option<f64>,
    press: Option<Press>,
    last_tap: Option<Tap>,
}

impl GestureDetector {
    /// Create a detector
    ///
    /// # Arguments
    /// * `slop` - Pointer travel before a press becomes a drag
    /// * `double_tap_timeout_ms` - Window for the second tap
    /// * `long_press_timeout_ms` - Hold time for a long press, `None` to disable
    pub fn new(slop: f32, double_tap_timeout_ms: u32, long_press_timeout_ms: Option<u32>) -> Self {
        Self {
            slop,
            double_tap_timeout_ms: double_tap_timeout_ms as f64,
            long_press_timeout_ms: long_press_timeout_ms.map(f64::from),
            press: None,
            last_tap: None,
        }
    }

    /// Check if a press is in progress
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Origin of the press in progress
    pub fn press_origin(&self) -> Option<Vec2> {
        self.press.map(|p| p.origin)
    }

    /// Drop all gesture state
    pub fn reset(&mut self) {
        self.press = None;
        self.last_tap = None;
    }

    /// Feed a pointer event
    pub fn on_event(&mut self, event: &PointerEvent) -> Option<Gesture> {
        match event.action {
            PointerAction::Down => {
                let second_tap = self.last_tap.take().is_some_and(|tap| {
                    event.time_ms - tap.time_ms <= self.double_tap_timeout_ms
                        && tap.position.distance(event.position) <= self.slop * 4.0
                });
                self.press = Some(Press {
                    origin: event.position,
                    time_ms: event.time_ms,
                    moved: false,
                    long_pressed: false,
                    second_tap,
                });
                second_tap.then_some(Gesture::DoubleTap {
                    position: event.position,
                })
            }
            PointerAction::Move => {
                let press = self.press.as_mut()?;
                if press.moved || press.origin.distance(event.position) <= self.slop {
                    return None;
                }
                press.moved = true;
                Some(Gesture::DragStart {
                    origin: press.origin,
                    position: event.position,
                })
            }
            PointerAction::Up => {
                let press = self.press.take()?;
                if press.moved || press.long_pressed || press.second_tap {
                    return None;
                }
                self.last_tap = Some(Tap {
                    position: event.position,
                    time_ms: event.time_ms,
                });
                Some(Gesture::SingleTapUp {
                    position: event.position,
                })
            }
            PointerAction::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// Report time-driven gestures due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> Option<Gesture> {
        if let (Some(press), Some(timeout)) = (self.press.as_mut(), self.long_press_timeout_ms) {
            if !press.moved
                && !press.long_pressed
                && !press.second_tap
                && now_ms - press.time_ms >= timeout
            {
                press.long_pressed = true;
                return Some(Gesture::LongPress {
                    position: press.origin,
                });
            }
        }
        if self.press.is_none() {
            if let Some(tap) = self.last_tap {
                if now_ms - tap.time_ms > self.double_tap_timeout_ms {
                    self.last_tap = None;
                    return Some(Gesture::SingleTapConfirmed {
                        position: tap.position,
                    });
                }
            }
        }
        None
    }
}
