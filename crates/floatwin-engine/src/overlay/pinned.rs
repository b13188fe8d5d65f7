//! Overlay on top of a pinned window
//!
//! A single tap brings the window back to mini, a double tap returns it to
//! fullscreen and a long press opens a two-button menu (size toggle and
//! mute). Dragging the overlay moves the pinned window.

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::input::{Gesture, GestureDetector, PointerAction, PointerEvent};
use crate::math::{Rect, Vec2};
use crate::window::WindowId;

/// What the pinned overlay asks the controller to do
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayAction {
    None,
    EnterMini,
    ExitPinned,
    ShowMenu,
    HideMenu,
    ToggleResize,
    ToggleMute,
    /// Start moving the window from the press origin
    StartMove { origin: Vec2, pointer: Vec2 },
}

/// Result of feeding one event to the overlay
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverlayResponse {
    pub action: OverlayAction,
    /// The event belongs to the overlay and must not reach other windows
    pub consumed: bool,
}

impl OverlayResponse {
    #[inline]
    fn consumed(action: OverlayAction) -> Self {
        Self {
            action,
            consumed: true,
        }
    }

    #[inline]
    fn passed(action: OverlayAction) -> Self {
        Self {
            action,
            consumed: false,
        }
    }
}

/// Pinned overlay state
#[derive(Clone, Debug)]
pub struct PinnedOverlay {
    window: Option<WindowId>,
    bounds: Rect,
    menu_visible: bool,
    small: bool,
    muted: bool,
    gestures: GestureDetector,
    press_inside: bool,
    /// The current press started while the menu was open
    menu_press: bool,
}

impl PinnedOverlay {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            window: None,
            bounds: Rect::ZERO,
            menu_visible: false,
            small: false,
            muted: false,
            gestures: GestureDetector::new(
                config.touch_slop,
                config.double_tap_timeout_ms,
                Some(config.long_press_timeout_ms),
            ),
            press_inside: false,
            menu_press: false,
        }
    }

    /// Show the overlay over a pinned window
    pub fn attach(&mut self, window: WindowId, bounds: Rect, small: bool, muted: bool) {
        debug!(window, "pinned overlay attached");
        self.window = Some(window);
        self.bounds = bounds;
        self.small = small;
        self.muted = muted;
        self.menu_visible = false;
        self.press_inside = false;
        self.menu_press = false;
        self.gestures.reset();
    }

    /// Remove the overlay
    pub fn detach(&mut self) -> Option<WindowId> {
        let window = self.window.take();
        if window.is_some() {
            debug!(window, "pinned overlay detached");
        }
        self.menu_visible = false;
        self.press_inside = false;
        self.gestures.reset();
        window
    }

    /// Follow the window's on-screen rectangle
    #[inline]
    pub fn update_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Refresh the menu button states
    #[inline]
    pub fn set_state(&mut self, small: bool, muted: bool) {
        self.small = small;
        self.muted = muted;
    }

    #[inline]
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn is_menu_visible(&self) -> bool {
        self.menu_visible
    }

    #[inline]
    pub fn is_small(&self) -> bool {
        self.small
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn hide_menu(&mut self) {
        self.menu_visible = false;
    }

    /// Menu button rectangles: (size toggle, mute)
    pub fn menu_buttons(&self) -> (Rect, Rect) {
        let half = self.bounds.width / 2.0;
        (
            Rect::new(self.bounds.x, self.bounds.y, half, self.bounds.height),
            Rect::new(self.bounds.x + half, self.bounds.y, half, self.bounds.height),
        )
    }

    /// Handle a pointer event
    pub fn handle(&mut self, event: &PointerEvent) -> OverlayResponse {
        if self.window.is_none() {
            return OverlayResponse::passed(OverlayAction::None);
        }
        let p = event.position;

        if event.action == PointerAction::Down {
            self.press_inside = self.bounds.contains(p);
            if !self.press_inside {
                if self.menu_visible {
                    self.menu_visible = false;
                    return OverlayResponse::passed(OverlayAction::HideMenu);
                }
                return OverlayResponse::passed(OverlayAction::None);
            }
            self.menu_press = self.menu_visible;
        }
        if !self.press_inside {
            return OverlayResponse::passed(OverlayAction::None);
        }

        if self.menu_press {
            if event.is_release() {
                self.press_inside = false;
                self.menu_press = false;
                self.gestures.reset();
                if event.action == PointerAction::Up {
                    return OverlayResponse::consumed(self.press_menu(p));
                }
            }
            return OverlayResponse::consumed(OverlayAction::None);
        }

        let gesture = self.gestures.on_event(event);
        if event.is_release() {
            self.press_inside = false;
        }
        let action = match gesture {
            Some(Gesture::DoubleTap { .. }) => OverlayAction::ExitPinned,
            Some(Gesture::DragStart { origin, position }) if !self.menu_visible => {
                self.gestures.reset();
                self.press_inside = false;
                OverlayAction::StartMove {
                    origin,
                    pointer: position,
                }
            }
            _ => OverlayAction::None,
        };
        OverlayResponse::consumed(action)
    }

    /// Report time-driven gestures
    pub fn poll(&mut self, now_ms: f64) -> OverlayAction {
        if self.window.is_none() {
            return OverlayAction::None;
        }
        match self.gestures.poll(now_ms) {
            Some(Gesture::LongPress { .. }) => {
                self.menu_visible = true;
                OverlayAction::ShowMenu
            }
            Some(Gesture::SingleTapConfirmed { .. }) if !self.menu_visible => {
                OverlayAction::EnterMini
            }
            _ => OverlayAction::None,
        }
    }

    fn press_menu(&mut self, p: Vec2) -> OverlayAction {
        let (resize, mute) = self.menu_buttons();
        let action = if resize.contains(p) {
            OverlayAction::ToggleResize
        } else if mute.contains(p) {
            OverlayAction::ToggleMute
        } else {
            return OverlayAction::None;
        };
        self.menu_visible = false;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> PinnedOverlay {
        let mut o = PinnedOverlay::new(&EngineConfig::default());
        o.attach(9, Rect::new(700.0, 200.0, 300.0, 200.0), false, false);
        o
    }

    #[test]
    fn test_single_tap_enters_mini() {
        let mut o = overlay();
        assert!(o.handle(&PointerEvent::down(800.0, 300.0, 0.0)).consumed);
        o.handle(&PointerEvent::up(800.0, 300.0, 50.0));
        assert_eq!(o.poll(200.0), OverlayAction::None);
        assert_eq!(o.poll(400.0), OverlayAction::EnterMini);
    }

    #[test]
    fn test_double_tap_exits_pinned() {
        let mut o = overlay();
        o.handle(&PointerEvent::down(800.0, 300.0, 0.0));
        o.handle(&PointerEvent::up(800.0, 300.0, 50.0));
        let response = o.handle(&PointerEvent::down(805.0, 300.0, 150.0));
        assert_eq!(response.action, OverlayAction::ExitPinned);
        o.handle(&PointerEvent::up(805.0, 300.0, 200.0));
        assert_eq!(o.poll(1000.0), OverlayAction::None);
    }

    #[test]
    fn test_long_press_menu_then_buttons() {
        let mut o = overlay();
        o.handle(&PointerEvent::down(800.0, 300.0, 0.0));
        assert_eq!(o.poll(600.0), OverlayAction::ShowMenu);
        assert!(o.is_menu_visible());
        // Releasing the long press leaves the menu open
        assert_eq!(
            o.handle(&PointerEvent::up(800.0, 300.0, 700.0)).action,
            OverlayAction::None
        );
        assert!(o.is_menu_visible());

        o.handle(&PointerEvent::down(950.0, 300.0, 900.0));
        let response = o.handle(&PointerEvent::up(950.0, 300.0, 950.0));
        assert_eq!(response.action, OverlayAction::ToggleMute);
        assert!(!o.is_menu_visible());
        assert_eq!(o.poll(2000.0), OverlayAction::None);
    }

    #[test]
    fn test_resize_button() {
        let mut o = overlay();
        o.handle(&PointerEvent::down(800.0, 300.0, 0.0));
        o.poll(600.0);
        o.handle(&PointerEvent::up(800.0, 300.0, 700.0));
        o.handle(&PointerEvent::down(720.0, 250.0, 900.0));
        assert_eq!(
            o.handle(&PointerEvent::up(720.0, 250.0, 950.0)).action,
            OverlayAction::ToggleResize
        );
    }

    #[test]
    fn test_touch_outside_hides_menu() {
        let mut o = overlay();
        o.handle(&PointerEvent::down(800.0, 300.0, 0.0));
        o.poll(600.0);
        o.handle(&PointerEvent::up(800.0, 300.0, 700.0));
        let response = o.handle(&PointerEvent::down(100.0, 100.0, 900.0));
        assert_eq!(response.action, OverlayAction::HideMenu);
        assert!(!response.consumed);
        assert!(!o.is_menu_visible());
    }

    #[test]
    fn test_drag_starts_move() {
        let mut o = overlay();
        o.handle(&PointerEvent::down(800.0, 300.0, 0.0));
        assert_eq!(
            o.handle(&PointerEvent::move_to(805.0, 305.0, 10.0)).action,
            OverlayAction::None
        );
        let response = o.handle(&PointerEvent::move_to(760.0, 340.0, 20.0));
        assert_eq!(
            response.action,
            OverlayAction::StartMove {
                origin: Vec2::new(800.0, 300.0),
                pointer: Vec2::new(760.0, 340.0),
            }
        );
        // Later moves belong to the drag, not the overlay
        assert!(!o.handle(&PointerEvent::move_to(700.0, 360.0, 30.0)).consumed);
    }

    #[test]
    fn test_outside_touch_not_consumed() {
        let mut o = overlay();
        let response = o.handle(&PointerEvent::down(10.0, 10.0, 0.0));
        assert!(!response.consumed);
        assert_eq!(response.action, OverlayAction::None);
    }

    #[test]
    fn test_menu_button_split() {
        let o = overlay();
        let (resize, mute) = o.menu_buttons();
        assert!((resize.width - 150.0).abs() < 0.001);
        assert!((mute.x - 850.0).abs() < 0.001);
    }
}
