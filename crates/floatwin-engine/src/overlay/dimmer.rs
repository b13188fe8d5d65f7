//! Dim backdrop behind the top mini window
//!
//! The backdrop covers the whole display. Touches on the mini window itself
//! go to the window content; touches on the edge handle can start a resize
//! drag; any other tap runs the configured tap action.

use serde::Serialize;
use tracing::debug;

use crate::animation::DIM_FADE_CURVE;
use crate::config::{EdgeBarMetrics, EngineConfig};
use crate::input::{Gesture, GestureDetector, PointerAction, PointerEvent};
use crate::math::{Rect, Vec2};
use crate::settings::{FloatingSettings, TapAction};
use crate::window::WindowId;
use super::edge_bar::EdgeBar;

/// Delay before the backdrop starts fading in
pub const DIM_FADE_DELAY_MS: f64 = 150.0;

/// Duration of the backdrop fade-in
pub const DIM_FADE_DURATION_MS: f64 = 300.0;

/// What the backdrop asks the controller to do
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimmerAction {
    /// Consumed without effect
    None,
    /// Deliver to the mini window at content-local coordinates
    Forward { window: WindowId, local: Vec2 },
    /// Start a resize drag at `pointer`
    StartResize { window: WindowId, pointer: Vec2 },
    /// Run a tap action on the mini window
    Tap { window: WindowId, action: TapAction },
}

/// Dim backdrop state
#[derive(Clone, Debug)]
pub struct DimBackdrop {
    window: Option<WindowId>,
    shown_at: f64,
    dim_amount: f32,
    metrics: EdgeBarMetrics,
    surface: Rect,
    surface_scale: f32,
    edge_bar: EdgeBar,
    gestures: GestureDetector,
    single_tap: TapAction,
    double_tap: TapAction,
    single_tap_only: bool,
    press_on_bar: bool,
    forwarding: bool,
}

impl DimBackdrop {
    pub fn new(config: &EngineConfig, settings: &FloatingSettings) -> Self {
        Self {
            window: None,
            shown_at: 0.0,
            dim_amount: config.dim_amount,
            metrics: config.edge_bar,
            surface: Rect::ZERO,
            surface_scale: 1.0,
            edge_bar: EdgeBar::default(),
            // Long press is disabled on the backdrop
            gestures: GestureDetector::new(config.touch_slop, config.double_tap_timeout_ms, None),
            single_tap: settings.single_tap,
            double_tap: settings.double_tap,
            single_tap_only: settings.single_tap_only(),
            press_on_bar: false,
            forwarding: false,
        }
    }

    /// Pick up new tap settings
    pub fn apply_settings(&mut self, settings: &FloatingSettings) {
        self.single_tap = settings.single_tap;
        self.double_tap = settings.double_tap;
        self.single_tap_only = settings.single_tap_only();
    }

    /// Attach the backdrop to a mini window and start the fade-in
    pub fn attach(&mut self, window: WindowId, now_ms: f64) {
        if self.window == Some(window) {
            return;
        }
        debug!(window, "dim backdrop attached");
        self.window = Some(window);
        self.shown_at = now_ms;
        self.gestures.reset();
        self.press_on_bar = false;
        self.forwarding = false;
    }

    /// Detach the backdrop; it disappears at once
    pub fn detach(&mut self) -> Option<WindowId> {
        let window = self.window.take();
        if window.is_some() {
            debug!(window, "dim backdrop detached");
        }
        self.gestures.reset();
        self.edge_bar = EdgeBar::default();
        window
    }

    /// Re-lay out the edge handle around the window's on-screen rectangle
    pub fn relayout(&mut self, surface: Rect, surface_scale: f32, landscape: bool) {
        self.surface = surface;
        self.surface_scale = surface_scale;
        self.edge_bar = EdgeBar::layout(surface, surface_scale, landscape, &self.metrics);
    }

    #[inline]
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.window.is_some()
    }

    #[inline]
    pub fn edge_bar(&self) -> &EdgeBar {
        &self.edge_bar
    }

    /// Backdrop opacity at `now_ms`
    pub fn alpha(&self, now_ms: f64) -> f32 {
        if self.window.is_none() {
            return 0.0;
        }
        let elapsed = now_ms - self.shown_at - DIM_FADE_DELAY_MS;
        if elapsed <= 0.0 {
            return 0.0;
        }
        let t = (elapsed / DIM_FADE_DURATION_MS).min(1.0) as f32;
        self.dim_amount * DIM_FADE_CURVE.ease(t)
    }

    /// Handle a pointer event while attached
    pub fn handle(&mut self, event: &PointerEvent) -> DimmerAction {
        let Some(window) = self.window else {
            return DimmerAction::None;
        };
        let p = event.position;

        if event.action == PointerAction::Down {
            self.press_on_bar = self.edge_bar.hit(p);
            self.forwarding = !self.press_on_bar && self.surface.contains(p);
        }
        if self.forwarding {
            if event.is_release() {
                self.forwarding = false;
            }
            let scale = if self.surface_scale > 0.0 { self.surface_scale } else { 1.0 };
            return DimmerAction::Forward {
                window,
                local: (p - self.surface.position()) / scale,
            };
        }

        let gesture = self.gestures.on_event(event);
        let on_bar = self.press_on_bar;
        if event.is_release() {
            self.press_on_bar = false;
        }
        match gesture {
            Some(Gesture::DragStart { position, .. }) if on_bar => {
                self.gestures.reset();
                self.press_on_bar = false;
                DimmerAction::StartResize {
                    window,
                    pointer: position,
                }
            }
            Some(Gesture::SingleTapUp { position })
                if self.single_tap_only && !self.edge_bar.hit(position) =>
            {
                self.tap(window, self.single_tap)
            }
            Some(Gesture::DoubleTap { position })
                if !self.single_tap_only && !self.edge_bar.hit(position) =>
            {
                self.tap(window, self.double_tap)
            }
            _ => DimmerAction::None,
        }
    }

    /// Report a confirmed single tap once the double-tap window has passed
    pub fn poll(&mut self, now_ms: f64) -> DimmerAction {
        let Some(window) = self.window else {
            return DimmerAction::None;
        };
        match self.gestures.poll(now_ms) {
            Some(Gesture::SingleTapConfirmed { position })
                if !self.single_tap_only && !self.edge_bar.hit(position) =>
            {
                self.tap(window, self.single_tap)
            }
            _ => DimmerAction::None,
        }
    }

    fn tap(&self, window: WindowId, action: TapAction) -> DimmerAction {
        if action == TapAction::Nothing {
            return DimmerAction::None;
        }
        DimmerAction::Tap { window, action }
    }
}
