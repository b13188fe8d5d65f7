//! Pointer routing
//!
//! While a drag is active every event goes to the positioner. Otherwise the
//! pinned overlay sees the event first, then the dim backdrop of the mini
//! window.

use floatwin_hal::Host;
use tracing::debug;

use crate::animation::{AnimationEnd, AnimationSession, ResizeCurve, ResizeTween, SpringFling};
use crate::error::{FloatError, FloatResult};
use crate::geometry::{self, ResizeZone};
use crate::input::{DragRelease, DragStep, InputResult, PointerAction, PointerEvent};
use crate::math::Vec2;
use crate::overlay::{DimmerAction, OverlayAction};
use crate::settings::TapAction;
use crate::window::{ExitReason, WindowId, WindowMode};
use super::{report, FloatingController};

/// Smallest release-to-snap distance that is animated
const MIN_FLING_DISTANCE: f32 = 0.5;

impl<H: Host> FloatingController<H> {
    /// Route one pointer event
    pub fn on_pointer_event(&mut self, event: &PointerEvent, now_ms: f64) -> InputResult {
        if self.positioner.is_dragging() {
            match event.action {
                PointerAction::Move => {
                    self.drag_move(event);
                    return InputResult::Handled;
                }
                PointerAction::Up | PointerAction::Cancel => {
                    self.drag_end(event, now_ms);
                    return InputResult::Handled;
                }
                // The release of the previous drag never arrived
                PointerAction::Down => self.abort_drag(now_ms),
            }
        }

        if let Some(window) = self.pinned_overlay.window() {
            let response = self.pinned_overlay.handle(event);
            match response.action {
                OverlayAction::StartMove { origin, pointer } => {
                    let result = self.start_move(window, origin, pointer, event.time_ms);
                    report("start_move", window, result);
                }
                action => self.handle_overlay_action(window, action, now_ms),
            }
            if response.consumed {
                return InputResult::Handled;
            }
        }

        if self.dimmer.is_attached() {
            let action = self.dimmer.handle(event);
            return self.handle_dimmer_action(action, event.time_ms, now_ms);
        }
        InputResult::Unhandled
    }

    /// Carry out a pinned overlay action
    pub(crate) fn handle_overlay_action(&mut self, window: WindowId, action: OverlayAction, now_ms: f64) {
        match action {
            OverlayAction::EnterMini => {
                self.enter_mini(window, now_ms);
            }
            OverlayAction::ExitPinned => {
                self.exit_to_fullscreen(window, now_ms);
            }
            OverlayAction::ToggleResize => {
                self.host.vibrate();
                self.toggle_resize(window, now_ms);
            }
            OverlayAction::ToggleMute => {
                self.host.vibrate();
                self.toggle_mute(window);
            }
            OverlayAction::ShowMenu | OverlayAction::HideMenu => {
                debug!(window, ?action, "pinned menu");
            }
            OverlayAction::StartMove { .. } | OverlayAction::None => {}
        }
    }

    /// Carry out a dim backdrop action
    pub(crate) fn handle_dimmer_action(&mut self, action: DimmerAction, time_ms: f64, now_ms: f64) -> InputResult {
        match action {
            DimmerAction::None => InputResult::Handled,
            DimmerAction::Forward { window, local } => InputResult::Forward {
                window_id: window,
                local_x: local.x,
                local_y: local.y,
            },
            DimmerAction::StartResize { window, pointer } => {
                let result = self.start_resize(window, pointer, time_ms);
                report("start_resize", window, result);
                InputResult::Handled
            }
            DimmerAction::Tap { window, action } => {
                match action {
                    TapAction::PinWindow => {
                        self.enter_pinned(window, now_ms);
                    }
                    TapAction::Exit => {
                        self.exit(window, ExitReason::TouchOutside, now_ms);
                    }
                    TapAction::Nothing => {}
                }
                InputResult::Handled
            }
        }
    }

    // === Drag lifecycle ===

    fn start_move(&mut self, id: WindowId, origin: Vec2, pointer: Vec2, time_ms: f64) -> FloatResult<()> {
        let area = self.area();
        let record = self.records.get_mut(&id).ok_or(FloatError::UnknownWindow(id))?;
        if record.exiting.is_some() {
            return Err(FloatError::AlreadyExiting(id));
        }
        if !record.mode.is_floating() {
            return Err(FloatError::NoDrag);
        }
        let dismiss = (record.mode == WindowMode::Pinned).then_some(&self.config.dismiss);

        record
            .animation()
            .lock()
            .start(AnimationSession::DragResize, AnimationEnd::Nothing);
        record.last_staged = None;
        self.positioner.begin_translate(record, origin, time_ms, &area, dismiss);
        let step = self.positioner.on_move(record, pointer, time_ms, &area);
        self.apply_drag_step(step);
        Ok(())
    }

    fn start_resize(&mut self, id: WindowId, pointer: Vec2, time_ms: f64) -> FloatResult<()> {
        let area = self.area();
        let handle = self.dimmer.edge_bar().bar;
        let record = self.records.get_mut(&id).ok_or(FloatError::UnknownWindow(id))?;
        if record.exiting.is_some() {
            return Err(FloatError::AlreadyExiting(id));
        }
        if record.mode != WindowMode::Mini {
            return Err(FloatError::NoDrag);
        }

        record
            .animation()
            .lock()
            .start(AnimationSession::DragResize, AnimationEnd::Nothing);
        record.last_staged = None;
        let step = self.positioner.begin_resize(record, pointer, time_ms, handle, &area);
        self.apply_drag_step(step);
        Ok(())
    }

    fn drag_move(&mut self, event: &PointerEvent) {
        let Some(id) = self.positioner.dragging_window() else {
            return;
        };
        let area = self.area();
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };
        let step = self.positioner.on_move(record, event.position, event.time_ms, &area);
        self.apply_drag_step(step);
    }

    fn apply_drag_step(&mut self, step: Option<DragStep>) {
        let Some(step) = step else {
            return;
        };
        if let Some(record) = self.records.get(&step.window) {
            record.animation().lock().push_drag_frame(step.frame);
        }
        if step.haptic {
            self.host.vibrate();
        }
        self.sync_overlays();
    }

    /// Release a drag; a cancel is released like a lift
    fn drag_end(&mut self, event: &PointerEvent, now_ms: f64) {
        let Some(id) = self.positioner.dragging_window() else {
            return;
        };
        let area = self.area();
        let display = area.display_size();
        let max_velocity = self.host.max_fling_velocity();
        let Some(record) = self.records.get_mut(&id) else {
            self.positioner.abort(now_ms);
            return;
        };

        let release = self
            .positioner
            .finish(record, event.position, event.time_ms, &area, max_velocity);
        record.animation().lock().finish_drag();
        record.last_staged = None;

        match release {
            Some(DragRelease::Fling { from, to, velocity }) => {
                if from.distance(to) > MIN_FLING_DISTANCE {
                    let base = record.resting_frame(display);
                    record.animation().lock().start(
                        AnimationSession::Spring(SpringFling::new(base, from, to, velocity)),
                        AnimationEnd::Nothing,
                    );
                }
                self.sync_overlays();
            }
            Some(DragRelease::Dismiss) => {
                self.exit(id, ExitReason::LeaveButton, now_ms);
            }
            Some(DragRelease::Resize { zone }) => match zone {
                ResizeZone::None => {
                    let result = self.snap_back(id, now_ms);
                    report("snap_back", id, result);
                }
                ResizeZone::ToPinned => {
                    self.enter_pinned(id, now_ms);
                }
                ResizeZone::ToFull => {
                    self.exit_to_fullscreen(id, now_ms);
                }
            },
            None => {}
        }
    }

    /// Animate a released resize back to the default mini scale
    fn snap_back(&mut self, id: WindowId, now_ms: f64) -> FloatResult<()> {
        let display = self.area().display_size();
        let record = self.record_mut(id)?;
        let from = record.resting_frame(display);
        record.set_scale(geometry::default_mini_scale(
            record.orientation(),
            display.is_portrait(),
        ));
        record.refresh_scale_factor(display);
        let to = record.resting_frame(display);
        record.animation().lock().start(
            AnimationSession::ToggleResize(ResizeTween::new(now_ms, ResizeCurve::SnapBack, from, to)),
            AnimationEnd::SnapBack,
        );
        self.sync_overlays();
        Ok(())
    }

    /// Drop the active drag without a release
    ///
    /// A dropped resize restores the default mini scale at once.
    pub(crate) fn abort_drag(&mut self, now_ms: f64) {
        let Some(session) = self.positioner.abort(now_ms) else {
            return;
        };
        let id = session.window();
        let display = self.area().display_size();
        if let Some(record) = self.records.get_mut(&id) {
            record.animation().lock().finish_drag();
            if session.is_resize() && record.mode == WindowMode::Mini {
                record.set_scale(geometry::default_mini_scale(
                    record.orientation(),
                    display.is_portrait(),
                ));
                record.refresh_scale_factor(display);
            }
            record.last_staged = None;
        }
        debug!(window = id, "drag aborted");
        self.sync_overlays();
    }

    /// Drop the active drag if it belongs to a window
    pub(crate) fn abort_drag_of(&mut self, id: WindowId, now_ms: f64) {
        if self.positioner.dragging_window() == Some(id) {
            self.abort_drag(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::controller;
    use crate::animation::AnimationFamily;
    use crate::input::{InputResult, PointerEvent};
    use crate::window::FloatState;

    #[test]
    fn test_unhandled_without_floating_windows() {
        let (_, mut c, _) = controller();
        let result = c.on_pointer_event(&PointerEvent::down(10.0, 10.0, 0.0), 0.0);
        assert_eq!(result, InputResult::Unhandled);
    }

    #[test]
    fn test_press_inside_mini_is_forwarded() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        let result = c.on_pointer_event(&PointerEvent::down(540.0, 1000.0, 10.0), 10.0);
        match result {
            InputResult::Forward {
                window_id,
                local_x,
                local_y,
            } => {
                assert_eq!(window_id, 1);
                assert!((local_x - 540.0).abs() < 0.01);
                assert!((local_y - 693.333).abs() < 0.01);
            }
            other => panic!("expected forward, got {:?}", other),
        }
    }

    #[test]
    fn test_double_tap_outside_exits() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        for event in [
            PointerEvent::down(540.0, 2300.0, 0.0),
            PointerEvent::up(540.0, 2300.0, 50.0),
            PointerEvent::down(540.0, 2300.0, 150.0),
        ] {
            assert_eq!(c.on_pointer_event(&event, event.time_ms), InputResult::Handled);
        }
        assert_eq!(c.state(1), FloatState::Exiting);
    }

    #[test]
    fn test_confirmed_single_tap_pins() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.on_pointer_event(&PointerEvent::down(540.0, 2300.0, 0.0), 0.0);
        c.on_pointer_event(&PointerEvent::up(540.0, 2300.0, 50.0), 50.0);
        c.tick(200.0);
        assert_eq!(c.state(1), FloatState::Mini);
        c.tick(400.0);
        assert_eq!(c.state(1), FloatState::Pinned);
    }

    #[test]
    fn test_resize_past_threshold_pins() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.on_pointer_event(&PointerEvent::down(540.0, 1936.0, 1000.0), 1000.0);
        c.on_pointer_event(&PointerEvent::move_to(540.0, 1900.0, 1016.0), 1016.0);
        assert!(c.positioner().is_dragging());
        assert!((c.record(1).unwrap().scale - 0.7625).abs() < 0.001);

        c.on_pointer_event(&PointerEvent::move_to(540.0, 1600.0, 1032.0), 1032.0);
        assert!((c.record(1).unwrap().scale - 0.45).abs() < 0.001);
        c.on_pointer_event(&PointerEvent::up(540.0, 1600.0, 1048.0), 1048.0);
        assert!(!c.positioner().is_dragging());
        assert_eq!(c.state(1), FloatState::Pinned);
    }

    #[test]
    fn test_resize_between_thresholds_snaps_back() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.on_pointer_event(&PointerEvent::down(540.0, 1936.0, 1000.0), 1000.0);
        c.on_pointer_event(&PointerEvent::move_to(540.0, 1900.0, 1016.0), 1016.0);
        c.on_pointer_event(&PointerEvent::up(540.0, 1900.0, 1032.0), 1032.0);
        let record = c.record(1).unwrap();
        assert_eq!(record.state(), FloatState::Mini);
        assert!((record.scale - 0.75).abs() < 0.001);
        assert_eq!(
            record.animation().lock().family(),
            Some(AnimationFamily::ToggleResize)
        );
    }

    #[test]
    fn test_pinned_double_tap_goes_fullscreen() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        c.on_pointer_event(&PointerEvent::down(880.0, 300.0, 100.0), 100.0);
        c.on_pointer_event(&PointerEvent::up(880.0, 300.0, 150.0), 150.0);
        c.on_pointer_event(&PointerEvent::down(880.0, 300.0, 250.0), 250.0);
        assert_eq!(c.state(1), FloatState::Fullscreen);
        assert_eq!(c.pinned_overlay().window(), None);
    }

    #[test]
    fn test_pinned_fling_springs_to_edge() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        c.on_pointer_event(&PointerEvent::down(880.0, 300.0, 100.0), 100.0);
        c.on_pointer_event(&PointerEvent::move_to(850.0, 300.0, 110.0), 110.0);
        assert!(c.positioner().dismiss_target().is_visible());
        c.on_pointer_event(&PointerEvent::move_to(300.0, 300.0, 160.0), 160.0);
        c.on_pointer_event(&PointerEvent::move_to(300.0, 300.0, 600.0), 600.0);
        c.on_pointer_event(&PointerEvent::up(300.0, 300.0, 700.0), 700.0);

        let record = c.record(1).unwrap();
        assert_eq!(record.state(), FloatState::Pinned);
        assert!(record.boundary_gap.left > 0.0);
        assert!((record.center.x - 195.2).abs() < 0.01);
        assert_eq!(record.animation().lock().family(), Some(AnimationFamily::Spring));
        assert_eq!(host.vibration_count(), 0);
    }

    #[test]
    fn test_pinned_drop_on_dismiss_target_exits() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        c.on_pointer_event(&PointerEvent::down(880.0, 300.0, 100.0), 100.0);
        c.on_pointer_event(&PointerEvent::move_to(700.0, 250.0, 120.0), 120.0);
        c.on_pointer_event(&PointerEvent::move_to(540.0, 150.0, 140.0), 140.0);
        assert!(c.positioner().dismiss_target().is_hovered());
        assert_eq!(host.vibration_count(), 1);

        c.on_pointer_event(&PointerEvent::up(540.0, 150.0, 160.0), 160.0);
        assert_eq!(c.state(1), FloatState::Exiting);
        assert_eq!(
            c.record(1).unwrap().animation().lock().family(),
            Some(AnimationFamily::CrossFade)
        );
    }

    #[test]
    fn test_long_press_menu_toggles_size() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        let (resize, _) = c.pinned_overlay().menu_buttons();
        let p = resize.center();

        c.on_pointer_event(&PointerEvent::down(p.x, p.y, 100.0), 100.0);
        c.tick(700.0);
        assert!(c.pinned_overlay().is_menu_visible());
        c.on_pointer_event(&PointerEvent::up(p.x, p.y, 720.0), 720.0);

        let (resize, _) = c.pinned_overlay().menu_buttons();
        let p = resize.center();
        c.on_pointer_event(&PointerEvent::down(p.x, p.y, 800.0), 800.0);
        c.on_pointer_event(&PointerEvent::up(p.x, p.y, 820.0), 820.0);
        assert!(!c.record(1).unwrap().pinned_small);
        assert_eq!(host.vibration_count(), 1);
    }

    #[test]
    fn test_down_during_drag_aborts_it() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.on_pointer_event(&PointerEvent::down(540.0, 1936.0, 1000.0), 1000.0);
        c.on_pointer_event(&PointerEvent::move_to(540.0, 1700.0, 1016.0), 1016.0);
        assert!(c.positioner().is_dragging());
        c.on_pointer_event(&PointerEvent::down(540.0, 2300.0, 1100.0), 1100.0);
        assert!(!c.positioner().is_dragging());
        assert!((c.record(1).unwrap().scale - 0.75).abs() < 0.001);
    }
}
