//! Mode transitions between fullscreen, mini and pinned

use floatwin_hal::{Bounds, Host};
use tracing::{debug, info, warn};

use crate::animation::{AnimationEnd, AnimationSession, ResizeCurve, ResizeTween};
use crate::error::{FloatError, FloatResult};
use crate::geometry;
use crate::math::{BoundaryGap, Rect};
use crate::record::FreezeSnapshot;
use crate::slots::{SlotEntry, SlotKind};
use crate::window::{ExitReason, WindowId, WindowMode};
use super::{report, FloatingController};

impl<H: Host> FloatingController<H> {
    /// Show a window as the top mini window
    ///
    /// A fullscreen window gets centered popup bounds; a pinned window keeps
    /// its bounds and moves back onto the mini stack. Any other mini window
    /// on top is superseded. A window still exiting is brought back.
    pub fn enter_mini(&mut self, id: WindowId, now_ms: f64) -> bool {
        let result = self.try_enter_mini(id, now_ms);
        report("enter_mini", id, result)
    }

    /// Dock the top mini window as the pinned window
    ///
    /// Only a mini window can be pinned. A window already holding the pinned
    /// slot is superseded.
    pub fn enter_pinned(&mut self, id: WindowId, now_ms: f64) -> bool {
        let result = self.try_enter_pinned(id, now_ms);
        report("enter_pinned", id, result)
    }

    /// Return a floating window straight to fullscreen, without the exit
    /// animation
    pub fn exit_to_fullscreen(&mut self, id: WindowId, now_ms: f64) -> bool {
        let result = self.try_exit_to_fullscreen(id, now_ms);
        report("exit_to_fullscreen", id, result)
    }

    /// Flip a pinned window between its small and large size
    pub fn toggle_resize(&mut self, id: WindowId, now_ms: f64) -> bool {
        let result = self.try_toggle_resize(id, now_ms);
        report("toggle_resize", id, result)
    }

    /// Mute or unmute the application of a floating window
    pub fn toggle_mute(&mut self, id: WindowId) -> bool {
        let result = self.try_toggle_mute(id);
        report("toggle_mute", id, result)
    }

    fn try_enter_mini(&mut self, id: WindowId, now_ms: f64) -> FloatResult<()> {
        self.ensure_record(id)?;
        let record = self.record_ref(id)?;
        let resuming = record.exiting.is_some();
        let mode = record.mode;
        let package = record.package.clone();
        let on_top = self.slots.top_mini().is_some_and(|e| e.window == id);
        if !resuming && mode == WindowMode::Mini && on_top {
            debug!(window = id, "already the top mini window");
            return Ok(());
        }
        let from_pinned = mode == WindowMode::Pinned && !resuming;

        // Host container first; the engine is untouched if it fails
        let previous = self
            .host
            .window_bounds(id)
            .map_err(|_| FloatError::MissingContainer(id))?;
        let popup = (!from_pinned).then(|| geometry::default_popup_bounds(Rect::from(previous)));
        self.raise_container(id, previous, popup)?;

        self.cancel_exit(id)?;
        self.abort_drag_of(id, now_ms);
        let display = self.area().display_size();
        let from = {
            let record = self.record_mut(id)?;
            record.animation().lock().cancel();
            let from = record.freeze(display);
            if let Some(bounds) = popup {
                record.bounds = bounds;
            }
            from
        };

        if let Some(top) = self.slots.top_mini().filter(|e| e.window != id) {
            self.exit(top.window, ExitReason::SupersededByNewMini, now_ms);
        }
        if from_pinned && self.slots.top_pinned().is_some_and(|e| e.window == id) {
            self.slots.move_pinned_to_mini();
            if self.pinned_overlay.window() == Some(id) {
                self.pinned_overlay.detach();
            }
        } else {
            self.slots.push_mini(SlotEntry::new(id, &package));
        }

        if let Err(err) = self.set_mode(id, WindowMode::Mini) {
            if let Some(record) = self.records.get_mut(&id) {
                record.thaw();
            }
            return Err(err);
        }
        let to = self.record_ref(id)?.snapshot(display);
        self.start_transition(id, &from, &to);
        self.refresh_dimmer(now_ms);
        self.host.update_focused_window();
        info!(window = id, from = ?mode, resuming, "entered mini");
        Ok(())
    }

    /// Give a window its floating container: popup bounds when leaving
    /// fullscreen, then always-on-top
    ///
    /// The previous bounds are restored when raising fails.
    fn raise_container(&self, id: WindowId, previous: Bounds, popup: Option<Rect>) -> FloatResult<()> {
        if let Some(bounds) = popup {
            self.host.set_window_bounds(id, Some(bounds.to_bounds()))?;
        }
        if let Err(err) = self.host.set_always_on_top(id, true) {
            if popup.is_some() {
                if let Err(err) = self.host.set_window_bounds(id, Some(previous)) {
                    warn!(window = id, %err, "restoring bounds failed");
                }
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn try_enter_pinned(&mut self, id: WindowId, now_ms: f64) -> FloatResult<()> {
        let record = self.record_ref(id)?;
        if record.exiting.is_some() {
            return Err(FloatError::AlreadyExiting(id));
        }
        if record.mode != WindowMode::Mini || self.slots.slot_of(id) != Some(SlotKind::Mini) {
            return Err(FloatError::IllegalTransition {
                window: id,
                from: record.mode,
                to: WindowMode::Pinned,
            });
        }

        self.abort_drag_of(id, now_ms);
        let display = self.area().display_size();
        let from = {
            let record = self.record_mut(id)?;
            record.animation().lock().cancel();
            record.freeze(display)
        };

        let displaced = self.slots.move_mini_to_pinned(id);
        if let Some(previous) = displaced {
            self.exit(previous.window, ExitReason::SupersededByNewPinned, now_ms);
        }

        self.set_mode(id, WindowMode::Pinned)?;
        let record = self.record_ref(id)?;
        let to = record.snapshot(display);
        let (rect, small, muted) = (to.rect, record.pinned_small, record.muted);
        self.start_transition(id, &from, &to);

        self.pinned_overlay.attach(id, rect, small, muted);
        self.refresh_dimmer(now_ms);
        self.host.update_focused_window();
        info!(window = id, "entered pinned");
        Ok(())
    }

    fn try_exit_to_fullscreen(&mut self, id: WindowId, now_ms: f64) -> FloatResult<()> {
        let record = self.record_ref(id)?;
        let mode = record.mode;
        if !mode.is_floating() {
            return Err(FloatError::IllegalTransition {
                window: id,
                from: mode,
                to: WindowMode::Fullscreen,
            });
        }
        let package = record.package.clone();

        // Host container first; the engine is untouched if it fails
        let previous = self
            .host
            .window_bounds(id)
            .map_err(|_| FloatError::MissingContainer(id))?;
        self.host.set_window_bounds(id, None)?;
        if let Err(err) = self.host.set_always_on_top(id, false) {
            if let Err(err) = self.host.set_window_bounds(id, Some(previous)) {
                warn!(window = id, %err, "restoring bounds failed");
            }
            return Err(err.into());
        }

        self.cancel_exit(id)?;
        self.abort_drag_of(id, now_ms);
        let area = self.area();
        let display = area.display_size();
        let from = {
            let record = self.record_mut(id)?;
            record.animation().lock().cancel();
            let from = record.freeze(display);
            record.bounds = area.display;
            from
        };

        if mode == WindowMode::Pinned && self.slots.top_pinned().is_some_and(|e| e.window == id) {
            self.slots.move_pinned_to_full();
        } else {
            self.slots.remove_mini(id);
            self.slots.record_focus_changed(SlotEntry::new(id, &package));
        }
        if self.pinned_overlay.window() == Some(id) {
            self.pinned_overlay.detach();
        }

        if let Err(err) = self.set_mode(id, WindowMode::Fullscreen) {
            if let Some(record) = self.records.get_mut(&id) {
                record.thaw();
            }
            return Err(err);
        }
        let to = self.record_ref(id)?.snapshot(display);
        self.start_transition(id, &from, &to);
        if let Err(err) = self.reset_surface(id) {
            debug!(window = id, %err, "surface not reset");
        }
        self.refresh_dimmer(now_ms);
        self.host.update_focused_window();
        info!(window = id, from = ?mode, "returned to fullscreen");
        Ok(())
    }

    fn try_toggle_resize(&mut self, id: WindowId, now_ms: f64) -> FloatResult<()> {
        self.abort_drag_of(id, now_ms);
        let area = self.area();
        let display = area.display_size();
        let record = self.record_mut(id)?;
        if record.exiting.is_some() {
            return Err(FloatError::AlreadyExiting(id));
        }
        if record.mode != WindowMode::Pinned {
            return Err(FloatError::IllegalTransition {
                window: id,
                from: record.mode,
                to: WindowMode::Pinned,
            });
        }

        let from = record.resting_frame(display);
        let small = !record.pinned_small;
        record.set_scale(geometry::default_pinned_scale(record.orientation(), small));
        record.pinned_small = small;
        record.refresh_scale_factor(display);
        record.center = record.center_from_gap(area.stable);
        record.set_vertical_ratio(record.center, area.stable, false);
        let to = record.resting_frame(display);
        record.last_staged = None;
        record.animation().lock().start(
            AnimationSession::ToggleResize(ResizeTween::new(now_ms, ResizeCurve::Overshoot, from, to)),
            AnimationEnd::ToggleResize,
        );

        self.sync_overlays();
        info!(window = id, small, "pinned size toggled");
        Ok(())
    }

    fn try_toggle_mute(&mut self, id: WindowId) -> FloatResult<()> {
        let record = self.records.get_mut(&id).ok_or(FloatError::UnknownWindow(id))?;
        if !record.mode.is_floating() || record.exiting.is_some() {
            return Err(FloatError::IllegalTransition {
                window: id,
                from: record.mode,
                to: record.mode,
            });
        }
        let muted = !record.muted;
        self.host.set_app_muted(&record.package, muted)?;
        record.muted = muted;
        self.sync_overlays();
        info!(window = id, muted, "mute toggled");
        Ok(())
    }

    /// Change a window's mode and apply the per-mode geometry
    ///
    /// Mini windows take the default mini scale at the display center;
    /// pinned windows take their size tier snapped to the top-right corner.
    /// Leaving the floating modes resets the size tier and restores audio.
    pub(crate) fn set_mode(&mut self, id: WindowId, mode: WindowMode) -> FloatResult<()> {
        let area = self.area();
        let display = area.display_size();
        let keep_mute = self.settings.keep_mute_in_mini;
        let host = &self.host;
        let config = &self.config;
        let record = self.records.get_mut(&id).ok_or(FloatError::UnknownWindow(id))?;
        let previous = record.mode;
        record.mode = mode;

        match mode {
            WindowMode::Mini => {
                record.set_scale(geometry::default_mini_scale(
                    record.orientation(),
                    display.is_portrait(),
                ));
                record.center = area.display.center();
                record.corner_radius = config.mini_corner_radius;
                record.boundary_gap = BoundaryGap::EMPTY;
                if previous == WindowMode::Pinned && record.muted && !keep_mute {
                    if let Err(err) = host.set_app_muted(&record.package, false) {
                        warn!(window = id, %err, "unmute for mini failed");
                    }
                }
            }
            WindowMode::Pinned => {
                record.set_scale(geometry::default_pinned_scale(
                    record.orientation(),
                    record.pinned_small,
                ));
                record.corner_radius = config.pinned_corner_radius;
                record.boundary_gap = BoundaryGap::ORIGIN;
                record.refresh_scale_factor(display);
                record.center = record.center_from_gap(area.stable);
                record.set_vertical_ratio(record.center, area.stable, false);
                if previous == WindowMode::Mini && record.muted && !keep_mute {
                    if let Err(err) = host.set_app_muted(&record.package, true) {
                        warn!(window = id, %err, "restoring mute failed");
                    }
                }
            }
            WindowMode::Fullscreen | WindowMode::Undefined => {
                record.animation().lock().cancel();
                record.pinned_small = true;
                record.set_drag_scale(1.0);
                record.center = record.bounds.center();
                record.corner_radius = 0.0;
                record.boundary_gap = BoundaryGap::ORIGIN;
                if record.muted {
                    record.muted = false;
                    if let Err(err) = host.set_app_muted(&record.package, false) {
                        warn!(window = id, %err, "restoring audio failed");
                    }
                }
            }
        }
        record.refresh_scale_factor(display);
        record.last_staged = None;
        debug!(window = id, from = ?previous, to = ?mode, "mode changed");
        Ok(())
    }

    /// Hand a mode change to the host transition
    pub(crate) fn start_transition(&mut self, id: WindowId, from: &FreezeSnapshot, to: &FreezeSnapshot) {
        match self
            .host
            .play_transition(id, &from.surface_geometry(), &to.surface_geometry())
        {
            Ok(()) => {
                self.in_transition.insert(id);
            }
            Err(err) => {
                debug!(window = id, %err, "transition not played");
                if let Some(record) = self.records.get_mut(&id) {
                    record.thaw();
                }
            }
        }
    }
}
