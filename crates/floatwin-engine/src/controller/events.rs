//! Host notifications

use floatwin_hal::{Host, SettingsSource};
use tracing::{debug, info};

use crate::geometry;
use crate::math::Rect;
use crate::settings::FloatingSettings;
use crate::slots::{SlotClear, SlotEntry};
use crate::window::{WindowId, WindowMode};
use super::FloatingController;

impl<H: Host> FloatingController<H> {
    /// Re-place floating windows after a display rotation
    ///
    /// Mini windows are re-centered at the default mini scale. Pinned
    /// windows keep their snapped edges and take the vertical position
    /// recorded for the new orientation.
    pub fn on_rotation_changed(&mut self, now_ms: f64) {
        self.abort_drag(now_ms);
        let area = self.area();
        let display = area.display_size();
        let host = &self.host;

        for record in self.records.values_mut() {
            if !record.mode.is_floating() || record.exiting.is_some() {
                continue;
            }
            if let Ok(bounds) = host.window_bounds(record.id) {
                if !bounds.is_empty() {
                    record.bounds = Rect::from(bounds);
                }
            }
            match record.mode {
                WindowMode::Mini => {
                    record.center = area.display.center();
                    record.set_scale(geometry::default_mini_scale(
                        record.orientation(),
                        display.is_portrait(),
                    ));
                }
                WindowMode::Pinned => {
                    record.refresh_scale_factor(display);
                    record.center = record.center_from_gap(area.stable);
                }
                WindowMode::Fullscreen | WindowMode::Undefined => {}
            }
            record.refresh_scale_factor(display);
            record.last_staged = None;
        }
        self.sync_overlays();
        info!(landscape = area.is_landscape(), "rotation applied");
    }

    /// A display density change drops every floating window
    pub fn on_density_changed(&mut self, now_ms: f64) {
        info!("density changed, exiting floating windows");
        self.exit_all(now_ms);
    }

    /// Exit every floating window and load the new user's settings
    pub fn on_user_switched<S: SettingsSource + ?Sized>(&mut self, source: &S, now_ms: f64) {
        self.exit_all(now_ms);
        self.settings = FloatingSettings::load(source);
        self.dimmer.apply_settings(&self.settings);
        info!("user switched");
    }

    /// Reload one setting
    ///
    /// # Returns
    /// Whether the key is a floating window setting
    pub fn on_setting_changed<S: SettingsSource + ?Sized>(&mut self, source: &S, key: &str) -> bool {
        if !self.settings.reload_key(source, key) {
            return false;
        }
        self.dimmer.apply_settings(&self.settings);
        true
    }

    /// Decide whether an application window may take focus
    ///
    /// Pinned windows never take focus. While a mini window is showing,
    /// other non-floating windows are refused. An accepted fullscreen
    /// window becomes the top fullscreen window.
    pub fn on_app_focus_changed(&mut self, id: WindowId) -> bool {
        match self.records.get(&id).map(|r| r.mode) {
            Some(WindowMode::Pinned) => false,
            Some(WindowMode::Mini) => true,
            _ => {
                if self.slots.has_mini_window() {
                    debug!(window = id, "focus refused while a mini window is showing");
                    return false;
                }
                match self.host.window_package(id) {
                    Ok(package) => {
                        self.slots.record_focus_changed(SlotEntry::new(id, &package));
                        true
                    }
                    Err(err) => {
                        debug!(window = id, %err, "focus for unknown window");
                        false
                    }
                }
            }
        }
    }

    /// Forget a window whose container is gone
    pub fn on_window_destroyed(&mut self, id: WindowId, now_ms: f64) {
        self.abort_drag_of(id, now_ms);
        if let Some(record) = self.records.remove(&id) {
            record.animation().lock().cancel();
        }
        self.animator.forget(id);
        self.slots.clear(SlotClear::Window(id));
        if self.dimmer.window() == Some(id) {
            self.dimmer.detach();
        }
        if self.pinned_overlay.window() == Some(id) {
            self.pinned_overlay.detach();
        }
        self.deferred.retain(|d| d.window != id);
        self.in_transition.remove(&id);
        self.refresh_dimmer(now_ms);
        info!(window = id, "window dropped");
    }

    /// The host transition of a mode change finished
    pub fn on_transition_finished(&mut self, id: WindowId) {
        self.in_transition.remove(&id);
        if let Some(record) = self.records.get_mut(&id) {
            record.thaw();
            record.last_staged = None;
        }
    }
}
