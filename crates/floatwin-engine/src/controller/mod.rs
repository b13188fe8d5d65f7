//! Mode controller coordinating all floating window components
//!
//! This module is split into focused submodules:
//! - `transitions`: Enter mini, enter pinned, return to fullscreen, size toggle and mute
//! - `exit`: The exit pipeline (animation, move to back, delayed finalize)
//! - `input`: Pointer routing between the drag positioner and the overlays
//! - `events`: Host notifications (rotation, density, user switch, focus, destruction)
//! - `launch`: Launch routing for new activities
//!
//! The controller owns every [`WindowStateRecord`] and is the only writer of
//! slot membership. It runs in the command context; the matching
//! [`Animator`] runs the frame loop and hands completions back through
//! [`FloatingController::on_animation_end`].

mod transitions;
mod exit;
mod input;
mod events;
mod launch;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use floatwin_hal::{Host, SurfaceUpdate};
use tracing::{debug, warn};

use crate::animation::{animator_channel, Animator, AnimatorLink};
use crate::config::EngineConfig;
use crate::error::{FloatError, FloatResult};
use crate::geometry::BOUNDARY_GAP;
use crate::input::{DragArea, Positioner};
use crate::math::Rect;
use crate::overlay::{DimBackdrop, PinnedOverlay};
use crate::record::WindowStateRecord;
use crate::settings::FloatingSettings;
use crate::slots::SlotTracker;
use crate::window::{ExitReason, FloatState, WindowId, WindowMode};

pub use launch::{LaunchDecision, LaunchRequest};

/// Work scheduled for a later tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DeferredTask {
    /// Leave the floating mode once the exit delay has passed
    FinishExit(ExitReason),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Deferred {
    pub due_ms: f64,
    pub window: WindowId,
    pub task: DeferredTask,
}

/// Floating window mode controller
///
/// This is the main entry point for mode changes, managing:
/// - Window state records (one per floating-capable window)
/// - Slot tracker (who is top fullscreen, top mini, pinned)
/// - Drag positioner (translate and resize drags)
/// - Overlay chrome (dim backdrop, pinned overlay)
/// - Deferred work (exit finalization)
pub struct FloatingController<H: Host> {
    pub(crate) host: Arc<H>,
    pub(crate) config: EngineConfig,
    pub(crate) settings: FloatingSettings,
    pub(crate) slots: Arc<SlotTracker>,
    pub(crate) records: HashMap<WindowId, WindowStateRecord>,
    pub(crate) animator: AnimatorLink,
    pub(crate) positioner: Positioner,
    pub(crate) dimmer: DimBackdrop,
    pub(crate) pinned_overlay: PinnedOverlay,
    pub(crate) deferred: Vec<Deferred>,
    /// Windows with a host transition in flight
    pub(crate) in_transition: HashSet<WindowId>,
}

impl<H: Host> FloatingController<H> {
    /// Create a controller and the animator that drives its windows
    pub fn new(host: Arc<H>, settings: FloatingSettings, config: EngineConfig) -> (Self, Animator<H>) {
        let (link, animator) = animator_channel(host.clone());
        let controller = Self {
            host,
            dimmer: DimBackdrop::new(&config, &settings),
            pinned_overlay: PinnedOverlay::new(&config),
            config,
            settings,
            slots: Arc::new(SlotTracker::new()),
            records: HashMap::new(),
            animator: link,
            positioner: Positioner::new(),
            deferred: Vec::new(),
            in_transition: HashSet::new(),
        };
        (controller, animator)
    }

    // === Queries ===

    /// Observable state of a window; untracked windows are fullscreen
    pub fn state(&self, id: WindowId) -> FloatState {
        self.records
            .get(&id)
            .map(WindowStateRecord::state)
            .unwrap_or(FloatState::Fullscreen)
    }

    pub fn record(&self, id: WindowId) -> Option<&WindowStateRecord> {
        self.records.get(&id)
    }

    /// Shared handle to the slot tracker
    pub fn slots(&self) -> &Arc<SlotTracker> {
        &self.slots
    }

    pub fn settings(&self) -> &FloatingSettings {
        &self.settings
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn positioner(&self) -> &Positioner {
        &self.positioner
    }

    pub fn dimmer(&self) -> &DimBackdrop {
        &self.dimmer
    }

    pub fn pinned_overlay(&self) -> &PinnedOverlay {
        &self.pinned_overlay
    }

    /// Check if a host transition is still running for a window
    pub fn is_in_transition(&self, id: WindowId) -> bool {
        self.in_transition.contains(&id)
    }

    /// Number of deferred tasks waiting for their deadline
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    // === Frame loop ===

    /// Poll time-driven gestures, run due deferred work and push resting
    /// geometry for windows at rest
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(window) = self.pinned_overlay.window() {
            let action = self.pinned_overlay.poll(now_ms);
            self.handle_overlay_action(window, action, now_ms);
        }
        let action = self.dimmer.poll(now_ms);
        self.handle_dimmer_action(action, now_ms, now_ms);
        self.run_deferred(now_ms);
        self.prepare_surfaces();
    }

    /// Advance the animator one frame and deliver its completions
    ///
    /// # Returns
    /// Number of sessions that finished
    pub fn run_frame(&mut self, animator: &mut Animator<H>, now_ms: f64) -> usize {
        let completions = animator.frame(now_ms);
        let count = completions.len();
        for completion in completions {
            self.on_animation_end(completion, now_ms);
        }
        count
    }

    fn run_deferred(&mut self, now_ms: f64) {
        if self.deferred.is_empty() {
            return;
        }
        let (due, waiting): (Vec<Deferred>, Vec<Deferred>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|d| d.due_ms <= now_ms);
        self.deferred = waiting;
        for task in due {
            match task.task {
                DeferredTask::FinishExit(reason) => {
                    let result = self.finish_exit(task.window, reason, now_ms);
                    report("finish_exit", task.window, result);
                }
            }
        }
    }

    /// Push the resting geometry of every floating window at rest
    ///
    /// Windows that are animating, dragged, exiting or inside a host
    /// transition are skipped. Unchanged frames are not staged again.
    pub(crate) fn prepare_surfaces(&mut self) {
        let area = self.area();
        let display = area.display_size();
        let dragging = self.positioner.dragging_window();
        let mut staged = false;

        for record in self.records.values_mut() {
            if !record.mode.is_floating()
                || record.exiting.is_some()
                || dragging == Some(record.id)
                || self.in_transition.contains(&record.id)
                || record.is_animating()
            {
                continue;
            }

            if record.mode == WindowMode::Pinned {
                let rect = record.placement(display).rect;
                record.boundary_gap.top = if rect.top() <= area.stable.top() + BOUNDARY_GAP {
                    BOUNDARY_GAP
                } else {
                    0.0
                };
                record.boundary_gap.bottom =
                    if rect.bottom() >= area.stable.bottom() - BOUNDARY_GAP {
                        BOUNDARY_GAP
                    } else {
                        0.0
                    };
                record.center = record.center_from_gap(area.stable);
                record.set_vertical_ratio(record.center, area.stable, false);
            }

            let frame = record.resting_frame(display);
            if record.last_staged == Some(frame) {
                continue;
            }
            let result = if self.host.is_surface_valid(record.id) {
                self.host
                    .stage(record.id, &frame.to_update())
                    .map_err(FloatError::from)
            } else {
                Err(FloatError::SurfaceInvalid(record.id))
            };
            match result {
                Ok(()) => {
                    record.last_staged = Some(frame);
                    staged = true;
                }
                Err(err) => debug!(window = record.id, %err, "resting frame not staged"),
            }
        }

        if staged {
            self.host.apply();
        }
    }

    // === Helpers ===

    /// Put an identity transform back on a window leaving the floating modes
    ///
    /// The surface fills its container again: full crop at the container
    /// origin, no scale, square corners, opaque.
    pub(crate) fn reset_surface(&self, id: WindowId) -> FloatResult<()> {
        if !self.host.is_surface_valid(id) {
            return Err(FloatError::SurfaceInvalid(id));
        }
        let bounds = Rect::from(self.host.window_bounds(id)?);
        let update = SurfaceUpdate::new()
            .position(bounds.x, bounds.y)
            .crop(bounds.width, bounds.height)
            .scale(1.0)
            .corner_radius(0.0)
            .alpha(1.0)
            .visible(true);
        self.host.stage(id, &update)?;
        self.host.apply();
        Ok(())
    }

    /// Current display and stable areas
    pub(crate) fn area(&self) -> DragArea {
        DragArea::new(
            Rect::from(self.host.display_bounds()),
            Rect::from(self.host.stable_bounds()),
        )
    }

    pub(crate) fn record_ref(&self, id: WindowId) -> FloatResult<&WindowStateRecord> {
        self.records.get(&id).ok_or(FloatError::UnknownWindow(id))
    }

    pub(crate) fn record_mut(&mut self, id: WindowId) -> FloatResult<&mut WindowStateRecord> {
        self.records.get_mut(&id).ok_or(FloatError::UnknownWindow(id))
    }

    /// Create the record of a window the first time it is seen
    pub(crate) fn ensure_record(&mut self, id: WindowId) -> FloatResult<()> {
        if self.records.contains_key(&id) {
            return Ok(());
        }
        let bounds = self
            .host
            .window_bounds(id)
            .map_err(|_| FloatError::MissingContainer(id))?;
        let package = self
            .host
            .window_package(id)
            .map_err(|_| FloatError::MissingContainer(id))?;
        let record = WindowStateRecord::new(id, &package, Rect::from(bounds), &self.config);
        self.animator.track(id, record.animation().clone());
        debug!(window = id, package = %package, "window record created");
        self.records.insert(id, record);
        Ok(())
    }

    /// Bring the overlays in line with their windows' geometry
    pub(crate) fn sync_overlays(&mut self) {
        let area = self.area();
        let display = area.display_size();
        if let Some(record) = self.dimmer.window().and_then(|id| self.records.get(&id)) {
            let rect = record.placement(display).rect;
            self.dimmer.relayout(rect, record.real_scale(), area.is_landscape());
        }
        if let Some(record) = self.pinned_overlay.window().and_then(|id| self.records.get(&id)) {
            self.pinned_overlay.update_bounds(record.placement(display).rect);
            self.pinned_overlay.set_state(record.pinned_small, record.muted);
        }
    }

    /// Keep the dim backdrop attached to the visible mini window
    pub(crate) fn refresh_dimmer(&mut self, now_ms: f64) {
        let target = self.slots.top_mini().map(|e| e.window).filter(|id| {
            self.records
                .get(id)
                .is_some_and(|r| r.mode == WindowMode::Mini && r.exiting.is_none())
        });
        if self.dimmer.window() != target {
            self.dimmer.detach();
            if let Some(id) = target {
                self.dimmer.attach(id, now_ms);
            }
        }
        self.sync_overlays();
    }
}

/// Log a failed request and turn the outcome into a flag
///
/// Benign errors (the request does not apply right now) are logged at
/// debug level, everything else as a warning.
pub(crate) fn report(op: &'static str, window: WindowId, result: FloatResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) if err.is_benign() => {
            debug!(window, op, %err, "request ignored");
            false
        }
        Err(err) => {
            warn!(window, op, %err, "request failed");
            false
        }
    }
}
