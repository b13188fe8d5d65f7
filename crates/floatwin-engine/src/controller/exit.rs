//! Exit pipeline
//!
//! An exit runs in three steps: the exit animation (skipped when another
//! window supersedes this one), then the window is dropped behind the
//! fullscreen task, and after the exit delay it leaves the floating modes.

use floatwin_hal::Host;
use tracing::{debug, info, warn};

use crate::animation::{AnimationEnd, AnimationSession, Completion, ExitTween};
use crate::error::{FloatError, FloatResult};
use crate::window::{ExitReason, WindowId, WindowMode};
use super::{report, Deferred, DeferredTask, FloatingController};

impl<H: Host> FloatingController<H> {
    /// Start leaving the floating modes
    pub fn exit(&mut self, id: WindowId, reason: ExitReason, now_ms: f64) -> bool {
        let result = self.try_exit(id, reason, now_ms);
        report("exit", id, result)
    }

    /// Exit every floating window
    pub fn exit_all(&mut self, now_ms: f64) {
        let state = self.slots.snapshot();
        let targets: Vec<WindowId> = state
            .mini_stack
            .iter()
            .rev()
            .chain(state.top_pinned.iter())
            .map(|e| e.window)
            .filter(|id| self.records.get(id).is_some_and(|r| r.exiting.is_none()))
            .collect();
        for id in targets {
            self.exit(id, ExitReason::TouchOutside, now_ms);
        }
    }

    fn try_exit(&mut self, id: WindowId, reason: ExitReason, now_ms: f64) -> FloatResult<()> {
        let record = self.record_ref(id)?;
        if record.exiting.is_some() {
            return Err(FloatError::AlreadyExiting(id));
        }
        if !record.mode.is_floating() {
            return Err(FloatError::IllegalTransition {
                window: id,
                from: record.mode,
                to: WindowMode::Undefined,
            });
        }

        self.abort_drag_of(id, now_ms);
        if reason == ExitReason::TouchOutside {
            self.slots.remove_mini(id);
        }

        let display = self.area().display_size();
        let record = self.record_mut(id)?;
        record.exiting = Some(reason);
        record.last_staged = None;
        if reason.is_supersession() {
            record.animation().lock().cancel();
        } else {
            let from = record.resting_frame(display);
            let tween = ExitTween::new(now_ms, from, reason == ExitReason::LeaveButton);
            record
                .animation()
                .lock()
                .start(AnimationSession::CrossFade(tween), AnimationEnd::Exit(reason));
        }

        if self.dimmer.window() == Some(id) {
            self.dimmer.detach();
        }
        if self.pinned_overlay.window() == Some(id) {
            self.pinned_overlay.detach();
        }
        self.refresh_dimmer(now_ms);
        info!(window = id, ?reason, "exit started");

        if reason.is_supersession() {
            self.after_exit_animation(id, reason, now_ms);
        }
        Ok(())
    }

    /// Abandon a pending exit so a new mode change can take over
    ///
    /// Drops the exit animation and the scheduled finalize, and takes the
    /// window out of any slot it still holds.
    pub(crate) fn cancel_exit(&mut self, id: WindowId) -> FloatResult<()> {
        let record = self.record_mut(id)?;
        let Some(reason) = record.exiting.take() else {
            return Ok(());
        };
        record.animation().lock().cancel();
        record.last_staged = None;
        self.deferred
            .retain(|d| !(d.window == id && matches!(d.task, DeferredTask::FinishExit(_))));
        self.slots.remove_mini(id);
        self.slots.clear_pinned_if(id);
        debug!(window = id, ?reason, "pending exit cancelled");
        Ok(())
    }

    /// Drop the window behind the fullscreen task and schedule the finalize
    fn after_exit_animation(&mut self, id: WindowId, reason: ExitReason, now_ms: f64) {
        if let Err(err) = self.host.set_always_on_top(id, false) {
            debug!(window = id, %err, "clearing always-on-top failed");
        }
        if let Err(err) = self.host.move_to_back(id) {
            debug!(window = id, %err, "move to back failed");
        }
        self.deferred.push(Deferred {
            due_ms: now_ms + f64::from(self.config.exit_delay_ms),
            window: id,
            task: DeferredTask::FinishExit(reason),
        });
    }

    /// Leave the floating modes once the exit delay has passed
    ///
    /// Only this window's own slot entries are removed, so a window that
    /// superseded it keeps its slot.
    pub(crate) fn finish_exit(&mut self, id: WindowId, reason: ExitReason, now_ms: f64) -> FloatResult<()> {
        if self.record_ref(id)?.exiting != Some(reason) {
            debug!(window = id, ?reason, "exit no longer pending");
            return Ok(());
        }
        if let Err(err) = self.host.set_window_bounds(id, None) {
            warn!(window = id, %err, "resetting bounds failed");
        }
        if let Err(err) = self.reset_surface(id) {
            debug!(window = id, %err, "surface not reset");
        }
        self.slots.remove_mini(id);
        self.slots.clear_pinned_if(id);

        let display = self.area().display;
        let record = self.record_mut(id)?;
        record.exiting = None;
        record.bounds = display;
        record.thaw();
        self.set_mode(id, WindowMode::Undefined)?;
        self.in_transition.remove(&id);

        self.host.update_focused_window();
        self.refresh_dimmer(now_ms);
        info!(window = id, ?reason, "exit finished");
        Ok(())
    }

    /// Handle a finished animation session
    ///
    /// Completions of sessions that were superseded by a later start are
    /// dropped.
    pub fn on_animation_end(&mut self, completion: Completion, now_ms: f64) {
        let id = completion.window;
        let Some(record) = self.records.get_mut(&id) else {
            debug!(window = id, "completion for unknown window");
            return;
        };
        if !record.animation().lock().is_current(&completion) {
            debug!(window = id, generation = completion.generation, "stale completion dropped");
            return;
        }
        record.last_staged = None;
        match completion.end {
            AnimationEnd::Exit(reason) => {
                if record.exiting == Some(reason) {
                    self.after_exit_animation(id, reason, now_ms);
                }
            }
            AnimationEnd::Nothing | AnimationEnd::ToggleResize | AnimationEnd::SnapBack => {}
        }
        self.sync_overlays();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::controller;
    use crate::animation::{AnimationEnd, Completion};
    use crate::window::{ExitReason, FloatState};

    #[test]
    fn test_touch_outside_clears_slot_immediately() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        assert!(c.exit(1, ExitReason::TouchOutside, 100.0));
        assert_eq!(c.state(1), FloatState::Exiting);
        assert!(!c.slots().has_mini_window());
        assert_eq!(c.dimmer().window(), None);
        assert!(c.record(1).unwrap().is_animating());
        assert!(host.window(1).unwrap().always_on_top);
        assert!(!c.exit(1, ExitReason::TouchOutside, 110.0));
    }

    #[test]
    fn test_exit_pipeline_runs_to_fullscreen() {
        let (host, mut c, mut animator) = controller();
        c.enter_mini(1, 0.0);
        c.exit(1, ExitReason::TouchOutside, 100.0);

        c.run_frame(&mut animator, 116.0);
        assert_eq!(c.run_frame(&mut animator, 260.0), 1);
        assert!(!host.window(1).unwrap().always_on_top);
        assert!(host.has_log_containing("move_to_back 1"));
        assert_eq!(c.pending_tasks(), 1);

        c.tick(400.0);
        assert_eq!(c.state(1), FloatState::Exiting);
        c.tick(460.0);
        assert_eq!(c.state(1), FloatState::Fullscreen);
        assert_eq!(host.window(1).unwrap().bounds, None);
        assert!(c.record(1).unwrap().freeze.is_none());
    }

    #[test]
    fn test_supersession_skips_animation() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_mini(2, 50.0);
        assert!(!c.record(1).unwrap().is_animating());
        assert!(host.has_log_containing("move_to_back 1"));
        assert_eq!(c.pending_tasks(), 1);

        c.tick(250.0);
        assert_eq!(c.state(1), FloatState::Fullscreen);
        assert_eq!(c.state(2), FloatState::Mini);
        assert_eq!(c.slots().top_mini().unwrap().window, 2);
        assert_eq!(c.dimmer().window(), Some(2));
    }

    #[test]
    fn test_exit_fullscreen_rejected() {
        let (_, mut c, _) = controller();
        assert!(!c.exit(1, ExitReason::NonUser, 0.0));
        c.ensure_record(1).unwrap();
        assert!(!c.exit(1, ExitReason::NonUser, 0.0));
        assert_eq!(c.pending_tasks(), 0);
    }

    #[test]
    fn test_stale_exit_completion_ignored() {
        let (host, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.exit(1, ExitReason::NonUser, 10.0);
        let generation = c.record(1).unwrap().animation().lock().generation();
        c.on_animation_end(
            Completion {
                window: 1,
                generation: generation - 1,
                end: AnimationEnd::Exit(ExitReason::NonUser),
            },
            20.0,
        );
        assert_eq!(c.pending_tasks(), 0);
        assert!(!host.has_log_containing("move_to_back 1"));
    }

    #[test]
    fn test_exit_all_covers_mini_and_pinned() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        c.enter_mini(2, 20.0);
        c.exit_all(30.0);
        assert_eq!(c.state(1), FloatState::Exiting);
        assert_eq!(c.state(2), FloatState::Exiting);
        assert!(!c.slots().has_mini_window());
    }

    #[test]
    fn test_finish_exit_keeps_new_pinned_occupant() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        c.enter_mini(2, 20.0);
        c.enter_pinned(2, 30.0);
        assert_eq!(c.state(1), FloatState::Exiting);
        c.tick(330.0);
        assert_eq!(c.state(1), FloatState::Fullscreen);
        assert_eq!(c.state(2), FloatState::Pinned);
        assert_eq!(c.slots().top_pinned().unwrap().window, 2);
    }

    #[test]
    fn test_finished_exit_restores_surface() {
        let (host, mut c, mut animator) = controller();
        c.enter_mini(1, 0.0);
        c.on_transition_finished(1);
        c.tick(16.0);
        assert!(host.window(1).unwrap().surface.scale.is_some_and(|s| s < 1.0));

        c.exit(1, ExitReason::TouchOutside, 100.0);
        let mut now = 100.0;
        for _ in 0..40 {
            now += 16.0;
            c.run_frame(&mut animator, now);
            c.tick(now);
        }

        assert_eq!(c.state(1), FloatState::Fullscreen);
        let surface = host.window(1).unwrap().surface;
        assert_eq!(surface.alpha, Some(1.0));
        assert_eq!(surface.scale, Some(1.0));
        assert_eq!(surface.corner_radius, Some(0.0));
        assert_eq!(surface.position, Some((0.0, 0.0)));
        assert_eq!(surface.crop, Some((1080.0, 2400.0)));
    }

    #[test]
    fn test_enter_mini_during_exit_fade_resumes() {
        let (host, mut c, mut animator) = controller();
        c.enter_mini(1, 0.0);
        c.exit(1, ExitReason::TouchOutside, 100.0);
        c.run_frame(&mut animator, 116.0);

        assert!(c.enter_mini(1, 120.0));
        assert_eq!(c.state(1), FloatState::Mini);
        assert_eq!(c.slots().top_mini().unwrap().window, 1);
        assert!(!c.record(1).unwrap().is_animating());
        assert!(host.window(1).unwrap().always_on_top);

        let mut now = 120.0;
        for _ in 0..40 {
            now += 16.0;
            c.run_frame(&mut animator, now);
            c.tick(now);
        }
        assert_eq!(c.state(1), FloatState::Mini);
        assert_eq!(c.dimmer().window(), Some(1));
        assert!(!host.has_log_containing("move_to_back 1"));
    }

    #[test]
    fn test_resumed_window_ignores_stale_finish() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        c.enter_mini(2, 10.0);
        assert_eq!(c.state(1), FloatState::Exiting);
        assert_eq!(c.pending_tasks(), 1);

        assert!(c.enter_mini(1, 20.0));
        assert_eq!(c.state(2), FloatState::Exiting);
        assert_eq!(c.pending_tasks(), 1);

        c.tick(400.0);
        assert_eq!(c.state(1), FloatState::Mini);
        assert_eq!(c.state(2), FloatState::Fullscreen);
        assert_eq!(c.slots().snapshot().mini_stack.len(), 1);
    }

    #[test]
    fn test_exit_to_fullscreen_during_exit_fade() {
        let (_, mut c, mut animator) = controller();
        c.enter_mini(1, 0.0);
        c.exit(1, ExitReason::NonUser, 100.0);
        assert!(c.exit_to_fullscreen(1, 110.0));
        assert_eq!(c.state(1), FloatState::Fullscreen);

        let mut now = 110.0;
        for _ in 0..40 {
            now += 16.0;
            c.run_frame(&mut animator, now);
            c.tick(now);
        }
        assert_eq!(c.state(1), FloatState::Fullscreen);
        assert_eq!(c.pending_tasks(), 0);
        assert!(!c.slots().has_mini_window());
    }
}

