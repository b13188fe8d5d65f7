//! Per-window animation engine
//!
//! One engine exists per window state record. It holds at most one session;
//! starting a session cancels the previous one in the same call, so a stale
//! session can never write another frame or report completion.
//!
//! The engine is shared between the command context (which starts, cancels
//! and pushes drag frames) and the animation context (which advances
//! sessions and writes frames), behind a per-window mutex.

use std::sync::Arc;

use floatwin_hal::Host;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::window::{ExitReason, WindowId};
use super::session::{AnimationFamily, AnimationSession, SurfaceFrame};

/// Engine handle shared between the command and animation contexts
pub type SharedAnimation = Arc<Mutex<AnimationEngine>>;

/// What the controller must do when a session finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEnd {
    /// Nothing; the resting geometry is already recorded
    Nothing,
    /// Continue the exit pipeline
    Exit(ExitReason),
    /// Re-push the resting geometry after a size toggle
    ToggleResize,
    /// Re-push the resting geometry after a drag-resize snap-back
    SnapBack,
}

/// A finished session reported back to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub window: WindowId,
    /// Generation of the session that finished
    pub generation: u64,
    pub end: AnimationEnd,
}

/// Result of advancing an engine by one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// A surface update was staged and needs an apply
    pub staged: bool,
    pub completion: Option<Completion>,
}

#[derive(Debug)]
struct ActiveSession {
    session: AnimationSession,
    on_end: AnimationEnd,
}

/// Animation state of one window
#[derive(Debug)]
pub struct AnimationEngine {
    window: WindowId,
    active: Option<ActiveSession>,
    /// Incremented on every start
    generation: u64,
    /// Set by a cancel, cleared by the next frame
    cancelling: bool,
    /// A drag frame is waiting for the next apply
    apply_scheduled: bool,
    pending: Option<SurfaceFrame>,
}

impl AnimationEngine {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            active: None,
            generation: 0,
            cancelling: false,
            apply_scheduled: false,
            pending: None,
        }
    }

    /// Create an engine wrapped for sharing
    pub fn shared(window: WindowId) -> SharedAnimation {
        Arc::new(Mutex::new(Self::new(window)))
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Start a session, cancelling any session in flight
    ///
    /// # Returns
    /// The generation of the new session
    pub fn start(&mut self, session: AnimationSession, on_end: AnimationEnd) -> u64 {
        self.cancel();
        self.generation += 1;
        debug!(
            window = self.window,
            family = ?session.family(),
            generation = self.generation,
            "animation started"
        );
        self.active = Some(ActiveSession { session, on_end });
        self.generation
    }

    /// Cancel the session in flight
    ///
    /// The session and any pending drag frame are dropped immediately; the
    /// next frame is a cancellation frame that writes nothing.
    ///
    /// # Returns
    /// Whether a session was running
    pub fn cancel(&mut self) -> bool {
        let had_session = self.active.take().is_some();
        if had_session || self.apply_scheduled {
            self.cancelling = true;
            self.pending = None;
            self.apply_scheduled = false;
            debug!(window = self.window, "animation cancelled");
        }
        had_session
    }

    /// Check if a session is running
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Check if a cancellation frame is still outstanding
    #[inline]
    pub fn is_cancelling(&self) -> bool {
        self.cancelling
    }

    /// Family of the running session
    pub fn family(&self) -> Option<AnimationFamily> {
        self.active.as_ref().map(|a| a.session.family())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if a completion belongs to the latest session
    ///
    /// A completion is stale once another session has started, even if that
    /// session was later cancelled.
    pub fn is_current(&self, completion: &Completion) -> bool {
        completion.window == self.window
            && completion.generation == self.generation
            && self.active.is_none()
    }

    /// Queue a live drag frame for the next apply
    ///
    /// Only legal while a drag session runs. Frames pushed before the
    /// previous apply lands replace the pending frame without scheduling a
    /// second apply.
    ///
    /// # Returns
    /// Whether a new apply was scheduled
    pub fn push_drag_frame(&mut self, frame: SurfaceFrame) -> bool {
        if self.family() != Some(AnimationFamily::DragResize) {
            return false;
        }
        self.pending = Some(frame);
        if self.apply_scheduled {
            trace!(window = self.window, "drag frame coalesced");
            return false;
        }
        self.apply_scheduled = true;
        true
    }

    /// End a drag session, keeping its last pushed frame for the next apply
    pub fn finish_drag(&mut self) {
        if self.family() == Some(AnimationFamily::DragResize) {
            self.active = None;
        }
    }

    /// Advance the engine to `now_ms` and stage its frame on the host
    ///
    /// Writes are skipped when the surface is no longer valid; the next
    /// frame checks again.
    pub fn frame<H: Host + ?Sized>(&mut self, now_ms: f64, host: &H) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if self.cancelling {
            self.cancelling = false;
            if self.active.is_none() {
                return outcome;
            }
        }

        let mut frame = None;
        let mut finished = None;
        if let Some(active) = self.active.as_mut() {
            if let Some((f, done)) = active.session.advance(now_ms) {
                frame = Some(f);
                if done {
                    finished = Some(active.on_end);
                }
            }
        }
        if let Some(end) = finished {
            self.active = None;
            outcome.completion = Some(Completion {
                window: self.window,
                generation: self.generation,
                end,
            });
        }

        if self.apply_scheduled {
            self.apply_scheduled = false;
            let pushed = self.pending.take();
            if frame.is_none() {
                frame = pushed;
            }
        }

        if let Some(frame) = frame {
            if !host.is_surface_valid(self.window) {
                debug!(window = self.window, "surface invalid, frame skipped");
            } else if let Err(err) = host.stage(self.window, &frame.to_update()) {
                debug!(window = self.window, %err, "frame staging failed");
            } else {
                outcome.staged = true;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ExitTween, ResizeCurve, ResizeTween};
    use crate::math::{Size, Vec2};
    use floatwin_hal_mock::MockHost;

    fn frame(x: f32) -> SurfaceFrame {
        SurfaceFrame {
            position: Vec2::new(x, 0.0),
            crop: Size::new(100.0, 100.0),
            scale: 0.5,
            corner_radius: 8.0,
            alpha: 1.0,
        }
    }

    fn host() -> MockHost {
        let host = MockHost::default();
        host.add_window(1, "app");
        host
    }

    #[test]
    fn test_start_replaces_session() {
        let host = host();
        let mut engine = AnimationEngine::new(1);
        let first = engine.start(
            AnimationSession::CrossFade(ExitTween::new(0.0, frame(0.0), false)),
            AnimationEnd::Exit(ExitReason::TouchOutside),
        );
        let second = engine.start(
            AnimationSession::ToggleResize(ResizeTween::new(
                0.0,
                ResizeCurve::Overshoot,
                frame(0.0),
                frame(10.0),
            )),
            AnimationEnd::ToggleResize,
        );
        assert_eq!(second, first + 1);
        assert_eq!(engine.family(), Some(AnimationFamily::ToggleResize));

        // Only the toggle session may complete
        let outcome = engine.frame(1000.0, &host);
        let completion = outcome.completion.unwrap();
        assert_eq!(completion.end, AnimationEnd::ToggleResize);
        assert_eq!(completion.generation, second);
        assert!(engine.is_current(&completion));
    }

    #[test]
    fn test_stale_completion_rejected() {
        let host = host();
        let mut engine = AnimationEngine::new(1);
        engine.start(
            AnimationSession::CrossFade(ExitTween::new(0.0, frame(0.0), false)),
            AnimationEnd::Exit(ExitReason::TouchOutside),
        );
        let completion = engine.frame(500.0, &host).completion.unwrap();
        engine.start(AnimationSession::DragResize, AnimationEnd::Nothing);
        assert!(!engine.is_current(&completion));
    }

    #[test]
    fn test_cancel_writes_nothing() {
        let host = host();
        let mut engine = AnimationEngine::new(1);
        engine.start(
            AnimationSession::CrossFade(ExitTween::new(0.0, frame(0.0), false)),
            AnimationEnd::Exit(ExitReason::TouchOutside),
        );
        assert!(engine.cancel());
        assert!(engine.is_cancelling());
        let outcome = engine.frame(16.0, &host);
        assert!(!outcome.staged);
        assert!(outcome.completion.is_none());
        assert!(!engine.is_cancelling());
        assert_eq!(host.pending_count(), 0);
    }

    #[test]
    fn test_drag_frames_coalesce() {
        let host = host();
        let mut engine = AnimationEngine::new(1);
        assert!(!engine.push_drag_frame(frame(1.0)));

        engine.start(AnimationSession::DragResize, AnimationEnd::Nothing);
        assert!(engine.push_drag_frame(frame(1.0)));
        assert!(!engine.push_drag_frame(frame(2.0)));
        assert!(!engine.push_drag_frame(frame(3.0)));

        let outcome = engine.frame(16.0, &host);
        assert!(outcome.staged);
        assert_eq!(host.pending_count(), 1);
        host.apply();
        assert_eq!(host.window(1).unwrap().surface.position, Some((3.0, 0.0)));

        // Nothing new pushed: nothing staged
        assert!(!engine.frame(32.0, &host).staged);
        assert!(engine.push_drag_frame(frame(4.0)));
    }

    #[test]
    fn test_finish_drag_flushes_last_frame() {
        let host = host();
        let mut engine = AnimationEngine::new(1);
        engine.start(AnimationSession::DragResize, AnimationEnd::Nothing);
        engine.push_drag_frame(frame(7.0));
        engine.finish_drag();
        assert!(!engine.is_animating());
        assert!(engine.frame(16.0, &host).staged);
    }

    #[test]
    fn test_invalid_surface_skipped() {
        let host = host();
        host.invalidate_surface(1);
        let mut engine = AnimationEngine::new(1);
        engine.start(
            AnimationSession::CrossFade(ExitTween::new(0.0, frame(0.0), false)),
            AnimationEnd::Exit(ExitReason::NonUser),
        );
        let outcome = engine.frame(10.0, &host);
        assert!(!outcome.staged);
        // The session still runs to completion
        assert!(engine.frame(200.0, &host).completion.is_some());
    }
}
