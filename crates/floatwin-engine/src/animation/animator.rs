//! Animation context
//!
//! The animator owns the frame loop. The command context registers each
//! window's engine over a channel; the animator advances every engine once
//! per frame, applies one compositor transaction for everything staged and
//! hands finished sessions back as completions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use floatwin_hal::Host;
use tracing::trace;

use crate::window::WindowId;
use super::engine::{Completion, SharedAnimation};

/// Registration message from the command context
pub enum AnimatorMsg {
    Track(WindowId, SharedAnimation),
    Forget(WindowId),
}

/// Command-side handle for registering engines with the animator
#[derive(Clone)]
pub struct AnimatorLink {
    tx: Sender<AnimatorMsg>,
}

impl AnimatorLink {
    /// Start driving a window's engine
    pub fn track(&self, window: WindowId, engine: SharedAnimation) {
        // A closed channel means the animator is gone; nothing left to drive
        let _ = self.tx.send(AnimatorMsg::Track(window, engine));
    }

    /// Stop driving a window's engine
    pub fn forget(&self, window: WindowId) {
        let _ = self.tx.send(AnimatorMsg::Forget(window));
    }
}

/// Frame loop state for all tracked engines
pub struct Animator<H: Host> {
    host: Arc<H>,
    rx: Receiver<AnimatorMsg>,
    engines: BTreeMap<WindowId, SharedAnimation>,
}

/// Create a connected link and animator
pub fn animator_channel<H: Host>(host: Arc<H>) -> (AnimatorLink, Animator<H>) {
    let (tx, rx) = unbounded();
    (
        AnimatorLink { tx },
        Animator {
            host,
            rx,
            engines: BTreeMap::new(),
        },
    )
}

impl<H: Host> Animator<H> {
    /// Advance every tracked engine to `now_ms`
    ///
    /// # Returns
    /// Sessions that finished during this frame
    pub fn frame(&mut self, now_ms: f64) -> Vec<Completion> {
        self.drain_registrations();

        let mut staged = false;
        let mut completions = Vec::new();
        for engine in self.engines.values() {
            let outcome = engine.lock().frame(now_ms, self.host.as_ref());
            staged |= outcome.staged;
            completions.extend(outcome.completion);
        }
        if staged {
            trace!(now_ms, "applying animation frame");
            self.host.apply();
        }
        completions
    }

    /// Check if any tracked engine has work for the next frame
    pub fn is_busy(&self) -> bool {
        self.engines.values().any(|e| {
            let engine = e.lock();
            engine.is_animating() || engine.is_cancelling()
        })
    }

    /// Number of tracked engines
    pub fn tracked_count(&mut self) -> usize {
        self.drain_registrations();
        self.engines.len()
    }

    fn drain_registrations(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AnimatorMsg::Track(window, engine) => {
                    self.engines.insert(window, engine);
                }
                AnimatorMsg::Forget(window) => {
                    self.engines.remove(&window);
                }
            }
        }
    }
}
