//! Threaded floating window service
//!
//! Two contexts run side by side:
//! - the command worker owns the [`FloatingController`] behind the global
//!   lock, drains queued commands and ticks deferred work and gestures
//! - the animation thread advances every window's animation once per frame
//!   and reports finished sessions back over the command channel
//!
//! Requests are fire-and-forget with an optional completion callback.
//! Callbacks run on the worker after the controller lock is released.
//! Pointer input and a few decisions are handled synchronously on the
//! caller's thread; slot queries read the tracker without the global lock.

mod command;

pub use command::{Command, DoneCallback};

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use floatwin_hal::{Host, SettingsSource};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::animation::Animator;
use crate::config::EngineConfig;
use crate::controller::{FloatingController, LaunchDecision, LaunchRequest};
use crate::error::FloatError;
use crate::input::{InputResult, PointerEvent};
use crate::settings::FloatingSettings;
use crate::slots::SlotTracker;
use crate::window::{ExitReason, FloatState, WindowId, WindowMode};

/// Monotonic milliseconds since service start
#[derive(Clone, Copy, Debug)]
struct Clock(Instant);

impl Clock {
    fn now_ms(self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

/// Running floating window service
pub struct FloatingService<H: Host> {
    controller: Arc<Mutex<FloatingController<H>>>,
    slots: Arc<SlotTracker>,
    commands: Sender<Command>,
    stop: Sender<()>,
    clock: Clock,
    workers: Vec<JoinHandle<()>>,
}

impl<H: Host> FloatingService<H> {
    /// Start the command worker and the animation thread
    pub fn start(host: Arc<H>, settings: Arc<dyn SettingsSource>, config: EngineConfig) -> Self {
        let interval = Duration::from_millis(u64::from(config.frame_interval_ms.max(1)));
        let loaded = FloatingSettings::load(settings.as_ref());
        let (controller, animator) = FloatingController::new(host, loaded, config);
        let slots = controller.slots().clone();
        let controller = Arc::new(Mutex::new(controller));
        let clock = Clock(Instant::now());
        let (commands, command_rx) = unbounded();
        let (stop, stop_rx) = unbounded();

        let worker = {
            let controller = controller.clone();
            thread::Builder::new()
                .name("floatwin-command".into())
                .spawn(move || command_loop(controller, command_rx, settings, clock, interval))
        };
        let animation = {
            let commands = commands.clone();
            thread::Builder::new()
                .name("floatwin-animation".into())
                .spawn(move || animation_loop(animator, commands, stop_rx, clock, interval))
        };

        let mut workers = Vec::with_capacity(2);
        for spawned in [worker, animation] {
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => warn!(%err, "failed to spawn floating service thread"),
            }
        }
        info!(interval_ms = interval.as_millis() as u64, "floating service started");

        Self {
            controller,
            slots,
            commands,
            stop,
            clock,
            workers,
        }
    }

    /// Milliseconds since the service started, on the service's clock
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    // === Requests ===

    pub fn request_enter_mini(&self, window: WindowId, done: Option<DoneCallback>) {
        self.send(Command::EnterMini { window, done });
    }

    pub fn request_enter_pinned(&self, window: WindowId, done: Option<DoneCallback>) {
        self.send(Command::EnterPinned { window, done });
    }

    pub fn request_exit(&self, window: WindowId, reason: ExitReason, done: Option<DoneCallback>) {
        self.send(Command::Exit { window, reason, done });
    }

    pub fn request_toggle_resize(&self, window: WindowId, done: Option<DoneCallback>) {
        self.send(Command::ToggleResize { window, done });
    }

    pub fn request_toggle_mute(&self, window: WindowId, done: Option<DoneCallback>) {
        self.send(Command::ToggleMute { window, done });
    }

    pub fn request_prepare_launch(&self, window: WindowId, mode: WindowMode, done: Option<DoneCallback>) {
        self.send(Command::PrepareLaunch { window, mode, done });
    }

    // === Notifications ===

    pub fn notify_window_destroyed(&self, window: WindowId) {
        self.send(Command::WindowDestroyed(window));
    }

    pub fn notify_rotation_changed(&self) {
        self.send(Command::RotationChanged);
    }

    pub fn notify_density_changed(&self) {
        self.send(Command::DensityChanged);
    }

    pub fn notify_user_switched(&self) {
        self.send(Command::UserSwitched);
    }

    pub fn notify_setting_changed(&self, key: &str) {
        self.send(Command::SettingChanged(key.to_string()));
    }

    pub fn notify_transition_finished(&self, window: WindowId) {
        self.send(Command::TransitionFinished(window));
    }

    // === Synchronous calls ===

    /// Route a pointer event on the caller's thread
    pub fn on_pointer_event(&self, event: &PointerEvent) -> InputResult {
        let now = self.clock.now_ms();
        self.controller.lock().on_pointer_event(event, now)
    }

    /// Decide whether an application window may take focus
    pub fn on_app_focus_changed(&self, window: WindowId) -> bool {
        self.controller.lock().on_app_focus_changed(window)
    }

    /// Decide the windowing mode of a launch
    pub fn route_launch(&self, request: &LaunchRequest) -> LaunchDecision {
        self.controller.lock().route_launch(request)
    }

    pub fn state(&self, window: WindowId) -> FloatState {
        self.controller.lock().state(window)
    }

    /// Run a closure against the controller under the global lock
    pub fn with_controller<R>(&self, f: impl FnOnce(&FloatingController<H>) -> R) -> R {
        f(&self.controller.lock())
    }

    // === Slot queries ===

    pub fn is_package_floating(&self, package: &str) -> bool {
        self.slots.is_package_floating(package)
    }

    pub fn top_fullscreen_id(&self) -> Option<WindowId> {
        self.slots.top_fullscreen_id()
    }

    pub fn has_mini_window(&self) -> bool {
        self.slots.has_mini_window()
    }

    pub fn has_pinned_window(&self) -> bool {
        self.slots.has_pinned_window()
    }

    /// Shared handle to the slot tracker
    pub fn slots(&self) -> &Arc<SlotTracker> {
        &self.slots
    }

    fn send(&self, cmd: Command) {
        if let Err(err) = self.commands.send(cmd) {
            let cmd = err.into_inner();
            warn!(command = cmd.name(), error = %FloatError::ServiceStopped, "command dropped");
            if let Some(done) = cmd.into_done() {
                done(false);
            }
        }
    }
}

impl<H: Host> Drop for FloatingService<H> {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        let _ = self.stop.send(());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("floating service thread panicked");
            }
        }
        info!("floating service stopped");
    }
}

fn command_loop<H: Host>(
    controller: Arc<Mutex<FloatingController<H>>>,
    commands: Receiver<Command>,
    settings: Arc<dyn SettingsSource>,
    clock: Clock,
    interval: Duration,
) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(commands) -> msg => {
                let cmd = match msg {
                    Ok(Command::Shutdown) | Err(_) => break,
                    Ok(cmd) => cmd,
                };
                trace!(?cmd, "command");
                let finished = {
                    let mut controller = controller.lock();
                    execute(&mut controller, settings.as_ref(), cmd, clock.now_ms())
                };
                if let Some((done, accepted)) = finished {
                    done(accepted);
                }
            }
            recv(ticker) -> _ => {
                controller.lock().tick(clock.now_ms());
            }
        }
    }
    debug!("command worker stopped");
}

/// Run one command; returns the callback to fire once the lock is released
fn execute<H: Host>(
    controller: &mut FloatingController<H>,
    settings: &dyn SettingsSource,
    cmd: Command,
    now_ms: f64,
) -> Option<(DoneCallback, bool)> {
    let (done, accepted) = match cmd {
        Command::EnterMini { window, done } => (done, controller.enter_mini(window, now_ms)),
        Command::EnterPinned { window, done } => (done, controller.enter_pinned(window, now_ms)),
        Command::Exit { window, reason, done } => (done, controller.exit(window, reason, now_ms)),
        Command::ToggleResize { window, done } => {
            (done, controller.toggle_resize(window, now_ms))
        }
        Command::ToggleMute { window, done } => (done, controller.toggle_mute(window)),
        Command::PrepareLaunch { window, mode, done } => {
            (done, controller.prepare_launch(window, mode, now_ms))
        }
        Command::WindowDestroyed(window) => {
            controller.on_window_destroyed(window, now_ms);
            return None;
        }
        Command::RotationChanged => {
            controller.on_rotation_changed(now_ms);
            return None;
        }
        Command::DensityChanged => {
            controller.on_density_changed(now_ms);
            return None;
        }
        Command::UserSwitched => {
            controller.on_user_switched(settings, now_ms);
            return None;
        }
        Command::SettingChanged(key) => {
            controller.on_setting_changed(settings, &key);
            return None;
        }
        Command::TransitionFinished(window) => {
            controller.on_transition_finished(window);
            return None;
        }
        Command::AnimationEnded(completion) => {
            controller.on_animation_end(completion, now_ms);
            return None;
        }
        Command::Shutdown => return None,
    };
    done.map(|done| (done, accepted))
}

fn animation_loop<H: Host>(
    mut animator: Animator<H>,
    commands: Sender<Command>,
    stop: Receiver<()>,
    clock: Clock,
    interval: Duration,
) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(stop) -> _ => break,
            recv(ticker) -> _ => {
                for completion in animator.frame(clock.now_ms()) {
                    if commands.send(Command::AnimationEnded(completion)).is_err() {
                        debug!("command channel closed");
                        return;
                    }
                }
            }
        }
    }
    debug!("animation thread stopped");
}
