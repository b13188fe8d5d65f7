//! Messages for the command context

use std::fmt;

use crate::animation::Completion;
use crate::window::{ExitReason, WindowId, WindowMode};

/// Completion callback of a request; receives whether it was accepted
pub type DoneCallback = Box<dyn FnOnce(bool) + Send>;

/// Work for the command worker
pub enum Command {
    // === Requests ===
    EnterMini { window: WindowId, done: Option<DoneCallback> },
    EnterPinned { window: WindowId, done: Option<DoneCallback> },
    Exit { window: WindowId, reason: ExitReason, done: Option<DoneCallback> },
    ToggleResize { window: WindowId, done: Option<DoneCallback> },
    ToggleMute { window: WindowId, done: Option<DoneCallback> },
    PrepareLaunch { window: WindowId, mode: WindowMode, done: Option<DoneCallback> },

    // === Notifications ===
    WindowDestroyed(WindowId),
    RotationChanged,
    DensityChanged,
    UserSwitched,
    SettingChanged(String),
    TransitionFinished(WindowId),
    /// Reported by the animation context
    AnimationEnded(Completion),

    /// Stop the worker
    Shutdown,
}

impl Command {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::EnterMini { .. } => "enter_mini",
            Command::EnterPinned { .. } => "enter_pinned",
            Command::Exit { .. } => "exit",
            Command::ToggleResize { .. } => "toggle_resize",
            Command::ToggleMute { .. } => "toggle_mute",
            Command::PrepareLaunch { .. } => "prepare_launch",
            Command::WindowDestroyed(_) => "window_destroyed",
            Command::RotationChanged => "rotation_changed",
            Command::DensityChanged => "density_changed",
            Command::UserSwitched => "user_switched",
            Command::SettingChanged(_) => "setting_changed",
            Command::TransitionFinished(_) => "transition_finished",
            Command::AnimationEnded(_) => "animation_ended",
            Command::Shutdown => "shutdown",
        }
    }

    /// Take the callback out of a request
    pub fn into_done(self) -> Option<DoneCallback> {
        match self {
            Command::EnterMini { done, .. }
            | Command::EnterPinned { done, .. }
            | Command::Exit { done, .. }
            | Command::ToggleResize { done, .. }
            | Command::ToggleMute { done, .. }
            | Command::PrepareLaunch { done, .. } => done,
            _ => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::EnterMini { window, .. }
            | Command::EnterPinned { window, .. }
            | Command::ToggleResize { window, .. }
            | Command::ToggleMute { window, .. }
            | Command::WindowDestroyed(window)
            | Command::TransitionFinished(window) => write!(f, "{}({})", self.name(), window),
            Command::Exit { window, reason, .. } => write!(f, "exit({}, {:?})", window, reason),
            Command::PrepareLaunch { window, mode, .. } => {
                write!(f, "prepare_launch({}, {:?})", window, mode)
            }
            Command::SettingChanged(key) => write!(f, "setting_changed({})", key),
            Command::AnimationEnded(c) => {
                write!(f, "animation_ended({}, gen {})", c.window, c.generation)
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_into_done_returns_callback() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let cmd = Command::EnterMini {
            window: 3,
            done: Some(Box::new(move |ok| flag.store(ok, Ordering::SeqCst))),
        };
        let done = cmd.into_done().unwrap();
        done(true);
        assert!(called.load(Ordering::SeqCst));
        assert!(Command::RotationChanged.into_done().is_none());
    }

    #[test]
    fn test_debug_format() {
        let cmd = Command::Exit {
            window: 4,
            reason: ExitReason::LeaveButton,
            done: None,
        };
        assert_eq!(format!("{:?}", cmd), "exit(4, LeaveButton)");
        assert_eq!(format!("{:?}", Command::WindowDestroyed(2)), "window_destroyed(2)");
        assert_eq!(format!("{:?}", Command::Shutdown), "shutdown");
    }
}
