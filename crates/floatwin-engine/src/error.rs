//! Error types for the floating window engine
//!
//! Errors never cross the public request API: controller entry points log
//! them and report a neutral result instead.

use floatwin_hal::HalError;
use thiserror::Error;

use crate::window::{WindowId, WindowMode};

/// Engine errors
#[derive(Debug, Error)]
pub enum FloatError {
    #[error("window {0} is not tracked")]
    UnknownWindow(WindowId),

    #[error("window {0} has no container")]
    MissingContainer(WindowId),

    #[error("illegal transition for window {window}: {from:?} -> {to:?}")]
    IllegalTransition {
        window: WindowId,
        from: WindowMode,
        to: WindowMode,
    },

    #[error("window {0} is already exiting")]
    AlreadyExiting(WindowId),

    #[error("no drag session is active")]
    NoDrag,

    #[error("surface of window {0} is no longer valid")]
    SurfaceInvalid(WindowId),

    #[error("host error: {0}")]
    Host(HalError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("floating service has stopped")]
    ServiceStopped,
}

impl From<HalError> for FloatError {
    fn from(err: HalError) -> Self {
        FloatError::Host(err)
    }
}

impl FloatError {
    /// Check if the error only means the request does not apply right now
    ///
    /// These are logged at debug level; anything else is a warning.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            FloatError::UnknownWindow(_)
                | FloatError::MissingContainer(_)
                | FloatError::IllegalTransition { .. }
                | FloatError::AlreadyExiting(_)
                | FloatError::NoDrag
                | FloatError::SurfaceInvalid(_)
        )
    }
}

/// Result type for engine operations
pub type FloatResult<T> = Result<T, FloatError>;
