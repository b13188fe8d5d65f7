//! Input result type

use serde::Serialize;

use crate::window::WindowId;

/// Result of input handling
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputResult {
    /// Input was consumed by the floating chrome
    Handled,
    /// Input was not handled (pass through)
    Unhandled,
    /// Input should be forwarded to window content
    Forward {
        /// Target window
        window_id: WindowId,
        /// X coordinate in window-local space
        local_x: f32,
        /// Y coordinate in window-local space
        local_y: f32,
    },
}

impl InputResult {
    /// Check if input was handled
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, InputResult::Handled | InputResult::Forward { .. })
    }

    /// Check if input should be forwarded
    #[inline]
    pub fn is_forward(&self) -> bool {
        matches!(self, InputResult::Forward { .. })
    }
}
