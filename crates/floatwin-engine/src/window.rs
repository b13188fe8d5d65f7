//! Window identity, windowing modes and exit reasons

use serde::{Deserialize, Serialize};
use crate::math::Size;

/// Unique window identifier (the host container's surface id)
pub type WindowId = floatwin_hal::SurfaceId;

/// Windowing mode of a floating-capable window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowMode {
    /// Inherit the display's layout (reported as fullscreen)
    #[default]
    Undefined,
    Fullscreen,
    /// Small draggable window above the dim backdrop
    Mini,
    /// Corner-docked window with the pinned overlay
    Pinned,
}

impl WindowMode {
    /// Check if the mode is one of the floating presentations
    #[inline]
    pub fn is_floating(self) -> bool {
        matches!(self, WindowMode::Mini | WindowMode::Pinned)
    }
}

/// Observable lifecycle state of a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatState {
    Fullscreen,
    Mini,
    Pinned,
    /// Playing its exit animation or waiting for the exit delay
    Exiting,
}

/// Why a floating window is leaving its floating mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Tapped outside the mini window
    TouchOutside,
    /// Dropped on the dismiss target
    LeaveButton,
    /// Replaced by a newer mini window
    SupersededByNewMini,
    /// Replaced by a newer pinned window
    SupersededByNewPinned,
    /// System-initiated (user switch, density change, relaunch)
    NonUser,
}

impl ExitReason {
    /// Supersession exits skip the exit animation
    #[inline]
    pub fn is_supersession(self) -> bool {
        matches!(
            self,
            ExitReason::SupersededByNewMini | ExitReason::SupersededByNewPinned
        )
    }
}

/// Orientation of a window or display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orientation of a size; squares count as landscape
    #[inline]
    pub fn of(size: Size) -> Self {
        if size.is_portrait() {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    #[inline]
    pub fn is_portrait(self) -> bool {
        self == Orientation::Portrait
    }
}
