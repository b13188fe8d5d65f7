//! Focus change notifications

use crate::window::WindowId;

/// Receives top-fullscreen focus changes
///
/// Callbacks run after the slot lock is released and may query the tracker.
pub trait FocusObserver: Send + Sync {
    /// A different package became the top fullscreen window
    fn on_fullscreen_package_changed(&self, window: WindowId, package: &str);

    /// Whether to also report window changes within the same package
    fn observe_windows(&self) -> bool {
        false
    }
}
